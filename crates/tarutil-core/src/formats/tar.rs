//! Tar decoding adapter.
//!
//! Turns `tar::Archive` entries into [`ArchiveEntry`] values. Decoding itself
//! (ustar/GNU/PAX framing, long names, sparse files) is left to the `tar`
//! crate; this module only maps headers onto [`EntryHeader`].

use std::io;
use std::io::Read;

use filetime::FileTime;

use crate::types::ArchiveEntry;
use crate::types::EntryHeader;
use crate::types::EntryKind;

/// Iterator over the entries of a tar stream.
///
/// Yields `Err` at most once: after a decode failure the stream position is
/// unknown, so iteration ends.
///
/// # Examples
///
/// ```
/// use tarutil_core::TarEntries;
///
/// # fn main() -> std::io::Result<()> {
/// let mut builder = tar::Builder::new(Vec::new());
/// let mut header = tar::Header::new_gnu();
/// header.set_size(2);
/// header.set_cksum();
/// builder.append_data(&mut header, "hi.txt", &b"hi"[..])?;
/// let data = builder.into_inner()?;
///
/// let mut archive = tar::Archive::new(&data[..]);
/// let names: Vec<_> = TarEntries::new(&mut archive)?
///     .map(|entry| entry.map(|e| e.header.name))
///     .collect::<std::io::Result<_>>()?;
/// assert_eq!(names, [std::path::PathBuf::from("hi.txt")]);
/// # Ok(())
/// # }
/// ```
pub struct TarEntries<'a, R: 'a + Read> {
    entries: ::tar::Entries<'a, R>,
    failed: bool,
}

impl<'a, R: Read> TarEntries<'a, R> {
    /// Starts iterating over `archive`.
    ///
    /// # Errors
    ///
    /// Fails if the archive was already partially consumed.
    pub fn new(archive: &'a mut ::tar::Archive<R>) -> io::Result<Self> {
        Ok(Self {
            entries: archive.entries()?,
            failed: false,
        })
    }
}

impl<'a, R: Read> Iterator for TarEntries<'a, R> {
    type Item = io::Result<ArchiveEntry<::tar::Entry<'a, R>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.entries.next()?.and_then(|mut entry| {
            let header = read_header(&mut entry)?;
            Ok(ArchiveEntry::new(header, entry))
        });
        self.failed = next.is_err();
        Some(next)
    }
}

/// Maps a tar header (plus any PAX overrides) onto an [`EntryHeader`].
fn read_header<R: Read>(entry: &mut ::tar::Entry<'_, R>) -> io::Result<EntryHeader> {
    let kind = entry_kind(entry)?;
    let name = entry.path()?.into_owned();

    let pax = if kind.is_header() {
        PaxOverrides::default()
    } else {
        PaxOverrides::read(entry)?
    };

    let header = entry.header();
    let raw = header.as_old();
    let mtime = match pax.mtime {
        Some(mtime) => mtime,
        None => unix_time(numeric_field(&raw.mtime, || header.mtime())?)?,
    };
    let gnu_atime = header
        .as_gnu()
        .and_then(|gnu| gnu.atime().ok())
        .filter(|secs| *secs != 0);
    let atime = match (pax.atime, gnu_atime) {
        (Some(atime), _) => atime,
        (None, Some(secs)) => unix_time(secs)?,
        (None, None) => mtime,
    };

    Ok(EntryHeader {
        name,
        kind,
        mode: numeric_field(&raw.mode, || header.mode())?,
        uid: pax
            .uid
            .map_or_else(|| numeric_field(&raw.uid, || header.uid()), Ok)?,
        gid: pax
            .gid
            .map_or_else(|| numeric_field(&raw.gid, || header.gid()), Ok)?,
        atime,
        mtime,
    })
}

/// Reads a numeric header field, treating an all-NUL or all-space field as 0.
///
/// Non-blank fields still go through `parse`, so garbage remains an error.
fn numeric_field<T: Default>(
    raw: &[u8],
    parse: impl FnOnce() -> io::Result<T>,
) -> io::Result<T> {
    if raw.iter().all(|b| matches!(b, 0 | b' ')) {
        return Ok(T::default());
    }
    parse()
}

fn entry_kind<R: Read>(entry: &::tar::Entry<'_, R>) -> io::Result<EntryKind> {
    use ::tar::EntryType;

    let kind = match entry.header().entry_type() {
        // Sparse files are reassembled by the tar crate's reader.
        EntryType::Regular | EntryType::GNUSparse => EntryKind::File,
        EntryType::Link => EntryKind::Hardlink {
            target: link_target(entry)?,
        },
        EntryType::Symlink => EntryKind::Symlink {
            target: link_target(entry)?,
        },
        EntryType::Directory => EntryKind::Directory,
        EntryType::Continuous => EntryKind::Continuation,
        EntryType::XHeader | EntryType::GNULongName | EntryType::GNULongLink => {
            EntryKind::ExtendedHeader
        }
        EntryType::XGlobalHeader => EntryKind::GlobalExtendedHeader,
        EntryType::Char => EntryKind::CharDevice,
        EntryType::Block => EntryKind::BlockDevice,
        EntryType::Fifo => EntryKind::Fifo,
        other => EntryKind::Unknown(other.as_byte()),
    };
    Ok(kind)
}

fn link_target<R: Read>(entry: &::tar::Entry<'_, R>) -> io::Result<std::path::PathBuf> {
    Ok(entry
        .link_name()?
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default())
}

fn unix_time(secs: u64) -> io::Result<FileTime> {
    let secs = i64::try_from(secs).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("timestamp {secs} out of range"),
        )
    })?;
    Ok(FileTime::from_unix_time(secs, 0))
}

/// PAX records that take precedence over the ustar header fields.
#[derive(Debug, Default, PartialEq, Eq)]
struct PaxOverrides {
    atime: Option<FileTime>,
    mtime: Option<FileTime>,
    uid: Option<u64>,
    gid: Option<u64>,
}

impl PaxOverrides {
    fn read<R: Read>(entry: &mut ::tar::Entry<'_, R>) -> io::Result<Self> {
        let mut overrides = Self::default();
        let Some(extensions) = entry.pax_extensions()? else {
            return Ok(overrides);
        };

        for extension in extensions {
            let extension = extension?;
            let (Ok(key), Ok(value)) = (extension.key(), extension.value()) else {
                continue;
            };
            match key {
                "atime" => overrides.atime = parse_pax_time(value),
                "mtime" => overrides.mtime = parse_pax_time(value),
                "uid" => overrides.uid = value.parse().ok(),
                "gid" => overrides.gid = value.parse().ok(),
                _ => {}
            }
        }
        Ok(overrides)
    }
}

/// Parses a PAX decimal timestamp such as `1350244992.023960108` or `-1.5`.
fn parse_pax_time(value: &str) -> Option<FileTime> {
    let (secs, frac) = value.split_once('.').unwrap_or((value, ""));
    if (frac.is_empty() && value.contains('.')) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs: i64 = secs.parse().ok()?;

    let mut nanos: u32 = 0;
    for (i, digit) in frac.bytes().take(9).enumerate() {
        let exponent = u32::try_from(8 - i).ok()?;
        nanos += u32::from(digit - b'0') * 10u32.pow(exponent);
    }

    if value.starts_with('-') && nanos > 0 {
        return Some(FileTime::from_unix_time(secs - 1, 1_000_000_000 - nanos));
    }
    Some(FileTime::from_unix_time(secs, nanos))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use std::path::Path;
    use std::path::PathBuf;

    fn headers(data: &[u8]) -> Vec<io::Result<EntryHeader>> {
        let mut archive = ::tar::Archive::new(data);
        TarEntries::new(&mut archive)
            .unwrap()
            .map(|entry| entry.map(|e| e.header))
            .collect()
    }

    #[test]
    fn test_maps_basic_kinds() {
        let data = TarTestBuilder::new()
            .add_directory("a/")
            .add_file("a/b.txt", b"hi")
            .add_symlink("a/c", "b.txt")
            .add_hardlink("a/d", "a/b.txt")
            .add_entry_type("dev/tty", ::tar::EntryType::Char)
            .add_entry_type("dev/sda", ::tar::EntryType::Block)
            .add_entry_type("run/fifo", ::tar::EntryType::Fifo)
            .build();

        let kinds: Vec<EntryKind> = headers(&data)
            .into_iter()
            .map(|h| h.unwrap().kind)
            .collect();

        assert_eq!(
            kinds,
            [
                EntryKind::Directory,
                EntryKind::File,
                EntryKind::Symlink {
                    target: PathBuf::from("b.txt")
                },
                EntryKind::Hardlink {
                    target: PathBuf::from("a/b.txt")
                },
                EntryKind::CharDevice,
                EntryKind::BlockDevice,
                EntryKind::Fifo,
            ]
        );
    }

    #[test]
    fn test_header_fields() {
        let data = TarTestBuilder::new()
            .add_file_with_metadata("f", b"x", 0o4755, 1000, 100, 1_700_000_000)
            .build();

        let header = headers(&data).remove(0).unwrap();
        assert_eq!(header.name, Path::new("f"));
        assert_eq!(header.mode & 0o7777, 0o4755);
        assert_eq!((header.uid, header.gid), (1000, 100));
        assert_eq!(header.mtime, FileTime::from_unix_time(1_700_000_000, 0));
        assert_eq!(header.atime, header.mtime, "atime defaults to mtime");
    }

    #[test]
    fn test_pax_overrides_header() {
        let data = TarTestBuilder::new()
            .add_pax(&[
                ("mtime", "1700000000.25"),
                ("atime", "1600000000"),
                ("uid", "5000000000"),
                ("gid", "42"),
            ])
            .add_file_with_metadata("f", b"x", 0o644, 1, 2, 3)
            .build();

        let header = headers(&data).remove(0).unwrap();
        assert_eq!(header.mtime, FileTime::from_unix_time(1_700_000_000, 250_000_000));
        assert_eq!(header.atime, FileTime::from_unix_time(1_600_000_000, 0));
        assert_eq!(header.uid, 5_000_000_000);
        assert_eq!(header.gid, 42);
    }

    fn blank_numeric_fields(mut data: Vec<u8>, offset: usize) -> Vec<u8> {
        let mut header = ::tar::Header::from_byte_slice(&data[offset..offset + 512]).clone();
        let old = header.as_old_mut();
        old.mode.fill(0);
        old.uid.fill(b' ');
        old.gid.fill(0);
        old.mtime.fill(0);
        header.set_cksum();
        data[offset..offset + 512].copy_from_slice(header.as_bytes());
        data
    }

    #[test]
    fn test_blank_numeric_fields_read_as_zero() {
        let data = TarTestBuilder::new().add_file("f", b"x").build();
        let data = blank_numeric_fields(data, 0);

        let header = headers(&data).remove(0).unwrap();
        assert_eq!(header.mode, 0);
        assert_eq!((header.uid, header.gid), (0, 0));
        assert_eq!(header.mtime, FileTime::from_unix_time(0, 0));
        assert_eq!(header.atime, header.mtime);
    }

    #[test]
    fn test_garbage_numeric_field_is_decode_error() {
        let data = TarTestBuilder::new().add_file("f", b"x").build();
        let mut header = ::tar::Header::from_byte_slice(&data[..512]).clone();
        header.as_old_mut().uid.copy_from_slice(b"zz\0\0\0\0\0\0");
        header.set_cksum();
        let mut data = data;
        data[..512].copy_from_slice(header.as_bytes());

        let results = headers(&data);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_content_is_readable() {
        let data = TarTestBuilder::new().add_file("f", b"payload").build();
        let mut archive = ::tar::Archive::new(&data[..]);
        let mut entry = TarEntries::new(&mut archive).unwrap().next().unwrap().unwrap();

        let mut content = String::new();
        entry.content.read_to_string(&mut content).unwrap();
        assert_eq!(content, "payload");
    }

    #[test]
    fn test_truncated_archive_yields_one_error() {
        let data = TarTestBuilder::new()
            .add_file("a", b"first")
            .add_file("b", &[7u8; 2048])
            .build();
        // keep the first entry and half of the second header
        let truncated = &data[..512 + 512 + 256];

        let results = headers(truncated);
        assert!(results[0].is_ok());
        assert!(results.last().is_some_and(Result::is_err));
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_parse_pax_time() {
        assert_eq!(
            parse_pax_time("1350244992.023960108"),
            Some(FileTime::from_unix_time(1_350_244_992, 23_960_108))
        );
        assert_eq!(parse_pax_time("12"), Some(FileTime::from_unix_time(12, 0)));
        assert_eq!(
            parse_pax_time("-1.5"),
            Some(FileTime::from_unix_time(-2, 500_000_000))
        );
        assert_eq!(
            parse_pax_time("1.1234567891"),
            Some(FileTime::from_unix_time(1, 123_456_789))
        );
        assert_eq!(parse_pax_time("abc"), None);
        assert_eq!(parse_pax_time("1.x"), None);
        assert_eq!(parse_pax_time("1."), None);
    }
}
