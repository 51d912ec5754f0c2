//! Helpers for building in-memory tar streams in tests and benchmarks.
//!
//! Only compiled for this crate's own tests or with the `test-utils` feature.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io;

/// Creates an in-memory tar stream of regular files with mode 0o644.
///
/// # Examples
///
/// ```
/// use tarutil_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(&[("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// assert_eq!(tar_data.len() % 512, 0);
/// ```
#[must_use]
pub fn create_test_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    entries
        .iter()
        .fold(TarTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Builder for tar test streams with arbitrary entry types.
///
/// Names are written verbatim, so traversal names (`../x`, `/etc/x`) can be
/// produced, which `tar::Builder::append_data` would reject.
///
/// # Examples
///
/// ```
/// use tarutil_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("dir/")
///     .add_file("dir/file.txt", b"content")
///     .add_symlink("dir/link", "file.txt")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with a custom mode.
    #[must_use]
    pub fn add_file_with_mode(self, path: &str, data: &[u8], mode: u32) -> Self {
        self.add_file_with_metadata(path, data, mode, 0, 0, 0)
    }

    /// Adds a regular file with full ownership and mtime.
    #[must_use]
    pub fn add_file_with_metadata(
        mut self,
        path: &str,
        data: &[u8],
        mode: u32,
        uid: u64,
        gid: u64,
        mtime: u64,
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_uid(uid);
        header.set_gid(gid);
        header.set_mtime(mtime);
        self.append(header, path, data);
        self
    }

    /// Adds a directory with mode 0o755.
    ///
    /// The uid, gid and mtime fields are left blank (all NUL), as some
    /// archivers write them.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        self.append(header, path, &[]);
        self
    }

    /// Adds a directory with explicit mode, ownership and mtime.
    #[must_use]
    pub fn add_directory_with_metadata(
        mut self,
        path: &str,
        mode: u32,
        uid: u64,
        gid: u64,
        mtime: u64,
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(mode);
        header.set_uid(uid);
        header.set_gid(gid);
        header.set_mtime(mtime);
        self.append(header, path, &[]);
        self
    }

    /// Adds a symbolic link pointing at `target`.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_link(tar::EntryType::Symlink, path, target)
    }

    /// Adds a hard link to the archive member `target`.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.add_link(tar::EntryType::Link, path, target)
    }

    /// Adds a data-less entry of any type, e.g. a device node or FIFO.
    #[must_use]
    pub fn add_entry_type(mut self, path: &str, entry_type: tar::EntryType) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_size(0);
        header.set_mode(0o644);
        self.append(header, path, &[]);
        self
    }

    /// Adds PAX records that apply to the next entry.
    #[must_use]
    pub fn add_pax(mut self, records: &[(&str, &str)]) -> Self {
        self.builder
            .append_pax_extensions(records.iter().map(|(k, v)| (*k, v.as_bytes())))
            .unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    fn add_link(mut self, entry_type: tar::EntryType, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_size(0);
        header.set_mode(0o777);
        write_field(&mut header.as_old_mut().linkname, target);
        self.append(header, path, &[]);
        self
    }

    fn append(&mut self, mut header: tar::Header, path: &str, data: &[u8]) {
        write_field(&mut header.as_old_mut().name, path);
        header.set_cksum();
        self.builder.append(&header, io::Cursor::new(data)).unwrap();
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a name field verbatim, bypassing the builder's path checks.
fn write_field(field: &mut [u8; 100], value: &str) {
    let bytes = value.as_bytes();
    assert!(bytes.len() <= field.len(), "test path too long: {value}");
    field.fill(0);
    field[..bytes.len()].copy_from_slice(bytes);
}
