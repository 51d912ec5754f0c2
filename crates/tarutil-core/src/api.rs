//! High-level entry points.

use std::io::Read;
use std::path::Path;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Extractor;
use crate::Result;
use crate::formats::TarEntries;

/// Extracts a tar stream into `root`.
///
/// Extraction is best-effort: every entry is attempted even after one fails,
/// and the first failure (or the decode error that ended the stream) is
/// returned. Whatever was created before and after the failure is left in
/// place.
///
/// Nothing is ever written outside `root`. Entry names and link targets are
/// normalized against the root, so `../../etc/passwd` lands at
/// `<root>/etc/passwd`.
///
/// # Errors
///
/// - `InvalidRoot` if `root` cannot be created
/// - `Decode` if the stream is not a readable tar archive
/// - the first per-entry error otherwise
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use tarutil_core::ExtractOptions;
/// use tarutil_core::extract_all;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let layer = File::open("layer.tar")?;
/// extract_all(layer, "/tmp/rootfs", ExtractOptions::SYMLINK | ExtractOptions::CHMOD)?;
/// # Ok(())
/// # }
/// ```
pub fn extract_all<R: Read>(
    reader: R,
    root: impl AsRef<Path>,
    options: ExtractOptions,
) -> Result<()> {
    extract_all_with_report(reader, root, options)?.into_result()
}

/// Like [`extract_all`], but returns per-kind counters alongside the outcome.
///
/// Per-entry and decode failures are kept in the report (see
/// [`ExtractionReport::first_error`]) rather than returned as `Err`.
///
/// # Errors
///
/// Returns `InvalidRoot` if `root` cannot be created.
pub fn extract_all_with_report<R: Read>(
    reader: R,
    root: impl AsRef<Path>,
    options: ExtractOptions,
) -> Result<ExtractionReport> {
    let extractor = Extractor::new(root.as_ref(), options)?;
    let mut archive = tar::Archive::new(reader);

    match TarEntries::new(&mut archive) {
        Ok(entries) => Ok(extractor.extract_entries(entries)),
        Err(e) => {
            let mut report = ExtractionReport::new();
            report.set_first_error(Some(ExtractionError::Decode(e)));
            Ok(report)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::create_test_tar;
    use tempfile::TempDir;

    #[test]
    fn test_extract_all_writes_files() {
        let temp = TempDir::new().unwrap();
        let data = create_test_tar(&[("a.txt", b"alpha"), ("b.txt", b"beta")]);

        extract_all(&data[..], temp.path(), ExtractOptions::empty()).unwrap();

        assert_eq!(std::fs::read(temp.path().join("a.txt")).unwrap(), b"alpha");
        assert_eq!(std::fs::read(temp.path().join("b.txt")).unwrap(), b"beta");
    }

    #[test]
    fn test_extract_all_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("new/root");
        let data = create_test_tar(&[("f", b"x")]);

        extract_all(&data[..], &root, ExtractOptions::empty()).unwrap();

        assert!(root.join("f").is_file());
    }

    #[test]
    fn test_extract_all_empty_stream() {
        let temp = TempDir::new().unwrap();
        let data = TarTestBuilder::new().build();

        extract_all(&data[..], temp.path(), ExtractOptions::empty()).unwrap();

        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_report_counts() {
        let temp = TempDir::new().unwrap();
        let data = TarTestBuilder::new()
            .add_directory("d/")
            .add_file("d/f", b"12345")
            .add_symlink("d/l", "f")
            .add_hardlink("d/h", "d/f")
            .build();

        let report = extract_all_with_report(&data[..], temp.path(), ExtractOptions::SYMLINK).unwrap();

        assert!(report.is_success());
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.files_extracted, 1);
        assert_eq!(report.bytes_written, 5);
        assert_eq!(report.symlinks_created, 1);
        assert_eq!(report.links_skipped, 1);
    }

    #[test]
    fn test_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, b"").unwrap();

        let err = extract_all(&b""[..], &file, ExtractOptions::empty()).unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidRoot { .. }));
    }
}
