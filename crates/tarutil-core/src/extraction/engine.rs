//! Core extraction engine.

use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use super::metadata::apply_metadata;
use crate::ExtractOptions;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;
use crate::error::FsOperation;
use crate::filesystem::Filesystem;
use crate::filesystem::HostFilesystem;
use crate::report::EntryOutcome;
use crate::types::ArchiveEntry;
use crate::types::EntryKind;
use crate::types::RootDir;
use crate::types::SafePath;

/// Extracts archive entries under a single root directory.
///
/// Every entry name and link target is normalized before it is joined to the
/// root, so no entry can create or modify anything outside it.
///
/// Link targets are always re-rooted: a symlink to `/usr/lib/foo` in the
/// archive becomes a symlink to `<root>/usr/lib/foo`, and a relative target is
/// resolved from the link's directory and then pinned under the root. Callers
/// that expect raw targets to be preserved should not use this extractor.
///
/// # Examples
///
/// ```no_run
/// use std::io::Cursor;
/// use tarutil_core::ExtractOptions;
/// use tarutil_core::Extractor;
/// use tarutil_core::TarEntries;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = Extractor::new("/tmp/rootfs", ExtractOptions::SYMLINK)?;
/// let mut archive = tar::Archive::new(Cursor::new(std::fs::read("layer.tar")?));
/// let report = extractor.extract_entries(TarEntries::new(&mut archive)?);
/// report.into_result()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor<F = HostFilesystem> {
    root: RootDir,
    options: ExtractOptions,
    fs: F,
}

impl Extractor {
    /// Creates an extractor writing to the host filesystem.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidRoot` if the root cannot be used.
    pub fn new(root: impl Into<PathBuf>, options: ExtractOptions) -> Result<Self> {
        Ok(Self::with_filesystem(
            RootDir::new(root)?,
            options,
            HostFilesystem,
        ))
    }
}

impl<F: Filesystem> Extractor<F> {
    /// Creates an extractor over a custom filesystem implementation.
    #[must_use]
    pub fn with_filesystem(root: RootDir, options: ExtractOptions, fs: F) -> Self {
        Self { root, options, fs }
    }

    /// Returns the extraction root.
    #[must_use]
    pub fn root(&self) -> &RootDir {
        &self.root
    }

    /// Returns the enabled options.
    #[must_use]
    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Extracts every entry the stream yields.
    ///
    /// Extraction is best-effort. A failing entry is logged, counted, and the
    /// run moves on to the next entry. A decode error ends the run since no
    /// later entry can be located. The report keeps the first error of either
    /// kind; later errors are dropped.
    pub fn extract_entries<I, R>(&self, entries: I) -> ExtractionReport
    where
        I: IntoIterator<Item = io::Result<ArchiveEntry<R>>>,
        R: Read,
    {
        let started = Instant::now();
        let mut report = ExtractionReport::new();
        let mut buffer = CopyBuffer::new();
        let mut first_error: Option<ExtractionError> = None;

        for next in entries {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to decode archive entry, stopping");
                    keep_first(&mut first_error, ExtractionError::Decode(err));
                    break;
                }
            };

            match self.extract_with_buffer(entry, &mut buffer) {
                Ok(outcome) => report.record_outcome(outcome),
                Err(err) => {
                    tracing::warn!(error = %err, "entry extraction failed, continuing");
                    report.entries_failed += 1;
                    keep_first(&mut first_error, err);
                }
            }
        }

        report.duration = started.elapsed();
        tracing::debug!(
            root = %self.root.as_path().display(),
            items = report.total_items(),
            failed = report.entries_failed,
            bytes = report.bytes_written,
            "extraction finished"
        );
        report.set_first_error(first_error);
        report
    }

    /// Extracts a single entry.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedType` for device nodes, FIFOs and unknown tags, or
    /// `Filesystem` naming the failing primitive. Nothing after the failing
    /// step runs for this entry.
    pub fn extract_one<R: Read>(&self, entry: ArchiveEntry<R>) -> Result<EntryOutcome> {
        self.extract_with_buffer(entry, &mut CopyBuffer::new())
    }

    fn extract_with_buffer<R: Read>(
        &self,
        entry: ArchiveEntry<R>,
        buffer: &mut CopyBuffer,
    ) -> Result<EntryOutcome> {
        let ArchiveEntry {
            header,
            mut content,
        } = entry;
        let name = header.name.as_path();
        let safe = SafePath::new(name);
        let path = self.root.resolve(&safe);

        tracing::debug!(
            name = %name.display(),
            kind = %header.kind,
            path = %path.display(),
            "extracting entry"
        );

        let outcome = match &header.kind {
            EntryKind::File => {
                let bytes = self.write_file(name, &path, &mut content, buffer)?;
                EntryOutcome::File { bytes }
            }
            EntryKind::Hardlink { target } => {
                if !self.options.contains(ExtractOptions::LINK) {
                    tracing::trace!(name = %name.display(), "hard links disabled, skipping");
                    return Ok(EntryOutcome::Skipped);
                }
                let target = self.root.resolve(&SafePath::for_hardlink_target(target));
                self.fs
                    .hard_link(&target, &path)
                    .map_err(|e| ExtractionError::fs(FsOperation::Link, name, e))?;
                EntryOutcome::Hardlink
            }
            EntryKind::Symlink { target } => {
                if !self.options.contains(ExtractOptions::SYMLINK) {
                    tracing::trace!(name = %name.display(), "symlinks disabled, skipping");
                    return Ok(EntryOutcome::Skipped);
                }
                let target = self
                    .root
                    .resolve(&SafePath::for_symlink_target(&safe, target));
                self.fs
                    .symlink(&target, &path)
                    .map_err(|e| ExtractionError::fs(FsOperation::Symlink, name, e))?;
                EntryOutcome::Symlink
            }
            EntryKind::Directory => {
                self.fs
                    .create_dir_all(&path)
                    .map_err(|e| ExtractionError::fs(FsOperation::Mkdir, name, e))?;
                EntryOutcome::Directory
            }
            EntryKind::Continuation | EntryKind::ExtendedHeader | EntryKind::GlobalExtendedHeader => {
                return Ok(EntryOutcome::Ignored);
            }
            EntryKind::CharDevice | EntryKind::BlockDevice | EntryKind::Fifo | EntryKind::Unknown(_) => {
                return Err(ExtractionError::UnsupportedType {
                    tag: header.kind.tag(),
                    kind: header.kind.clone(),
                    name: name.to_path_buf(),
                });
            }
        };

        apply_metadata(&self.fs, &path, &header, self.options)?;
        Ok(outcome)
    }

    /// Creates the file and copies the content into it.
    ///
    /// The handle is owned by this function: it is dropped on a failed copy
    /// and consumed by `close_file` otherwise, so it is always released before
    /// metadata is applied.
    fn write_file<R: Read>(
        &self,
        name: &Path,
        path: &Path,
        content: &mut R,
        buffer: &mut CopyBuffer,
    ) -> Result<u64> {
        let mut file = self
            .fs
            .create_file(path)
            .map_err(|e| ExtractionError::fs(FsOperation::Create, name, e))?;
        let bytes = copy_with_buffer(content, &mut file, buffer).map_err(|e| match e {
            CopyError::Read(e) => ExtractionError::fs(FsOperation::Read, name, e),
            CopyError::Write(e) => ExtractionError::fs(FsOperation::Write, name, e),
        })?;
        self.fs
            .close_file(file)
            .map_err(|e| ExtractionError::fs(FsOperation::Close, name, e))?;
        Ok(bytes)
    }
}

/// Stores `error` unless an earlier one is already recorded.
fn keep_first(slot: &mut Option<ExtractionError>, error: ExtractionError) {
    if slot.is_none() {
        *slot = Some(error);
    }
}
