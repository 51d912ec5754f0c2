//! Extraction run reporting.

use std::time::Duration;

use crate::ExtractionError;
use crate::Result;

/// What happened to a single entry that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A regular file was written.
    File {
        /// Bytes copied from the entry content.
        bytes: u64,
    },
    /// A directory was created (or already existed).
    Directory,
    /// A hard link was created.
    Hardlink,
    /// A symbolic link was created.
    Symlink,
    /// A link entry was skipped because its option was not enabled.
    Skipped,
    /// A header-only record produced nothing.
    Ignored,
}

/// Summary of an extraction run.
///
/// Extraction is best-effort: every entry that can be extracted is extracted,
/// and only the first failure is kept. The counters are informational; the
/// single error returned by [`ExtractionReport::into_result`] is the contract.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directory entries processed.
    pub directories_created: usize,

    /// Number of hard links created.
    pub hardlinks_created: usize,

    /// Number of symlinks created.
    pub symlinks_created: usize,

    /// Link entries skipped because `LINK`/`SYMLINK` was not enabled.
    pub links_skipped: usize,

    /// Header-only records that produced nothing.
    pub headers_ignored: usize,

    /// Entries that failed.
    pub entries_failed: usize,

    /// Total bytes written to regular files.
    pub bytes_written: u64,

    /// Wall-clock duration of the run.
    pub duration: Duration,

    first_error: Option<ExtractionError>,
}

impl ExtractionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a successful entry.
    pub fn record_outcome(&mut self, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::File { bytes } => {
                self.files_extracted += 1;
                self.bytes_written = self.bytes_written.saturating_add(bytes);
            }
            EntryOutcome::Directory => self.directories_created += 1,
            EntryOutcome::Hardlink => self.hardlinks_created += 1,
            EntryOutcome::Symlink => self.symlinks_created += 1,
            EntryOutcome::Skipped => self.links_skipped += 1,
            EntryOutcome::Ignored => self.headers_ignored += 1,
        }
    }

    /// Returns total number of filesystem objects created.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted
            + self.directories_created
            + self.hardlinks_created
            + self.symlinks_created
    }

    /// Returns `true` if no error was recorded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.first_error.is_none()
    }

    /// Returns the first error of the run, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&ExtractionError> {
        self.first_error.as_ref()
    }

    /// Removes and returns the first error, leaving the counters intact.
    pub fn take_error(&mut self) -> Option<ExtractionError> {
        self.first_error.take()
    }

    /// Collapses the report into the single-error result of the run.
    pub fn into_result(self) -> Result<()> {
        self.first_error.map_or(Ok(()), Err)
    }

    pub(crate) fn set_first_error(&mut self, error: Option<ExtractionError>) {
        self.first_error = error;
    }
}
