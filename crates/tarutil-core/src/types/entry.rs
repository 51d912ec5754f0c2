//! Decoded archive entries.

use std::path::PathBuf;

use filetime::FileTime;

use super::EntryKind;

/// Metadata of one archive entry as decoded from the stream.
///
/// Everything here is untrusted archive content. `name` and link targets are
/// contained by the extractor before they touch the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Archive-relative name.
    pub name: PathBuf,
    /// Entry kind, including link targets.
    pub kind: EntryKind,
    /// Mode field; only the permission bits are ever applied.
    pub mode: u32,
    /// Numeric owner id.
    pub uid: u64,
    /// Numeric group id.
    pub gid: u64,
    /// Access time. Equal to `mtime` when the archive carries none.
    pub atime: FileTime,
    /// Modification time.
    pub mtime: FileTime,
}

impl EntryHeader {
    /// Creates a header with mode `0o644`, root ownership and zero timestamps.
    ///
    /// Mostly useful for callers that feed the extractor from their own
    /// decoder, and for tests.
    #[must_use]
    pub fn new(name: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mode: 0o644,
            uid: 0,
            gid: 0,
            atime: FileTime::zero(),
            mtime: FileTime::zero(),
        }
    }

    /// Sets the mode field.
    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Sets numeric ownership.
    #[must_use]
    pub fn with_owner(mut self, uid: u64, gid: u64) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    /// Sets access and modification times.
    #[must_use]
    pub fn with_times(mut self, atime: FileTime, mtime: FileTime) -> Self {
        self.atime = atime;
        self.mtime = mtime;
        self
    }
}

/// One entry of an archive stream: a header and its content reader.
///
/// `content` is read only for regular files.
#[derive(Debug)]
pub struct ArchiveEntry<R> {
    /// Decoded header.
    pub header: EntryHeader,
    /// Regular-file bytes.
    pub content: R,
}

impl<R> ArchiveEntry<R> {
    /// Pairs a header with its content reader.
    #[must_use]
    pub fn new(header: EntryHeader, content: R) -> Self {
        Self { header, content }
    }
}
