//! Error types for archive extraction operations.

use std::fmt;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::EntryKind;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A filesystem primitive invoked while extracting one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOperation {
    /// Creating (or truncating) a regular file.
    Create,
    /// Reading entry content from the archive.
    Read,
    /// Writing entry content into a created file.
    Write,
    /// Flushing and closing a created file.
    Close,
    /// Creating a directory and its missing parents.
    Mkdir,
    /// Creating a hard link.
    Link,
    /// Creating a symbolic link.
    Symlink,
    /// Setting access and modification times.
    Chtimes,
    /// Setting permission bits.
    Chmod,
    /// Setting numeric owner and group.
    Chown,
}

impl FsOperation {
    /// Short lowercase name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Write => "write",
            Self::Close => "close",
            Self::Mkdir => "mkdir",
            Self::Link => "link",
            Self::Symlink => "symlink",
            Self::Chtimes => "chtimes",
            Self::Chmod => "chmod",
            Self::Chown => "chown",
        }
    }
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during archive extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The archive stream could not produce the next entry.
    ///
    /// Extraction stops at this point because no later entry can be located
    /// reliably.
    #[error("failed to decode archive: {0}")]
    Decode(#[source] io::Error),

    /// The entry describes an object this crate does not create
    /// (device nodes, FIFOs, unknown type tags).
    #[error("unsupported entry type '{}' ({kind}): {}", char::from(*tag), name.display())]
    UnsupportedType {
        /// Raw tar type tag.
        tag: u8,
        /// Decoded entry kind.
        kind: EntryKind,
        /// Entry name as found in the archive.
        name: PathBuf,
    },

    /// A filesystem primitive failed for an entry.
    #[error("{operation} {}: {source}", name.display())]
    Filesystem {
        /// The failing primitive.
        operation: FsOperation,
        /// Entry name as found in the archive.
        name: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The extraction root is unusable.
    #[error("invalid extraction root {}: {source}", path.display())]
    InvalidRoot {
        /// The root path supplied by the caller.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl ExtractionError {
    /// Builds a `Filesystem` error for the named entry.
    pub(crate) fn fs(operation: FsOperation, name: &Path, source: io::Error) -> Self {
        Self::Filesystem {
            operation,
            name: name.to_path_buf(),
            source,
        }
    }

    /// Returns `true` if the archive stream itself was unreadable.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarutil_core::ExtractionError;
    ///
    /// let err = ExtractionError::Decode(std::io::Error::other("bad checksum"));
    /// assert!(err.is_decode_error());
    /// ```
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns the archive entry name this error belongs to, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use tarutil_core::ExtractionError;
    /// use tarutil_core::types::EntryKind;
    ///
    /// let err = ExtractionError::UnsupportedType {
    ///     tag: b'6',
    ///     kind: EntryKind::Fifo,
    ///     name: "run/pipe".into(),
    /// };
    /// assert_eq!(err.entry_name(), Some(Path::new("run/pipe")));
    /// ```
    #[must_use]
    pub fn entry_name(&self) -> Option<&Path> {
        match self {
            Self::UnsupportedType { name, .. } | Self::Filesystem { name, .. } => Some(name),
            Self::Decode(_) | Self::InvalidRoot { .. } => None,
        }
    }

    /// Returns the failing filesystem primitive, if any.
    #[must_use]
    pub const fn operation(&self) -> Option<FsOperation> {
        match self {
            Self::Filesystem { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
