//! Archive entry kind enumeration.

use std::fmt;
use std::path::PathBuf;

/// Kind of an entry in a tar stream.
///
/// The set is closed: every tar type tag maps to exactly one variant, and the
/// extraction engine matches on all of them without a wildcard arm.
///
/// # Examples
///
/// ```
/// use tarutil_core::types::EntryKind;
/// use std::path::PathBuf;
///
/// let symlink = EntryKind::Symlink {
///     target: PathBuf::from("../lib/libc.so.6"),
/// };
/// assert!(symlink.is_link());
/// assert_eq!(symlink.tag(), b'2');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,

    /// Hard link to another archive member.
    ///
    /// The target is raw archive content and has NOT been contained yet.
    Hardlink {
        /// The hard link target as stored in the archive.
        target: PathBuf,
    },

    /// Symbolic link.
    ///
    /// The target is raw archive content and has NOT been contained yet.
    Symlink {
        /// The symlink target as stored in the archive.
        target: PathBuf,
    },

    /// Directory.
    Directory,

    /// Contiguous-file / continuation record.
    Continuation,

    /// Per-entry extended header (PAX `x`, GNU long name/link).
    ExtendedHeader,

    /// Global extended header (PAX `g`).
    GlobalExtendedHeader,

    /// Character device node.
    CharDevice,

    /// Block device node.
    BlockDevice,

    /// Named pipe.
    Fifo,

    /// Any type tag without a defined meaning.
    Unknown(u8),
}

impl EntryKind {
    /// Returns the raw tar type tag for this kind.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::File => b'0',
            Self::Hardlink { .. } => b'1',
            Self::Symlink { .. } => b'2',
            Self::CharDevice => b'3',
            Self::BlockDevice => b'4',
            Self::Directory => b'5',
            Self::Fifo => b'6',
            Self::Continuation => b'7',
            Self::ExtendedHeader => b'x',
            Self::GlobalExtendedHeader => b'g',
            Self::Unknown(tag) => *tag,
        }
    }

    /// Human-readable description of the kind.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::File => "regular file",
            Self::Hardlink { .. } => "hard link",
            Self::Symlink { .. } => "symbolic link",
            Self::Directory => "directory",
            Self::Continuation => "continuation",
            Self::ExtendedHeader => "extended header",
            Self::GlobalExtendedHeader => "global extended header",
            Self::CharDevice => "character device",
            Self::BlockDevice => "block device",
            Self::Fifo => "fifo",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Returns `true` for hard links and symbolic links.
    #[must_use]
    pub const fn is_link(&self) -> bool {
        matches!(self, Self::Hardlink { .. } | Self::Symlink { .. })
    }

    /// Returns `true` for header-only records that produce no filesystem object.
    #[must_use]
    pub const fn is_header(&self) -> bool {
        matches!(
            self,
            Self::Continuation | Self::ExtendedHeader | Self::GlobalExtendedHeader
        )
    }

    /// Returns `true` for kinds the extractor refuses to create.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::CharDevice | Self::BlockDevice | Self::Fifo | Self::Unknown(_)
        )
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
