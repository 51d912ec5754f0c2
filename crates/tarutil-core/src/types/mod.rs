//! Types shared by the decoder adapter and the extraction engine.
//!
//! Path types here are the containment boundary: an archive name only reaches
//! the filesystem after being turned into a [`SafePath`] and joined to a
//! [`RootDir`].

pub mod entry;
pub mod entry_kind;
pub mod root_dir;
pub mod safe_path;

pub use entry::ArchiveEntry;
pub use entry::EntryHeader;
pub use entry_kind::EntryKind;
pub use root_dir::RootDir;
pub use safe_path::SafePath;
pub use safe_path::normalize_entry_path;
