//! Contained, best-effort extraction of tar streams.
//!
//! `tarutil-core` unpacks a tar stream under a root directory. Every entry
//! name and link target is normalized against that root, so the archive can
//! never reach outside it. Extraction keeps going after a failing entry and
//! reports the first error at the end.
//!
//! Hard links, symlinks, ownership, permissions and timestamps are opt-in via
//! [`ExtractOptions`]; by default only regular files and directories are
//! materialized, with the process umask deciding their modes.
//!
//! # Examples
//!
//! ```
//! use tarutil_core::ExtractOptions;
//! use tarutil_core::extract_all;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = tar::Builder::new(Vec::new());
//! let mut header = tar::Header::new_gnu();
//! header.set_entry_type(tar::EntryType::Directory);
//! header.set_size(0);
//! builder.append_data(&mut header, "a/", std::io::empty())?;
//! let mut header = tar::Header::new_gnu();
//! header.set_size(5);
//! builder.append_data(&mut header, "a/b.txt", &b"hello"[..])?;
//! let mut header = tar::Header::new_gnu();
//! header.set_entry_type(tar::EntryType::Symlink);
//! header.set_size(0);
//! builder.append_link(&mut header, "a/c", "b.txt")?;
//! let data = builder.into_inner()?;
//!
//! let root = tempfile::tempdir()?;
//! extract_all(&data[..], root.path(), ExtractOptions::SYMLINK)?;
//! assert_eq!(std::fs::read(root.path().join("a/c"))?, b"hello");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod filesystem;
pub mod formats;
pub mod report;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

pub use api::extract_all;
pub use api::extract_all_with_report;
pub use config::ExtractOptions;
pub use error::ExtractionError;
pub use error::FsOperation;
pub use error::Result;
pub use extraction::Extractor;
pub use filesystem::Filesystem;
pub use filesystem::HostFilesystem;
pub use formats::TarEntries;
pub use report::EntryOutcome;
pub use report::ExtractionReport;

pub use types::ArchiveEntry;
pub use types::EntryHeader;
pub use types::EntryKind;
pub use types::RootDir;
pub use types::SafePath;
