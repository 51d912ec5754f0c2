//! Extraction root directory type.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use super::SafePath;
use crate::ExtractionError;
use crate::Result;

/// The directory every extracted object is placed under.
///
/// The root is created if missing and stored as an absolute path. It is made
/// absolute but not canonicalized: symlinks in the root path itself are kept
/// as the caller spelled them, so re-rooted link targets carry the same prefix
/// the caller used.
///
/// Existing contents are not inspected. Extraction merges into or overwrites
/// whatever is already there.
///
/// # Examples
///
/// ```no_run
/// use tarutil_core::types::RootDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let root = RootDir::new("/var/lib/images/rootfs")?;
/// assert!(root.as_path().is_absolute());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDir(PathBuf);

impl RootDir {
    /// Creates (if needed) and validates the extraction root.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidRoot` if the directory cannot be
    /// created, exists but is not a directory, or cannot be made absolute.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let invalid = |source: io::Error| ExtractionError::InvalidRoot {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&path).map_err(invalid)?;

        let metadata = fs::metadata(&path).map_err(invalid)?;
        if !metadata.is_dir() {
            return Err(invalid(io::Error::new(
                io::ErrorKind::NotADirectory,
                "root is not a directory",
            )));
        }

        let absolute = std::path::absolute(&path).map_err(invalid)?;
        Ok(Self(absolute))
    }

    /// Returns the root as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a contained path to the root.
    ///
    /// The result always lies lexically within the root.
    #[inline]
    #[must_use]
    pub fn resolve(&self, safe_path: &SafePath) -> PathBuf {
        if safe_path.is_root() {
            return self.0.clone();
        }
        self.0.join(safe_path.as_path())
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
