//! Filesystem primitives used by the extraction engine.
//!
//! The engine never calls `std::fs` directly. It goes through [`Filesystem`],
//! which keeps the extraction policy (containment, gating, ordering, error
//! accumulation) separate from the syscalls, and lets tests observe or fail
//! individual primitives.

use std::fs;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use filetime::FileTime;

/// Buffer size for writing regular-file content.
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Primitive filesystem operations.
///
/// All paths passed in are already contained under the extraction root.
pub trait Filesystem {
    /// Writable handle for a regular file.
    type File: Write;

    /// Creates or truncates a regular file with the default mode (`0o666`
    /// before umask).
    fn create_file(&self, path: &Path) -> io::Result<Self::File>;

    /// Flushes and releases a file handle, reporting deferred write errors.
    fn close_file(&self, file: Self::File) -> io::Result<()>;

    /// Creates a directory and any missing parents (`0o777` before umask).
    /// Succeeds if the directory already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Creates `link` as a hard link to `target`.
    fn hard_link(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Creates `link` as a symbolic link pointing at `target`.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Sets access and modification times without following a final symlink.
    fn set_times(&self, path: &Path, atime: FileTime, mtime: FileTime) -> io::Result<()>;

    /// Sets permission bits.
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Sets numeric owner and group without following a final symlink.
    fn set_owner(&self, path: &Path, uid: u32, gid: u32) -> io::Result<()>;
}

/// [`Filesystem`] backed by the host operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFilesystem;

impl Filesystem for HostFilesystem {
    type File = BufWriter<fs::File>;

    fn create_file(&self, path: &Path) -> io::Result<Self::File> {
        let file = fs::File::create(path)?;
        Ok(BufWriter::with_capacity(WRITE_BUFFER_SIZE, file))
    }

    fn close_file(&self, file: Self::File) -> io::Result<()> {
        // into_inner flushes; the handle is closed when the File drops here
        file.into_inner().map_err(io::IntoInnerError::into_error)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn hard_link(&self, target: &Path, link: &Path) -> io::Result<()> {
        fs::hard_link(target, link)
    }

    #[allow(unused_variables)]
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(not(unix))]
        {
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "symlinks are not supported on this platform",
            ))
        }
    }

    fn set_times(&self, path: &Path, atime: FileTime, mtime: FileTime) -> io::Result<()> {
        filetime::set_symlink_file_times(path, atime, mtime)
    }

    #[allow(unused_variables)]
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode))
        }

        // Permission bits have no equivalent here; extraction still succeeds.
        #[cfg(not(unix))]
        {
            Ok(())
        }
    }

    #[allow(unused_variables)]
    fn set_owner(&self, path: &Path, uid: u32, gid: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::lchown(path, Some(uid), Some(gid))
        }

        #[cfg(not(unix))]
        {
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "numeric ownership is not supported on this platform",
            ))
        }
    }
}
