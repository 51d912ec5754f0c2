//! Post-creation metadata.
//!
//! Steps run in a fixed order: times, mode, owner. The first failing step
//! ends the entry. Callers may treat this order as a compatibility contract.

use std::io;
use std::path::Path;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::Result;
use crate::error::FsOperation;
use crate::filesystem::Filesystem;
use crate::types::EntryHeader;
use crate::types::EntryKind;

/// Mode bits applied by `CHMOD`. Setuid, setgid and sticky bits are dropped.
pub const PERMISSION_BITS: u32 = 0o777;

/// Applies the enabled metadata steps to an extracted object.
///
/// - `CHTIMES`: atime/mtime, on the link itself for symlinks
/// - `CHMOD`: `mode & 0o777`; skipped for symlinks, which have no mode of
///   their own and would otherwise pass it on to their target
/// - `CHOWN`: numeric uid/gid via `lchown`
pub fn apply_metadata<F: Filesystem>(
    fs: &F,
    path: &Path,
    header: &EntryHeader,
    options: ExtractOptions,
) -> Result<()> {
    let name = header.name.as_path();

    if options.contains(ExtractOptions::CHTIMES) {
        fs.set_times(path, header.atime, header.mtime)
            .map_err(|e| ExtractionError::fs(FsOperation::Chtimes, name, e))?;
    }

    if options.contains(ExtractOptions::CHMOD) && !matches!(header.kind, EntryKind::Symlink { .. })
    {
        fs.set_mode(path, header.mode & PERMISSION_BITS)
            .map_err(|e| ExtractionError::fs(FsOperation::Chmod, name, e))?;
    }

    if options.contains(ExtractOptions::CHOWN) {
        numeric_owner(header)
            .and_then(|(uid, gid)| fs.set_owner(path, uid, gid))
            .map_err(|e| ExtractionError::fs(FsOperation::Chown, name, e))?;
    }

    Ok(())
}

/// Converts the header ids to the platform id width.
fn numeric_owner(header: &EntryHeader) -> io::Result<(u32, u32)> {
    let convert = |id: u64| {
        u32::try_from(id).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("owner id {id} does not fit the platform id type"),
            )
        })
    };
    Ok((convert(header.uid)?, convert(header.gid)?))
}
