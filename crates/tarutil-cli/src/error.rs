//! Error conversion utilities for CLI.
//!
//! Converts tarutil-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::io;
use std::path::Path;
use tarutil_core::ExtractionError;
use tarutil_core::FsOperation;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::Decode(io_err) => {
            anyhow!(
                "Failed to read tar archive '{}': {}\n\
                 HINT: Compressed archives must be decompressed first, e.g. \
                 `zcat layer.tar.gz | tarutil extract -`.",
                archive.display(),
                io_err
            )
        }
        ExtractionError::UnsupportedType { tag, kind, name } => {
            anyhow!(
                "Unsupported entry in '{}': {} is a {} (type '{}')\n\
                 HINT: Device nodes and FIFOs are never created; all other entries were extracted.",
                archive.display(),
                name.display(),
                kind.description(),
                char::from(tag)
            )
        }
        ExtractionError::Filesystem {
            operation: FsOperation::Chown,
            name,
            source,
        } if source.kind() == io::ErrorKind::PermissionDenied => {
            anyhow!(
                "Cannot change owner of '{}' from '{}': {}\n\
                 HINT: --chown needs root privileges; drop it to keep the current user as owner.",
                name.display(),
                archive.display(),
                source
            )
        }
        ExtractionError::Filesystem {
            operation,
            name,
            source,
        } => {
            anyhow!(
                "Failed to {} '{}' from '{}': {}",
                operation,
                name.display(),
                archive.display(),
                source
            )
        }
        ExtractionError::InvalidRoot { path, source } => {
            anyhow!(
                "Cannot extract into '{}': {}\n\
                 HINT: The root must be a directory or a path that can be created.",
                path.display(),
                source
            )
        }
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}
