//! File content copy with a reusable buffer.
//!
//! One buffer is allocated per extraction run and shared by every regular-file
//! entry, instead of `std::io::copy` allocating per call.

use std::io::Read;
use std::io::Write;
use std::io::{self};

use thiserror::Error;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap buffer reused across copy operations.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure of one side of [`copy_with_buffer`].
#[derive(Error, Debug)]
pub enum CopyError {
    /// The reader failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    /// The writer failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl CopyError {
    /// Returns the underlying I/O error.
    #[must_use]
    pub fn into_inner(self) -> io::Error {
        match self {
            Self::Read(e) | Self::Write(e) => e,
        }
    }
}

/// Copies everything from `reader` into `writer`, returning the byte count.
///
/// Interrupted reads are retried.
///
/// # Errors
///
/// Returns the first read or write error, tagged with the side that failed.
///
/// # Examples
///
/// ```
/// use tarutil_core::copy::{CopyBuffer, copy_with_buffer};
///
/// let mut buffer = CopyBuffer::new();
/// let mut input: &[u8] = b"hello";
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
/// assert_eq!(copied, 5);
/// assert_eq!(output, b"hello");
/// ```
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;
        total += bytes_read as u64;
    }

    Ok(total)
}
