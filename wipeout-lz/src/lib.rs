//! Wipeout-LZ: CMP archive decompressor
//!
//! CMP files bundle several files (usually TIM images) into one LZ77-style
//! compressed stream. This crate only undoes the compression and splits the
//! result; interpreting the embedded files is up to the caller.
//!
//! # Archive Format
//!
//! ```text
//! 0x00: file_count u32 LE
//! 0x04: file_count × length u32 LE
//! ....: packed bitstream (MSB-first within each byte)
//! ```
//!
//! # Bitstream
//!
//! Tokens repeat until the end marker or until the declared output is full:
//!
//! ```text
//! 1 + 8 bits            literal byte
//! 0 + 13 bits + 4 bits  back-reference: window position, length - 2
//! 0 + 13 zero bits      end of stream
//! ```
//!
//! A back-reference with length field `L` copies `L + 3` bytes from the
//! 8 KiB circular window, starting at the absolute window position. There is
//! no checksum: a damaged stream decodes to wrong bytes or ends early.
//!
//! # Usage
//!
//! ```ignore
//! let archive = std::fs::read("LIBRARY.CMP")?;
//! for (i, file) in wipeout_lz::unpack(&archive)?.iter().enumerate() {
//!     println!("file {}: {} bytes", i, file.len());
//! }
//! ```

mod decode;
mod header;

#[cfg(test)]
mod bitstream;

pub use decode::{decompress, max_output};
pub use header::ArchiveHeader;

// =============================================================================
// Constants
// =============================================================================

/// Size of the circular back-reference window
pub const WINDOW_SIZE: usize = 0x2000;

/// Mask that wraps window positions
pub const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// First window position written by the decoder
pub const WINDOW_START: usize = 1;

/// Smallest value added to a back-reference length field
pub const MIN_MATCH: usize = 2;

// =============================================================================
// Error Type
// =============================================================================

/// Errors that can occur while unpacking a CMP archive
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LzError {
    /// Not even a file count
    #[error("archive too small for a file count ({0} bytes)")]
    TooSmall(usize),

    /// The length table runs past the end of the buffer
    #[error("archive declares {count} files but is only {len} bytes long")]
    TruncatedHeader { count: usize, len: usize },

    /// The declared lengths do not fit in memory
    #[error("declared file lengths overflow")]
    LengthOverflow,

    /// The header declares more output than the packed stream can produce
    #[error("archive declares {declared} bytes but its stream yields at most {max}")]
    DeclaredTooLarge { declared: usize, max: usize },

    /// The stream ended before producing any byte of a non-empty file
    #[error("stream ended before file {index} ({declared} bytes declared)")]
    EmptyFile { index: usize, declared: usize },
}

// =============================================================================
// Unpacking
// =============================================================================

/// Decompress an archive and split it into its embedded files.
///
/// Files that the stream only partly covers keep their declared length and
/// are zero-filled past the last decoded byte.
pub fn unpack(buffer: &[u8]) -> Result<Vec<Vec<u8>>, LzError> {
    let header = ArchiveHeader::parse(buffer)?;
    let total = header.total_length()?;
    let packed = &buffer[header.byte_length()..];
    decode::check_total(packed.len(), total)?;

    let output = decode::Decoder::new(packed).run(total);
    tracing::debug!(
        files = header.lengths.len(),
        total,
        produced = output.produced,
        "unpacked archive"
    );
    if output.produced < total {
        tracing::warn!(
            "stream ended after {} of {} bytes",
            output.produced,
            total
        );
    }

    let mut files = Vec::with_capacity(header.lengths.len());
    let mut start = 0;
    for (index, &declared) in header.lengths.iter().enumerate() {
        if declared > 0 && start >= output.produced {
            return Err(LzError::EmptyFile { index, declared });
        }
        files.push(output.data[start..start + declared].to_vec());
        start += declared;
    }

    Ok(files)
}

// =============================================================================
// Tests
// =============================================================================
