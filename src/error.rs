use std::io;
use std::path::PathBuf;
use thiserror::Error;

//===========================================================================//

/// Errors produced while reading bitmaps or building/validating packages.
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be opened.
    #[error("cannot open '{}' for reading: {source}", .path.display())]
    CannotOpen {
        /// The file that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// Memory for a file's contents could not be obtained.
    #[error("alloc failure (not enough resources for {0} bytes)")]
    Allocation(u64),
    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The payload does not fit in the header's 32-bit size fields.
    #[error("payload is too large (was {0} bytes, but max is {max})",
            max = crate::header::MAX_PAYLOAD_LEN)]
    PayloadTooLarge(u64),

    /// The file is too small to contain a package header.
    #[error("too short (was {0} bytes, but must be at least {len})",
            len = crate::layout::HEADER_LEN)]
    TooShort(u64),
    /// The header does not start with the package signature.
    #[error("invalid signature (was {0:?}, but must be \"USBPower\")")]
    InvalidSignature(String),
    /// The header kind marker does not designate an add-in.
    #[error("not an add-in (kind marker was {0:#04x}, but must be 0xf3)")]
    NotAnApplication(u8),
    /// One of the stored size fields disagrees with the actual file size.
    #[error("wrong file size (header says {first} and {second}, \
             but file is {expected} bytes)")]
    SizeMismatch {
        /// The actual size of the file.
        expected: u64,
        /// The size stored at offset 0x010.
        first: u32,
        /// The size stored at offset 0x1f0.
        second: u32,
    },
    /// The stored checksum bytes disagree with the stored size.
    #[error("wrong checksums (were {:#04x} and {:#04x}, \
             but must be {:#04x} and {:#04x})",
            .found.0, .found.1, .expected.0, .expected.1)]
    ChecksumMismatch {
        /// The checksums recomputed from the size field.
        expected: (u8, u8),
        /// The checksums stored in the header.
        found: (u8, u8),
    },

    /// The bitmap does not start with a recognized magic value.
    #[error("not a valid bmp file (signature was {0:02x?})")]
    InvalidBitmapSignature([u8; 2]),
    /// The bitmap's color depth is not one of 1, 16, 24 or 32.
    #[error("unsupported bmp depth {0}")]
    UnsupportedDepth(u16),
    /// The bitmap data ends before the structure it declares.
    #[error("truncated bmp file (needs {needed} bytes, but has {available})")]
    TruncatedBitmap {
        /// The number of bytes the bitmap needs.
        needed: u64,
        /// The number of bytes actually available.
        available: u64,
    },
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;

//===========================================================================//


//===========================================================================//
