//! Contains the error and result type used by the decoder.
use std::fmt::Display;

use crate::Tag;

/// Various errors that can occur while decoding NBT.
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The input ended part way through a tag.
    UnexpectedEof,
    /// A tag kind byte outside `0..=12`.
    InvalidTagKind(u8),
    /// A string was not valid (modified) UTF-8.
    InvalidUtf8,
    /// An array length prefix was negative. Also used for negative list
    /// lengths when they are configured to be rejected.
    NegativeArrayLength(i32),
    /// Compounds and lists were nested deeper than the configured maximum.
    RecursionLimitExceeded(usize),
    /// The gzip or zlib wrapper around the data could not be decompressed.
    DecompressionFailed(String),
    /// A compound contained the same name twice.
    DuplicateKey(String),
    /// A list declared `End` as its element kind but a positive length.
    NonEmptyEndList(i32),
    /// The first tag of the input was not a compound.
    RootNotCompound(Tag),
    /// Bytes remained in the buffer after the root compound ended.
    TrailingData(usize),
    /// Any other failure of the underlying reader.
    Io(std::io::Error),
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, DecodeError>;

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnexpectedEof => f.write_str("eof: unexpectedly ran out of input"),
            DecodeError::InvalidTagKind(tag) => write!(f, "invalid nbt tag value: {}", tag),
            DecodeError::InvalidUtf8 => f.write_str("invalid nbt string: nonunicode"),
            DecodeError::NegativeArrayLength(len) => write!(f, "negative length: {}", len),
            DecodeError::RecursionLimitExceeded(max) => {
                write!(f, "nbt nested deeper than the limit of {}", max)
            }
            DecodeError::DecompressionFailed(msg) => write!(f, "decompression failed: {}", msg),
            DecodeError::DuplicateKey(key) => write!(f, "duplicate key in compound: {:?}", key),
            DecodeError::NonEmptyEndList(len) => {
                write!(f, "list of TAG_End with non-zero length: {}", len)
            }
            DecodeError::RootNotCompound(tag) => {
                write!(f, "invalid nbt: root is {} rather than a compound", tag)
            }
            DecodeError::TrailingData(n) => write!(f, "{} bytes left after root compound", n),
            DecodeError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => DecodeError::UnexpectedEof,
            _ => DecodeError::Io(e),
        }
    }
}

impl DecodeError {
    /// Whether this error came from the input ending early.
    pub fn is_eof(&self) -> bool {
        matches!(self, DecodeError::UnexpectedEof)
    }
}
