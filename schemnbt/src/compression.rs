//! The gzip or zlib wrapper that NBT files conventionally carry.
//!
//! Failures here are reported as [`DecodeError::DecompressionFailed`], never
//! as a structural decode error, so callers can tell a damaged container apart
//! from damaged NBT.

use std::borrow::Cow;
use std::io::{self, Read};

use flate2::read::{GzDecoder, ZlibDecoder};

use crate::error::{DecodeError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression applied around NBT data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw, uncompressed NBT.
    None,
    Gzip,
    Zlib,
    /// Pick one of the above by looking at the first bytes.
    #[default]
    Auto,
}

impl Compression {
    /// Guess the compression from the start of some data. Never returns
    /// `Auto`.
    ///
    /// Raw NBT always starts with a compound tag (`0x0a`), which is neither a
    /// gzip magic number nor a valid zlib header, so the guess is unambiguous
    /// for well-formed input.
    pub fn detect(bytes: &[u8]) -> Compression {
        match bytes {
            [a, b, ..] if [*a, *b] == GZIP_MAGIC => Compression::Gzip,
            [cmf, flg, ..] if is_zlib_header(*cmf, *flg) => Compression::Zlib,
            _ => Compression::None,
        }
    }
}

fn is_zlib_header(cmf: u8, flg: u8) -> bool {
    // Deflate method, window size no more than 32K, and the check bits.
    cmf & 0x0f == 8 && cmf >> 4 <= 7 && (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0
}

/// Remove the compression wrapper from a buffer. Uncompressed data is
/// borrowed rather than copied.
pub fn decompress(bytes: &[u8], compression: Compression) -> Result<Cow<'_, [u8]>> {
    let compression = match compression {
        Compression::Auto => Compression::detect(bytes),
        c => c,
    };

    let mut out = Vec::new();
    let res = match compression {
        Compression::None | Compression::Auto => return Ok(Cow::Borrowed(bytes)),
        Compression::Gzip => GzDecoder::new(bytes).read_to_end(&mut out),
        Compression::Zlib => ZlibDecoder::new(bytes).read_to_end(&mut out),
    };

    match res {
        Ok(_) => Ok(Cow::Owned(out)),
        Err(e) => Err(DecodeError::DecompressionFailed(e.to_string())),
    }
}

/// Read the first bytes of a stream to guess its compression. The bytes read
/// are returned so the caller can put them back in front of the stream.
///
/// Reads until two bytes are in hand or the stream ends, however few bytes
/// each read returns.
pub(crate) fn sniff<R: Read>(reader: &mut R) -> Result<(Compression, Vec<u8>)> {
    let mut head = Vec::with_capacity(GZIP_MAGIC.len());
    reader
        .by_ref()
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut head)?;
    Ok((Compression::detect(&head), head))
}

/// A decompression adapter whose failures are all reported as `InvalidData`.
///
/// flate2 signals compressed input that stops mid-stream with
/// `UnexpectedEof`, the same kind a short read of the decompressed NBT gets.
/// Renaming the kind keeps the two apart.
pub(crate) struct Inflate<R> {
    inner: R,
}

impl<R: Read> Inflate<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> Read for Inflate<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(|e| match e.kind() {
            io::ErrorKind::Interrupted => e,
            _ => io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }
}
