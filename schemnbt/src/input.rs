use std::io::Read;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

use crate::{
    error::{DecodeError, Result},
    Tag,
};

mod private {
    // Only this crate can implement this trait. Other traits can inherit from
    // Sealed in order to prevent other crates from creating implementations.
    pub trait Sealed {}
}

/// Converts an NBT length prefix into a byte count for elements of
/// `multiplier` bytes each.
pub(crate) fn try_size(size: i32, multiplier: usize) -> Result<usize> {
    let size: usize = size
        .try_into()
        .map_err(|_| DecodeError::NegativeArrayLength(size))?;

    // Only reachable on 32 bit targets, where that much input cannot exist.
    size.checked_mul(multiplier)
        .ok_or(DecodeError::UnexpectedEof)
}

/// A sequential source of big-endian NBT primitives.
pub trait Input: private::Sealed {
    fn consume_byte(&mut self) -> Result<u8>;
    fn consume_i16(&mut self) -> Result<i16>;
    fn consume_u16(&mut self) -> Result<u16>;
    fn consume_i32(&mut self) -> Result<i32>;
    fn consume_i64(&mut self) -> Result<i64>;
    fn consume_f32(&mut self) -> Result<f32>;
    fn consume_f64(&mut self) -> Result<f64>;

    /// Read exactly `n` bytes. Implementations must not allocate `n` bytes
    /// before knowing they exist.
    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Bytes left in the input, if that is knowable without reading it.
    fn remaining(&self) -> Option<usize> {
        None
    }

    fn consume_tag(&mut self) -> Result<Tag> {
        let tag = self.consume_byte()?;
        Tag::try_from(tag).map_err(|_| DecodeError::InvalidTagKind(tag))
    }

    fn consume_str(&mut self) -> Result<String> {
        let len = self.consume_u16()? as usize;
        let bytes = self.consume_bytes(len)?;

        // Java's modified UTF-8 only differs from UTF-8 for NUL and
        // supplementary characters, so most strings take the first branch.
        match String::from_utf8(bytes) {
            Ok(s) => Ok(s),
            Err(e) => decode_java_str(e.as_bytes()),
        }
    }

    fn consume_byte_array(&mut self, len: i32) -> Result<Vec<i8>> {
        let bytes = self.consume_bytes(try_size(len, 1)?)?;
        Ok(bytes.into_iter().map(|b| b as i8).collect())
    }

    fn consume_int_array(&mut self, len: i32) -> Result<Vec<i32>> {
        let bytes = self.consume_bytes(try_size(len, std::mem::size_of::<i32>())?)?;
        let mut out = vec![0; bytes.len() / std::mem::size_of::<i32>()];
        BigEndian::read_i32_into(&bytes, &mut out);
        Ok(out)
    }

    fn consume_long_array(&mut self, len: i32) -> Result<Vec<i64>> {
        let bytes = self.consume_bytes(try_size(len, std::mem::size_of::<i64>())?)?;
        let mut out = vec![0; bytes.len() / std::mem::size_of::<i64>()];
        BigEndian::read_i64_into(&bytes, &mut out);
        Ok(out)
    }
}

fn decode_java_str(bytes: &[u8]) -> Result<String> {
    cesu8::from_java_cesu8(bytes)
        .map(|s| s.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Input backed by an in-memory buffer.
pub struct Slice<'a> {
    pub(crate) data: &'a [u8],
}

impl<'a> private::Sealed for Slice<'a> {}

impl<'a> Slice<'a> {
    fn consume(&mut self, n: usize) -> Result<&'a [u8]> {
        if n <= self.data.len() {
            let (ret, rest) = self.data.split_at(n);
            self.data = rest;
            Ok(ret)
        } else {
            Err(DecodeError::UnexpectedEof)
        }
    }
}

impl<'a> Input for Slice<'a> {
    fn consume_byte(&mut self) -> Result<u8> {
        Ok(self.consume(1)?[0])
    }

    fn consume_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.consume(2)?))
    }

    fn consume_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.consume(2)?))
    }

    fn consume_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.consume(4)?))
    }

    fn consume_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.consume(8)?))
    }

    fn consume_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.consume(4)?))
    }

    fn consume_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.consume(8)?))
    }

    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.consume(n)?.to_vec())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.data.len())
    }
}

/// Input backed by any `Read`. When `compressed` is set the reader is a
/// decompression adapter, and its non-EOF failures are reported as
/// [`DecodeError::DecompressionFailed`].
pub struct Reader<R: Read> {
    pub(crate) reader: R,
    pub(crate) compressed: bool,
}

impl<R: Read> private::Sealed for Reader<R> {}

impl<R: Read> Reader<R> {
    fn map_err(&self, e: std::io::Error) -> DecodeError {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => DecodeError::UnexpectedEof,
            _ if self.compressed => DecodeError::DecompressionFailed(e.to_string()),
            _ => DecodeError::Io(e),
        }
    }
}

impl<R: Read> Input for Reader<R> {
    fn consume_byte(&mut self) -> Result<u8> {
        self.reader.read_u8().map_err(|e| self.map_err(e))
    }

    fn consume_i16(&mut self) -> Result<i16> {
        self.reader
            .read_i16::<BigEndian>()
            .map_err(|e| self.map_err(e))
    }

    fn consume_u16(&mut self) -> Result<u16> {
        self.reader
            .read_u16::<BigEndian>()
            .map_err(|e| self.map_err(e))
    }

    fn consume_i32(&mut self) -> Result<i32> {
        self.reader
            .read_i32::<BigEndian>()
            .map_err(|e| self.map_err(e))
    }

    fn consume_i64(&mut self) -> Result<i64> {
        self.reader
            .read_i64::<BigEndian>()
            .map_err(|e| self.map_err(e))
    }

    fn consume_f32(&mut self) -> Result<f32> {
        self.reader
            .read_f32::<BigEndian>()
            .map_err(|e| self.map_err(e))
    }

    fn consume_f64(&mut self) -> Result<f64> {
        self.reader
            .read_f64::<BigEndian>()
            .map_err(|e| self.map_err(e))
    }

    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        // The length comes from the input, so grow the buffer as data actually
        // arrives rather than trusting it up front.
        let mut buf = Vec::with_capacity(n.min(64 * 1024));
        let read = (&mut self.reader).take(n as u64).read_to_end(&mut buf);
        let read = read.map_err(|e| self.map_err(e))?;

        if read != n {
            return Err(DecodeError::UnexpectedEof);
        }
        Ok(buf)
    }
}
