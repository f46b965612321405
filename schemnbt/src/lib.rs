//! schemnbt decodes NBT data from *Minecraft: Java Edition* into an owned,
//! self-describing tree of [`Value`]s. It is the lower layer of
//! `schematic-reader`, but knows nothing about schematics itself.
//!
//! * For the decoder and its options see [`de`].
//! * For the tree types see [`Value`], [`List`] and [`Compound`].
//! * For gzip/zlib handling see [`compression`].
//!
//! ```toml
//! [dependencies]
//! schemnbt = "0.1"
//! ```
//!
//! # Quick example
//!
//! Decode a (possibly compressed) buffer and look at a field of the root
//! compound.
//!
//! ```no_run
//! use schemnbt::{decode_tag_tree, Value};
//!
//! # fn main() -> schemnbt::error::Result<()> {
//! let bytes = std::fs::read("level.dat").unwrap();
//! let root = decode_tag_tree(&bytes)?;
//!
//! if let Some(Value::Int(version)) = root.get("DataVersion") {
//!     println!("data version: {}", version);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Leniency
//!
//! Historically some writers emitted lists with a negative length. By default
//! these decode as empty lists. The number of times this happened is kept in
//! [`Root::lenient_lists`] so callers can tell a lenient parse apart from a
//! clean one. Use [`NegativeListLen::Reject`] to turn it into an error instead.

pub mod compression;
pub mod de;
pub mod error;

mod input;
mod macros;
mod value;

pub use compression::Compression;
pub use de::{DecodeOpts, NegativeListLen, Root};
pub use error::DecodeError;
pub use value::*;

#[cfg(test)]
mod test;

use std::convert::TryFrom;
use std::fmt;
use std::io::Read;

/// An NBT tag kind. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same kind.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

// Written out by hand rather than derived. The tags will very rarely change.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::End => "TAG_End",
            Tag::Byte => "TAG_Byte",
            Tag::Short => "TAG_Short",
            Tag::Int => "TAG_Int",
            Tag::Long => "TAG_Long",
            Tag::Float => "TAG_Float",
            Tag::Double => "TAG_Double",
            Tag::ByteArray => "TAG_Byte_Array",
            Tag::String => "TAG_String",
            Tag::List => "TAG_List",
            Tag::Compound => "TAG_Compound",
            Tag::IntArray => "TAG_Int_Array",
            Tag::LongArray => "TAG_Long_Array",
        };
        f.write_str(name)
    }
}

/// Decode a whole NBT file held in memory. Compression is detected from the
/// first bytes, see [`Compression::detect`]. The root compound is returned as
/// a [`Value::Compound`]; use [`decode`] if the root name or leniency
/// information is needed.
pub fn decode_tag_tree(bytes: &[u8]) -> error::Result<Value> {
    decode_bytes(bytes, &DecodeOpts::new()).map(Root::into_value)
}

/// Decode a whole NBT file held in memory, removing the compression chosen by
/// `opts` first. Like [`de::from_bytes`], the decompressed data must end with
/// the root compound.
pub fn decode_bytes(bytes: &[u8], opts: &DecodeOpts) -> error::Result<Root> {
    let data = compression::decompress(bytes, opts.compression)?;
    de::from_bytes_with_opts(&data, opts)
}

/// Decode NBT from a stream, applying the decompression adapter chosen by
/// `opts`. The stream is read in a single forward pass.
///
/// With [`Compression::Auto`] the first two bytes are read to pick the
/// adapter and then chained back in front of the rest of the stream.
///
/// A compressed stream is read to its end so that its checksum is verified.
/// Like [`decode_bytes`], decompressed data after the root compound is then
/// [`DecodeError::TrailingData`]. An uncompressed stream is left positioned
/// just after the root compound.
pub fn decode<R: Read>(mut reader: R, opts: &DecodeOpts) -> error::Result<Root> {
    match opts.compression {
        Compression::Auto => {
            let (detected, head) = compression::sniff(&mut reader)?;
            decode_as(std::io::Cursor::new(head).chain(reader), detected, opts)
        }
        compression => decode_as(reader, compression, opts),
    }
}

fn decode_as<R: Read>(reader: R, compression: Compression, opts: &DecodeOpts) -> error::Result<Root> {
    match compression {
        Compression::Gzip => de::from_compressed_reader(flate2::read::GzDecoder::new(reader), opts),
        Compression::Zlib => de::from_compressed_reader(flate2::read::ZlibDecoder::new(reader), opts),
        Compression::None | Compression::Auto => de::from_reader_with_opts(reader, opts),
    }
}
