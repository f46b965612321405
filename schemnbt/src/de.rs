//! Decoding of binary NBT into an owned [`Value`] tree.
//!
//! The format is a sequence of tags. Each tag is a kind byte, a big-endian
//! `u16` length-prefixed name, and a payload determined by the kind. A file
//! holds exactly one named root compound.
//!
//! ```
//! use schemnbt::de::{from_bytes_with_opts, DecodeOpts};
//!
//! // An empty compound named "hi".
//! let data = [0x0a, 0x00, 0x02, b'h', b'i', 0x00];
//! let root = from_bytes_with_opts(&data, &DecodeOpts::new().max_depth(8)).unwrap();
//!
//! assert_eq!(root.name, "hi");
//! assert!(root.compound.is_empty());
//! ```
//!
//! # Nesting
//!
//! Compounds and lists are decoded recursively, but the depth is tracked
//! explicitly and checked against [`DecodeOpts::max_depth`] before entering a
//! new level. Adversarial input fails with
//! [`DecodeError::RecursionLimitExceeded`] rather than overflowing the stack.
//!
//! # Negative list lengths
//!
//! A list with a negative length decodes as an empty list of its declared
//! kind, matching what Minecraft itself does. Each time this happens
//! [`Root::lenient_lists`] is incremented. [`NegativeListLen::Reject`] makes
//! it a [`DecodeError::NegativeArrayLength`] error instead. Negative lengths
//! for byte, int and long arrays are always an error.

use std::io::{self, Read};

use serde::Serialize;

use crate::compression::Inflate;
use crate::error::{DecodeError, Result};
use crate::input::{Input, Reader, Slice};
use crate::{Compound, Compression, List, Tag, Value};

/// The nesting limit Minecraft itself applies to NBT.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// What to do with a list whose length prefix is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeListLen {
    /// Decode as an empty list and count it in [`Root::lenient_lists`].
    #[default]
    AsEmpty,
    /// Fail with [`DecodeError::NegativeArrayLength`].
    Reject,
}

/// Options for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOpts {
    pub(crate) max_depth: usize,
    pub(crate) negative_list_len: NegativeListLen,
    pub(crate) compression: Compression,
}

impl DecodeOpts {
    /// Create the default options.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            negative_list_len: NegativeListLen::AsEmpty,
            compression: Compression::Auto,
        }
    }

    /// Maximum nesting of compounds and lists. The root compound counts as
    /// depth 1. Defaults to 512.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// How negative list lengths are treated. Defaults to
    /// [`NegativeListLen::AsEmpty`].
    pub fn negative_list_len(mut self, value: NegativeListLen) -> Self {
        self.negative_list_len = value;
        self
    }

    /// Compression wrapped around the data. Only used by [`crate::decode`],
    /// the `from_*` functions here always expect raw NBT. Defaults to
    /// [`Compression::Auto`].
    pub fn compression(mut self, value: Compression) -> Self {
        self.compression = value;
        self
    }
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// The named root compound of an NBT file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Root {
    /// Name of the root tag, usually empty.
    pub name: String,
    pub compound: Compound,
    /// How many lists had a negative length and were read as empty.
    pub lenient_lists: usize,
}

impl Root {
    /// Whether decoding had to apply any leniency.
    pub fn is_lenient(&self) -> bool {
        self.lenient_lists > 0
    }

    /// The root compound as a [`Value`], dropping the name.
    pub fn into_value(self) -> Value {
        Value::Compound(self.compound)
    }
}

/// Decode raw NBT held in memory with default options. The whole buffer must
/// be consumed by the root compound.
pub fn from_bytes(input: &[u8]) -> Result<Root> {
    from_bytes_with_opts(input, &DecodeOpts::new())
}

/// Decode raw NBT held in memory. The whole buffer must be consumed by the
/// root compound, otherwise [`DecodeError::TrailingData`] is returned.
pub fn from_bytes_with_opts(input: &[u8], opts: &DecodeOpts) -> Result<Root> {
    let mut decoder = Decoder::new(Slice { data: input }, opts);
    let root = decoder.decode_root()?;

    match decoder.input.remaining() {
        Some(0) | None => Ok(root),
        Some(n) => Err(DecodeError::TrailingData(n)),
    }
}

/// Decode raw NBT from a reader with default options. Only the bytes of the
/// root compound are consumed.
pub fn from_reader<R: Read>(reader: R) -> Result<Root> {
    from_reader_with_opts(reader, &DecodeOpts::new())
}

/// Decode raw NBT from a reader. Only the bytes of the root compound are
/// consumed; anything after it is left in the reader.
pub fn from_reader_with_opts<R: Read>(reader: R, opts: &DecodeOpts) -> Result<Root> {
    Decoder::new(
        Reader {
            reader,
            compressed: false,
        },
        opts,
    )
    .decode_root()
}

/// Decode from a decompression adapter. Failures of the adapter, including a
/// bad checksum in the trailer, are [`DecodeError::DecompressionFailed`].
pub(crate) fn from_compressed_reader<R: Read>(reader: R, opts: &DecodeOpts) -> Result<Root> {
    let mut decoder = Decoder::new(
        Reader {
            reader: Inflate::new(reader),
            compressed: true,
        },
        opts,
    );
    let root = decoder.decode_root()?;

    // The trailer is only checked once the adapter reaches the end.
    let rest = io::copy(&mut decoder.input.reader, &mut io::sink())
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

    match rest {
        0 => Ok(root),
        n => Err(DecodeError::TrailingData(n as usize)),
    }
}

struct Decoder<'o, I: Input> {
    input: I,
    opts: &'o DecodeOpts,
    lenient_lists: usize,
}

impl<'o, I: Input> Decoder<'o, I> {
    fn new(input: I, opts: &'o DecodeOpts) -> Self {
        Self {
            input,
            opts,
            lenient_lists: 0,
        }
    }

    fn decode_root(&mut self) -> Result<Root> {
        let tag = self.input.consume_tag()?;
        if tag != Tag::Compound {
            return Err(DecodeError::RootNotCompound(tag));
        }

        let name = self.input.consume_str()?;
        let compound = self.decode_compound(1)?;

        Ok(Root {
            name,
            compound,
            lenient_lists: self.lenient_lists,
        })
    }

    /// `depth` is the depth of the container about to be entered.
    fn enter(&self, depth: usize) -> Result<()> {
        if depth > self.opts.max_depth {
            Err(DecodeError::RecursionLimitExceeded(self.opts.max_depth))
        } else {
            Ok(())
        }
    }

    fn decode_compound(&mut self, depth: usize) -> Result<Compound> {
        self.enter(depth)?;
        let mut compound = Compound::new();

        loop {
            let tag = self.input.consume_tag()?;
            if tag == Tag::End {
                return Ok(compound);
            }

            let name = self.input.consume_str()?;
            let value = self.decode_payload(tag, depth)?;

            if compound.contains_key(&name) {
                return Err(DecodeError::DuplicateKey(name));
            }
            compound.insert(name, value);
        }
    }

    fn decode_list(&mut self, depth: usize) -> Result<List> {
        self.enter(depth)?;
        let element = self.input.consume_tag()?;
        let len = self.input.consume_i32()?;

        let len = if len < 0 {
            match self.opts.negative_list_len {
                NegativeListLen::AsEmpty => {
                    self.lenient_lists += 1;
                    0
                }
                NegativeListLen::Reject => return Err(DecodeError::NegativeArrayLength(len)),
            }
        } else {
            len as usize
        };

        if element == Tag::End && len > 0 {
            return Err(DecodeError::NonEmptyEndList(len as i32));
        }

        // Every element takes at least one byte, so a known remaining size
        // bounds the allocation.
        let cap = match self.input.remaining() {
            Some(remaining) => len.min(remaining),
            None => len.min(1024),
        };
        let mut values = Vec::with_capacity(cap);
        for _ in 0..len {
            values.push(self.decode_payload(element, depth)?);
        }

        Ok(List::from_decoded(element, values))
    }

    /// Decode the payload of a `tag` found inside a container at `depth`.
    fn decode_payload(&mut self, tag: Tag, depth: usize) -> Result<Value> {
        Ok(match tag {
            Tag::End => unreachable!("end tags have no payload"),
            Tag::Byte => Value::Byte(self.input.consume_byte()? as i8),
            Tag::Short => Value::Short(self.input.consume_i16()?),
            Tag::Int => Value::Int(self.input.consume_i32()?),
            Tag::Long => Value::Long(self.input.consume_i64()?),
            Tag::Float => Value::Float(self.input.consume_f32()?),
            Tag::Double => Value::Double(self.input.consume_f64()?),
            Tag::String => Value::String(self.input.consume_str()?),
            Tag::ByteArray => {
                let len = self.input.consume_i32()?;
                Value::ByteArray(self.input.consume_byte_array(len)?)
            }
            Tag::IntArray => {
                let len = self.input.consume_i32()?;
                Value::IntArray(self.input.consume_int_array(len)?)
            }
            Tag::LongArray => {
                let len = self.input.consume_i32()?;
                Value::LongArray(self.input.consume_long_array(len)?)
            }
            Tag::List => Value::List(self.decode_list(depth + 1)?),
            Tag::Compound => Value::Compound(self.decode_compound(depth + 1)?),
        })
    }
}
