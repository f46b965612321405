//! LEB128 style unsigned varints, as packed into schematic block data. Each
//! byte carries seven bits, least significant first, and the high bit marks
//! that another byte follows.

use crate::error::{Result, SchematicError};

/// A 32 bit value never needs more than this many bytes.
pub(crate) const MAX_BYTES: usize = 5;

/// Decode one varint starting at `offset`, returning it and its length in
/// bytes.
pub(crate) fn decode(data: &[i8], offset: usize) -> Result<(u32, usize)> {
    let mut result: u32 = 0;

    for i in 0..MAX_BYTES {
        let byte = *data
            .get(offset + i)
            .ok_or(SchematicError::TruncatedBlockData)? as u8;

        let bits = u32::from(byte & 0x7f);
        // The fifth byte only has room for the top four bits.
        if i == MAX_BYTES - 1 && bits > 0x0f {
            return Err(SchematicError::VarIntTooLong { offset });
        }

        result |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    Err(SchematicError::VarIntTooLong { offset })
}

/// Decode exactly `count` varints from the start of `data`. Returns the
/// values and the number of bytes they took up; anything after that is left
/// for the caller to judge.
pub(crate) fn decode_all(data: &[i8], count: usize) -> Result<(Vec<u32>, usize)> {
    // Each value takes at least one byte.
    if data.len() < count {
        return Err(SchematicError::TruncatedBlockData);
    }

    let mut values = Vec::with_capacity(count);
    let mut offset = 0;
    while values.len() < count {
        let (value, len) = decode(data, offset)?;
        values.push(value);
        offset += len;
    }

    Ok((values, offset))
}
