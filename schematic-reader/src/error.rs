use std::fmt::Display;

use schemnbt::{DecodeError, Tag};

/// Why a schematic could not be read, or a query on it failed.
#[derive(Debug)]
#[non_exhaustive]
pub enum SchematicError {
    /// The NBT itself could not be decoded.
    Decode(DecodeError),
    MissingField(&'static str),
    WrongType {
        field: &'static str,
        expected: Tag,
        found: Tag,
    },
    /// A field had the right type but an unusable value.
    InvalidField {
        field: &'static str,
        reason: String,
    },
    /// A width, height or length that is not positive, or a volume too large
    /// to index.
    InvalidDimensions {
        width: i64,
        height: i64,
        length: i64,
    },
    /// The palette does not use every index from 0 to its size.
    PaletteGap { missing: u32 },
    /// Two palette entries share an index, or a list palette repeats a name.
    DuplicatePaletteEntry { entry: String, index: u32 },
    NegativePaletteIndex { entry: String, index: i64 },
    /// `PaletteMax` disagrees with the number of palette entries.
    PaletteSizeMismatch { declared: i64, actual: usize },
    /// The block data ran out before every cell had an index.
    TruncatedBlockData,
    /// Bytes (or ints) left over after every cell had an index.
    TrailingBytes(usize),
    /// A varint in the block data at `offset` did not fit in 32 bits.
    VarIntTooLong { offset: usize },
    NegativeBlockIndex(i32),
    InvalidPaletteReference { index: u32, max: u32 },
    /// A palette entry no cell refers to.
    UnusedPaletteEntry(u32),
    BlockEntityOutOfBounds { x: i32, y: i32, z: i32 },
    DuplicateBlockEntity { x: i32, y: i32, z: i32 },
    UnsupportedVersion(i32),
    /// A query for a position outside the schematic.
    OutOfBounds { x: i32, y: i32, z: i32 },
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, SchematicError>;

impl From<DecodeError> for SchematicError {
    fn from(e: DecodeError) -> Self {
        SchematicError::Decode(e)
    }
}

impl std::error::Error for SchematicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchematicError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for SchematicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SchematicError::*;
        match self {
            Decode(e) => write!(f, "invalid nbt: {}", e),
            MissingField(field) => write!(f, "missing field {}", field),
            WrongType {
                field,
                expected,
                found,
            } => write!(f, "field {} should be {}, found {}", field, expected, found),
            InvalidField { field, reason } => write!(f, "invalid field {}: {}", field, reason),
            InvalidDimensions {
                width,
                height,
                length,
            } => write!(f, "invalid dimensions {}x{}x{}", width, height, length),
            PaletteGap { missing } => write!(f, "palette has no entry for index {}", missing),
            DuplicatePaletteEntry { entry, index } => {
                write!(f, "duplicate palette entry {:?} at index {}", entry, index)
            }
            NegativePaletteIndex { entry, index } => {
                write!(f, "palette entry {:?} has negative index {}", entry, index)
            }
            PaletteSizeMismatch { declared, actual } => write!(
                f,
                "PaletteMax is {} but the palette has {} entries",
                declared, actual
            ),
            TruncatedBlockData => f.write_str("block data ended before the volume was filled"),
            TrailingBytes(n) => write!(f, "{} unused values after block data", n),
            VarIntTooLong { offset } => write!(f, "varint at byte {} is too long", offset),
            NegativeBlockIndex(i) => write!(f, "negative block index {}", i),
            InvalidPaletteReference { index, max } => write!(
                f,
                "block index {} out of range for palette of {} entries",
                index, max
            ),
            UnusedPaletteEntry(i) => write!(f, "palette entry {} is never used", i),
            BlockEntityOutOfBounds { x, y, z } => {
                write!(f, "block entity at {} {} {} is outside the volume", x, y, z)
            }
            DuplicateBlockEntity { x, y, z } => {
                write!(f, "more than one block entity at {} {} {}", x, y, z)
            }
            UnsupportedVersion(v) => write!(f, "unsupported schematic version {}", v),
            OutOfBounds { x, y, z } => write!(f, "position {} {} {} is out of bounds", x, y, z),
        }
    }
}
