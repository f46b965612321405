//! Reader for Sponge schematic files, the format WorldEdit and similar tools
//! use to save a box of blocks.
//!
//! A schematic is a (usually gzipped) NBT file. [`read_schematic`] decodes it
//! with [`schemnbt`] and validates it into a [`Schematic`]: a palette of block
//! states, a dense volume of palette indices, block entities, entities and
//! some metadata. Validation is exhaustive. A file whose dimensions, palette
//! and block data disagree is rejected with a [`SchematicError`] rather than
//! producing a partially filled volume.
//!
//! ```no_run
//! use schematic_reader::read_schematic;
//!
//! # fn main() -> schematic_reader::Result<()> {
//! let bytes = std::fs::read("house.schem").unwrap();
//! let schematic = read_schematic(&bytes)?;
//!
//! let (width, height, length) = schematic.dimensions();
//! println!("{}x{}x{}", width, height, length);
//! println!("corner is {}", schematic.block_state_at(0, 0, 0)?);
//!
//! for block_entity in schematic.block_entities() {
//!     println!("{} at {:?}", block_entity.id(), block_entity.pos());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Leniency
//!
//! By default reading is strict. With [`Mode::Lenient`] left over block data
//! and unused palette entries are accepted and recorded as [`Warning`]s.
//! Lists with a negative length, which the NBT decoder reads as empty, are
//! always recorded. [`Schematic::is_lenient`] tells whether anything was
//! let through.

use std::io::Read;

mod block;
mod entity;
mod error;
mod interpret;
mod palette;
mod schematic;
mod varint;
mod volume;

pub use block::*;
pub use entity::{BlockEntity, Entity};
pub use error::*;
pub use interpret::{interpret, interpret_with_opts, Mode, ReadOpts};
pub use palette::Palette;
pub use schematic::*;
pub use volume::*;

#[cfg(test)]
mod test;

/// Read a schematic held in memory with strict validation. Gzip and zlib
/// compression are detected automatically.
pub fn read_schematic(bytes: &[u8]) -> Result<Schematic> {
    read_schematic_with_opts(bytes, &ReadOpts::new())
}

/// Read a schematic held in memory.
pub fn read_schematic_with_opts(bytes: &[u8], opts: &ReadOpts) -> Result<Schematic> {
    let root = schemnbt::decode_bytes(bytes, &opts.decode)?;
    let lenient_lists = root.lenient_lists;
    interpret::interpret_root(&root.into_value(), opts, lenient_lists)
}

/// Read a schematic from a stream in a single pass.
pub fn read_schematic_from_reader<R: Read>(reader: R, opts: &ReadOpts) -> Result<Schematic> {
    let root = schemnbt::decode(reader, &opts.decode)?;
    let lenient_lists = root.lenient_lists;
    interpret::interpret_root(&root.into_value(), opts, lenient_lists)
}
