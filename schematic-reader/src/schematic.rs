use std::collections::BTreeMap;
use std::fmt;

use schemnbt::Compound;

use crate::error::{Result, SchematicError};
use crate::{BlockEntity, BlockState, BlockVolume, Entity, Palette};

/// Something that was accepted but is not quite right. Only produced when
/// reading was allowed to be lenient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// This many NBT lists had a negative length and were read as empty.
    NegativeListLength(usize),
    /// Values were left over in a block or biome data array.
    TrailingBlockData { field: &'static str, count: usize },
    /// Palette entries that no cell refers to.
    UnusedPaletteEntries { field: &'static str, count: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NegativeListLength(n) => {
                write!(f, "{} lists with negative length read as empty", n)
            }
            Warning::TrailingBlockData { field, count } => {
                write!(f, "{}: {} unused values after the volume", field, count)
            }
            Warning::UnusedPaletteEntries { field, count } => {
                write!(f, "{}: {} palette entries are never used", field, count)
            }
        }
    }
}

/// A fully validated schematic. Built once by the interpreter and never
/// changed afterwards.
///
/// Positions are relative to the schematic's own corner. Add
/// [`Schematic::offset`] to place it in a world.
#[derive(Debug, Clone)]
pub struct Schematic {
    pub(crate) version: Option<i32>,
    pub(crate) data_version: Option<i32>,
    pub(crate) offset: [i32; 3],
    pub(crate) metadata: Option<Compound>,
    pub(crate) palette: Palette,
    pub(crate) blocks: BlockVolume,
    // Keyed by cell index, so iteration follows the volume's cell order.
    pub(crate) block_entities: BTreeMap<usize, BlockEntity>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) biomes: Option<(Palette, BlockVolume)>,
    pub(crate) warnings: Vec<Warning>,
}

impl Schematic {
    /// `(width, height, length)`, the sizes along x, y and z.
    pub fn dimensions(&self) -> (i32, i32, i32) {
        self.blocks.dimensions()
    }

    /// The palette index of the block at a position.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Result<u32> {
        self.blocks
            .get(x, y, z)
            .ok_or(SchematicError::OutOfBounds { x, y, z })
    }

    /// The block state string of the block at a position.
    pub fn block_state_at(&self, x: i32, y: i32, z: i32) -> Result<&str> {
        let index = self.block_at(x, y, z)?;
        // Every stored index was checked against the palette.
        Ok(self.palette.get(index).unwrap_or_default())
    }

    /// Like [`Schematic::block_state_at`] but split into its parts. `None`
    /// when the palette entry is not a well formed block state.
    pub fn parsed_block_at(&self, x: i32, y: i32, z: i32) -> Result<Option<BlockState>> {
        Ok(BlockState::parse(self.block_state_at(x, y, z)?))
    }

    pub fn palette_entry(&self, index: u32) -> Option<&str> {
        self.palette.get(index)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn volume(&self) -> &BlockVolume {
        &self.blocks
    }

    /// Block entities in cell order. Each call starts a new traversal.
    pub fn block_entities(&self) -> impl Iterator<Item = &BlockEntity> + '_ {
        self.block_entities.values()
    }

    pub fn block_entity_at(&self, x: i32, y: i32, z: i32) -> Result<Option<&BlockEntity>> {
        let index = self
            .blocks
            .index(x, y, z)
            .ok_or(SchematicError::OutOfBounds { x, y, z })?;
        Ok(self.block_entities.get(&index))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The biome at a position, or `None` if the schematic stores no biomes.
    pub fn biome_at(&self, x: i32, y: i32, z: i32) -> Result<Option<&str>> {
        // Biomes share the block volume's dimensions, so the cell index is
        // the same.
        let index = self
            .blocks
            .index(x, y, z)
            .ok_or(SchematicError::OutOfBounds { x, y, z })?;

        Ok(self
            .biomes
            .as_ref()
            .and_then(|(palette, volume)| palette.get(volume.as_slice()[index])))
    }

    pub fn biome_palette(&self) -> Option<&Palette> {
        self.biomes.as_ref().map(|(palette, _)| palette)
    }

    /// Where the schematic's corner is meant to be placed, `[0, 0, 0]` when
    /// the file does not say.
    pub fn offset(&self) -> [i32; 3] {
        self.offset
    }

    /// The `Version` field of the file, if present.
    pub fn version(&self) -> Option<i32> {
        self.version
    }

    /// The Minecraft data version the file was written with.
    pub fn data_version(&self) -> Option<i32> {
        self.data_version
    }

    pub fn metadata(&self) -> Option<&Compound> {
        self.metadata.as_ref()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether anything was accepted only through leniency. The details are in
    /// [`Schematic::warnings`].
    pub fn is_lenient(&self) -> bool {
        !self.warnings.is_empty()
    }
}
