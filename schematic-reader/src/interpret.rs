//! Turning a decoded tag tree into a [`Schematic`].
//!
//! Two layouts of the Sponge schematic format are understood. Version 3 nests
//! everything in a `Schematic` compound, with block data under `Blocks` and
//! optional biome data under `Biomes`. Versions 1 and 2 keep `Palette`,
//! `BlockData` and the block entities directly in the root. The layout is
//! picked by whether a `Blocks` compound is present.

use std::collections::BTreeMap;

use log::{debug, warn};
use schemnbt::{Compound, DecodeOpts, Tag, Value};

use crate::entity::{read_block_entity, read_entity};
use crate::error::{Result, SchematicError};
use crate::palette;
use crate::varint;
use crate::{BlockEntity, BlockVolume, Entity, Palette, Schematic, Warning};

/// How to treat oddities that do not make the schematic ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Unused palette entries and left over block data are errors.
    #[default]
    Strict,
    /// Unused palette entries and left over block data become [`Warning`]s.
    Lenient,
}

/// Options for reading a schematic.
#[derive(Debug, Clone, Default)]
pub struct ReadOpts {
    pub(crate) decode: DecodeOpts,
    pub(crate) mode: Mode,
}

impl ReadOpts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the NBT decoder, such as the nesting limit or the
    /// compression to expect.
    pub fn decode_opts(mut self, value: DecodeOpts) -> Self {
        self.decode = value;
        self
    }

    pub fn mode(mut self, value: Mode) -> Self {
        self.mode = value;
        self
    }
}

/// Interpret a decoded root compound with strict validation.
pub fn interpret(root: &Value) -> Result<Schematic> {
    interpret_with_opts(root, &ReadOpts::new())
}

/// Interpret a decoded root compound. Only the mode of `opts` is used.
pub fn interpret_with_opts(root: &Value, opts: &ReadOpts) -> Result<Schematic> {
    Interpreter::new(opts.mode).run(root)
}

pub(crate) fn interpret_root(
    root: &Value,
    opts: &ReadOpts,
    lenient_lists: usize,
) -> Result<Schematic> {
    let mut interpreter = Interpreter::new(opts.mode);
    if lenient_lists > 0 {
        warn!("{} lists with a negative length were read as empty", lenient_lists);
        interpreter
            .warnings
            .push(Warning::NegativeListLength(lenient_lists));
    }
    interpreter.run(root)
}

// Field names, qualified by where they sit in the nested layout.
const BLOCKS: &str = "Blocks";
const BLOCKS_PALETTE: &str = "Blocks.Palette";
const BLOCKS_DATA: &str = "Blocks.Data";
const BLOCKS_ENTITIES: &str = "Blocks.BlockEntities";
const BIOMES: &str = "Biomes";
const BIOMES_PALETTE: &str = "Biomes.Palette";
const BIOMES_DATA: &str = "Biomes.Data";

struct Interpreter {
    mode: Mode,
    warnings: Vec<Warning>,
}

impl Interpreter {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            warnings: Vec::new(),
        }
    }

    fn run(mut self, root: &Value) -> Result<Schematic> {
        let root = as_compound(root, "<root>")?;

        // Version 3 wraps everything in a Schematic compound. Older files may
        // or may not.
        let body = match root.get("Schematic") {
            Some(v) => as_compound(v, "Schematic")?,
            None => root,
        };

        let version = opt_int(body, "Version")?;
        if let Some(v) = version {
            if !(1..=3).contains(&v) {
                return Err(SchematicError::UnsupportedVersion(v));
            }
        }

        let dims = dimensions(body)?;

        let (palette, blocks, block_entities, biomes) = match body.get(BLOCKS) {
            Some(blocks) => {
                debug!("reading nested layout, version {:?}", version);
                let blocks = as_compound(blocks, BLOCKS)?;
                let (palette, volume) =
                    self.palette_and_volume(blocks, BLOCKS_PALETTE, BLOCKS_DATA, dims)?;
                let entities = list_of_compounds(blocks.get("BlockEntities"), BLOCKS_ENTITIES)?;

                let biomes = match body.get(BIOMES) {
                    Some(biomes) => {
                        let biomes = as_compound(biomes, BIOMES)?;
                        Some(self.palette_and_volume(biomes, BIOMES_PALETTE, BIOMES_DATA, dims)?)
                    }
                    None => None,
                };

                (palette, volume, entities, biomes)
            }
            None => {
                debug!("reading flat layout, version {:?}", version);
                let palette = palette::read(field(body, "Palette", "Palette")?, "Palette")?;

                if let Some(declared) = opt_int(body, "PaletteMax")? {
                    if i64::from(declared) != palette.len() as i64 {
                        return Err(SchematicError::PaletteSizeMismatch {
                            declared: i64::from(declared),
                            actual: palette.len(),
                        });
                    }
                }

                let data = field(body, "BlockData", "BlockData")?;
                let volume = self.volume(data, "BlockData", &palette, dims)?;

                let entities = match body.get("BlockEntities") {
                    Some(v) => list_of_compounds(Some(v), "BlockEntities")?,
                    None => list_of_compounds(body.get("TileEntities"), "TileEntities")?,
                };

                (palette, volume, entities, None)
            }
        };

        let block_entities = index_block_entities(&blocks, block_entities)?;
        let entities = list_of_compounds(body.get("Entities"), "Entities")?
            .into_iter()
            .map(read_entity)
            .collect::<Result<Vec<Entity>>>()?;

        Ok(Schematic {
            version,
            data_version: opt_int(body, "DataVersion")?,
            offset: offset(body)?,
            metadata: match body.get("Metadata") {
                Some(v) => Some(as_compound(v, "Metadata")?.clone()),
                None => None,
            },
            palette,
            blocks,
            block_entities,
            entities,
            biomes,
            warnings: self.warnings,
        })
    }

    /// Read the `Palette` and `Data` pair of the nested layout's `Blocks` or
    /// `Biomes` compound.
    fn palette_and_volume(
        &mut self,
        c: &Compound,
        palette_path: &'static str,
        data_path: &'static str,
        dims: (i32, i32, i32),
    ) -> Result<(Palette, BlockVolume)> {
        let palette = palette::read(field(c, "Palette", palette_path)?, palette_path)?;
        let volume = self.volume(field(c, "Data", data_path)?, data_path, &palette, dims)?;
        Ok((palette, volume))
    }

    /// Decode a block or biome data array and check it against its palette.
    fn volume(
        &mut self,
        data: &Value,
        field: &'static str,
        palette: &Palette,
        (width, height, length): (i32, i32, i32),
    ) -> Result<BlockVolume> {
        // Dimensions were checked to multiply to no more than u32::MAX.
        let count = width as usize * height as usize * length as usize;

        let (cells, trailing) = match data {
            Value::ByteArray(bytes) => {
                let (cells, used) = varint::decode_all(bytes, count)?;
                (cells, bytes.len() - used)
            }
            Value::IntArray(ints) => {
                if ints.len() < count {
                    return Err(SchematicError::TruncatedBlockData);
                }
                let cells = ints[..count]
                    .iter()
                    .map(|&i| {
                        u32::try_from(i).map_err(|_| SchematicError::NegativeBlockIndex(i))
                    })
                    .collect::<Result<Vec<u32>>>()?;
                (cells, ints.len() - count)
            }
            other => {
                return Err(SchematicError::WrongType {
                    field,
                    expected: Tag::ByteArray,
                    found: other.tag(),
                })
            }
        };

        if trailing > 0 {
            match self.mode {
                Mode::Strict => return Err(SchematicError::TrailingBytes(trailing)),
                Mode::Lenient => {
                    warn!("{}: ignoring {} values after the volume", field, trailing);
                    self.warnings.push(Warning::TrailingBlockData {
                        field,
                        count: trailing,
                    });
                }
            }
        }

        let max = palette.len() as u32;
        let mut used = vec![false; palette.len()];
        for &index in &cells {
            if index >= max {
                return Err(SchematicError::InvalidPaletteReference { index, max });
            }
            used[index as usize] = true;
        }

        let unused = used.iter().filter(|u| !**u).count();
        if unused > 0 {
            match self.mode {
                Mode::Strict => {
                    let first = used.iter().position(|u| !*u).unwrap_or_default();
                    return Err(SchematicError::UnusedPaletteEntry(first as u32));
                }
                Mode::Lenient => {
                    warn!("{}: {} palette entries are never used", field, unused);
                    self.warnings.push(Warning::UnusedPaletteEntries {
                        field,
                        count: unused,
                    });
                }
            }
        }

        Ok(BlockVolume::new(width, height, length, cells))
    }
}

fn index_block_entities(
    volume: &BlockVolume,
    entries: Vec<&Compound>,
) -> Result<BTreeMap<usize, BlockEntity>> {
    let mut block_entities = BTreeMap::new();

    for entry in entries {
        let block_entity = read_block_entity(entry)?;
        let [x, y, z] = block_entity.pos();
        let index = volume
            .index(x, y, z)
            .ok_or(SchematicError::BlockEntityOutOfBounds { x, y, z })?;

        if block_entities.insert(index, block_entity).is_some() {
            return Err(SchematicError::DuplicateBlockEntity { x, y, z });
        }
    }

    Ok(block_entities)
}

fn as_compound<'a>(value: &'a Value, field: &'static str) -> Result<&'a Compound> {
    value.as_compound().ok_or(SchematicError::WrongType {
        field,
        expected: Tag::Compound,
        found: value.tag(),
    })
}

/// `name` is the key within `c`, `path` is how it is reported.
fn field<'a>(c: &'a Compound, name: &str, path: &'static str) -> Result<&'a Value> {
    c.get(name).ok_or(SchematicError::MissingField(path))
}

fn opt_int(c: &Compound, field: &'static str) -> Result<Option<i32>> {
    match c.get(field) {
        Some(Value::Int(v)) => Ok(Some(*v)),
        Some(other) => Err(SchematicError::WrongType {
            field,
            expected: Tag::Int,
            found: other.tag(),
        }),
        None => Ok(None),
    }
}

/// A size along one axis. Shorts are read as unsigned, as the format stores
/// sizes up to 65535 in them.
fn dimension(c: &Compound, field: &'static str) -> Result<i64> {
    match c.get(field) {
        Some(Value::Short(v)) => Ok(i64::from(*v as u16)),
        Some(Value::Int(v)) => Ok(i64::from(*v)),
        Some(other) => Err(SchematicError::WrongType {
            field,
            expected: Tag::Short,
            found: other.tag(),
        }),
        None => Err(SchematicError::MissingField(field)),
    }
}

fn dimensions(c: &Compound) -> Result<(i32, i32, i32)> {
    let width = dimension(c, "Width")?;
    let height = dimension(c, "Height")?;
    let length = dimension(c, "Length")?;

    let invalid = SchematicError::InvalidDimensions {
        width,
        height,
        length,
    };
    if width <= 0 || height <= 0 || length <= 0 {
        return Err(invalid);
    }

    // Each is at most i32::MAX, so the product fits in an i128 easily.
    let volume = i128::from(width) * i128::from(height) * i128::from(length);
    if volume > i128::from(u32::MAX) {
        return Err(invalid);
    }

    Ok((width as i32, height as i32, length as i32))
}

fn offset(c: &Compound) -> Result<[i32; 3]> {
    match c.get("Offset") {
        Some(Value::IntArray(v)) => <[i32; 3]>::try_from(v.as_slice()).map_err(|_| {
            SchematicError::InvalidField {
                field: "Offset",
                reason: format!("expected 3 ints, found {}", v.len()),
            }
        }),
        Some(other) => Err(SchematicError::WrongType {
            field: "Offset",
            expected: Tag::IntArray,
            found: other.tag(),
        }),
        None => Ok([0, 0, 0]),
    }
}

/// An optional list whose elements must be compounds. Empty lists of any
/// element kind are accepted, as writers often declare them as `End`.
fn list_of_compounds<'a>(
    value: Option<&'a Value>,
    field: &'static str,
) -> Result<Vec<&'a Compound>> {
    let list = match value {
        Some(Value::List(list)) => list,
        Some(other) => {
            return Err(SchematicError::WrongType {
                field,
                expected: Tag::List,
                found: other.tag(),
            })
        }
        None => return Ok(Vec::new()),
    };

    if list.is_empty() {
        return Ok(Vec::new());
    }
    if list.element_tag() != Tag::Compound {
        return Err(SchematicError::WrongType {
            field,
            expected: Tag::Compound,
            found: list.element_tag(),
        });
    }

    Ok(list.iter().filter_map(Value::as_compound).collect())
}
