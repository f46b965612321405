use schemnbt::{Compound, List, Tag, Value};
use serde::Serialize;

use crate::error::{Result, SchematicError};

/// Extra data attached to one block, such as a chest's inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockEntity {
    pos: [i32; 3],
    id: String,
    data: Compound,
}

impl BlockEntity {
    /// Position relative to the schematic, as `[x, y, z]`.
    pub fn pos(&self) -> [i32; 3] {
        self.pos
    }

    /// Resource name of the block entity type, eg `minecraft:chest`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &Compound {
        &self.data
    }
}

/// A free-standing entity such as a mob or an armour stand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pos: [f64; 3],
    id: String,
    data: Compound,
}

impl Entity {
    /// Position relative to the schematic. Entities need not be inside the
    /// block volume.
    pub fn pos(&self) -> [f64; 3] {
        self.pos
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data(&self) -> &Compound {
        &self.data
    }
}

// Fields that describe the entry itself. When an entry has no Data compound,
// everything else it holds is its data.
const OWN_FIELDS: &[&str] = &["Pos", "Id", "id", "x", "y", "z", "Data"];

pub(crate) fn read_block_entity(c: &Compound) -> Result<BlockEntity> {
    let pos = match c.get("Pos") {
        Some(Value::IntArray(pos)) => <[i32; 3]>::try_from(pos.as_slice()).map_err(|_| {
            SchematicError::InvalidField {
                field: "Pos",
                reason: format!("expected 3 ints, found {}", pos.len()),
            }
        })?,
        Some(other) => {
            return Err(SchematicError::WrongType {
                field: "Pos",
                expected: Tag::IntArray,
                found: other.tag(),
            })
        }
        None => [int(c, "x")?, int(c, "y")?, int(c, "z")?],
    };

    Ok(BlockEntity {
        pos,
        id: read_id(c)?,
        data: read_data(c)?,
    })
}

pub(crate) fn read_entity(c: &Compound) -> Result<Entity> {
    let pos = match c.get("Pos") {
        Some(Value::List(list)) => doubles(list)?,
        Some(other) => {
            return Err(SchematicError::WrongType {
                field: "Pos",
                expected: Tag::List,
                found: other.tag(),
            })
        }
        None => return Err(SchematicError::MissingField("Pos")),
    };

    Ok(Entity {
        pos,
        id: read_id(c)?,
        data: read_data(c)?,
    })
}

fn int(c: &Compound, field: &'static str) -> Result<i32> {
    match c.get(field) {
        Some(Value::Int(v)) => Ok(*v),
        Some(other) => Err(SchematicError::WrongType {
            field,
            expected: Tag::Int,
            found: other.tag(),
        }),
        None => Err(SchematicError::MissingField("Pos")),
    }
}

fn doubles(list: &List) -> Result<[f64; 3]> {
    if list.element_tag() != Tag::Double {
        return Err(SchematicError::WrongType {
            field: "Pos",
            expected: Tag::Double,
            found: list.element_tag(),
        });
    }

    match list.as_slice() {
        [Value::Double(x), Value::Double(y), Value::Double(z)] => Ok([*x, *y, *z]),
        other => Err(SchematicError::InvalidField {
            field: "Pos",
            reason: format!("expected 3 doubles, found {}", other.len()),
        }),
    }
}

fn read_id(c: &Compound) -> Result<String> {
    match c.get("Id").or_else(|| c.get("id")) {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(other) => Err(SchematicError::WrongType {
            field: "Id",
            expected: Tag::String,
            found: other.tag(),
        }),
        None => Err(SchematicError::MissingField("Id")),
    }
}

fn read_data(c: &Compound) -> Result<Compound> {
    match c.get("Data") {
        Some(Value::Compound(data)) => Ok(data.clone()),
        Some(other) => Err(SchematicError::WrongType {
            field: "Data",
            expected: Tag::Compound,
            found: other.tag(),
        }),
        None => Ok(c
            .iter()
            .filter(|(k, _)| !OWN_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
    }
}
