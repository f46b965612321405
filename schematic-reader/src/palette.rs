use std::collections::HashSet;

use log::debug;
use schemnbt::{Compound, List, Tag, Value};

use crate::error::{Result, SchematicError};

/// Block state (or biome) names by index. Indices run from 0 to `len() - 1`
/// with no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<String>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.entries.get(index as usize).map(String::as_str)
    }

    /// The index of an entry, if it is in the palette.
    pub fn index_of(&self, entry: &str) -> Option<u32> {
        self.entries
            .iter()
            .position(|e| e == entry)
            .map(|i| i as u32)
    }

    /// Entries with their index, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i as u32, e.as_str()))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Read a palette in either of its layouts: a compound of name to index, or a
/// list of names where the position is the index.
pub(crate) fn read(value: &Value, field: &'static str) -> Result<Palette> {
    match value {
        Value::Compound(c) => {
            debug!("{}: reading palette of {} entries from a compound", field, c.len());
            from_compound(c, field)
        }
        Value::List(l) => {
            debug!("{}: reading palette of {} entries from a list", field, l.len());
            from_list(l, field)
        }
        other => Err(SchematicError::WrongType {
            field,
            expected: Tag::Compound,
            found: other.tag(),
        }),
    }
}

fn from_compound(compound: &Compound, field: &'static str) -> Result<Palette> {
    let mut indexed = Vec::with_capacity(compound.len());
    for (entry, index) in compound {
        let index = match index {
            Value::Int(i) => *i,
            other => {
                return Err(SchematicError::WrongType {
                    field,
                    expected: Tag::Int,
                    found: other.tag(),
                })
            }
        };

        let index = u32::try_from(index).map_err(|_| SchematicError::NegativePaletteIndex {
            entry: entry.clone(),
            index: i64::from(index),
        })?;
        indexed.push((index, entry));
    }

    // Name order breaks ties so the reported duplicate does not depend on
    // map iteration order.
    indexed.sort_unstable();

    let mut entries = Vec::with_capacity(indexed.len());
    for (expected, (index, entry)) in indexed.into_iter().enumerate() {
        let expected = expected as u32;
        if index < expected {
            return Err(SchematicError::DuplicatePaletteEntry {
                entry: entry.clone(),
                index,
            });
        }
        if index > expected {
            return Err(SchematicError::PaletteGap { missing: expected });
        }
        entries.push(entry.clone());
    }

    Ok(Palette { entries })
}

fn from_list(list: &List, field: &'static str) -> Result<Palette> {
    if !list.is_empty() && list.element_tag() != Tag::String {
        return Err(SchematicError::WrongType {
            field,
            expected: Tag::String,
            found: list.element_tag(),
        });
    }

    let mut seen = HashSet::with_capacity(list.len());
    let mut entries = Vec::with_capacity(list.len());
    for (index, value) in list.iter().enumerate() {
        // Checked above, every element is a string.
        let entry = value.as_str().unwrap_or_default();
        if !seen.insert(entry) {
            return Err(SchematicError::DuplicatePaletteEntry {
                entry: entry.to_owned(),
                index: index as u32,
            });
        }
        entries.push(entry.to_owned());
    }

    Ok(Palette { entries })
}
