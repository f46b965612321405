use std::io::Write;

use flate2::write::GzEncoder;
use schemnbt::{nbt, Value};

mod interpret;

/// Encode a root compound as uncompressed NBT with an empty root name.
/// Strings are written as plain UTF-8, which is enough for test data.
pub fn encode(root: &Value) -> Vec<u8> {
    let mut out = vec![root.tag() as u8];
    write_str(&mut out, "");
    write_payload(&mut out, root);
    out
}

fn write_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(&(s.len() as u16).to_be_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn write_payload(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Byte(v) => out.push(*v as u8),
        Value::Short(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::Double(v) => out.extend_from_slice(&v.to_be_bytes()),
        Value::String(v) => write_str(out, v),
        Value::ByteArray(v) => {
            out.extend_from_slice(&(v.len() as i32).to_be_bytes());
            out.extend(v.iter().map(|b| *b as u8));
        }
        Value::IntArray(v) => {
            out.extend_from_slice(&(v.len() as i32).to_be_bytes());
            for i in v {
                out.extend_from_slice(&i.to_be_bytes());
            }
        }
        Value::LongArray(v) => {
            out.extend_from_slice(&(v.len() as i32).to_be_bytes());
            for i in v {
                out.extend_from_slice(&i.to_be_bytes());
            }
        }
        Value::List(list) => {
            out.push(list.element_tag() as u8);
            out.extend_from_slice(&(list.len() as i32).to_be_bytes());
            for v in list {
                write_payload(out, v);
            }
        }
        Value::Compound(c) => {
            for (name, v) in c {
                out.push(v.tag() as u8);
                write_str(out, name);
                write_payload(out, v);
            }
            out.push(0);
        }
    }
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Varint encode some block indices.
pub fn varints(indices: &[u32]) -> Vec<i8> {
    let mut out = Vec::new();
    for &index in indices {
        let mut value = index;
        while value & !0x7f != 0 {
            out.push(((value & 0x7f) | 0x80) as u8 as i8);
            value >>= 7;
        }
        out.push(value as u8 as i8);
    }
    out
}

/// Mutable access to a field of a compound value, for tweaking fixtures.
pub fn field_mut<'a>(value: &'a mut Value, path: &[&str]) -> &'a mut Value {
    let mut value = value;
    for key in path {
        value = match value {
            Value::Compound(c) => c.get_mut(*key).unwrap(),
            other => panic!("not a compound: {:?}", other),
        };
    }
    value
}

pub fn remove_field(value: &mut Value, path: &[&str], key: &str) {
    match field_mut(value, path) {
        Value::Compound(c) => {
            c.remove(key);
        }
        other => panic!("not a compound: {:?}", other),
    }
}

/// The smallest flat (version 1/2 style) schematic: one stone block.
pub fn flat_stone() -> Value {
    nbt!({
        "Width": 1i16,
        "Height": 1i16,
        "Length": 1i16,
        "Palette": { "minecraft:stone": 0 },
        "BlockData": [B; 0],
    })
}

/// A flat schematic with the given size, palette and block data.
pub fn flat(dims: (i16, i16, i16), palette: Value, data: Value) -> Value {
    nbt!({
        "Version": 2,
        "Width": dims.0,
        "Height": dims.1,
        "Length": dims.2,
        "Palette": palette,
        "BlockData": data,
    })
}

/// A version 3 schematic, 2 wide, 1 high and 2 long, with a chest, a pig
/// and biomes.
pub fn nested() -> Value {
    nbt!({
        "Schematic": {
            "Version": 3,
            "DataVersion": 3953,
            "Width": 2i16,
            "Height": 1i16,
            "Length": 2i16,
            "Offset": [I; 10, 64, -5],
            "Metadata": { "Name": "hut", "Author": "someone" },
            "Blocks": {
                "Palette": {
                    "minecraft:air": 0,
                    "minecraft:chest[facing=north]": 1,
                    "minecraft:stone": 2,
                },
                "Data": [B; 0, 1, 2, 2],
                "BlockEntities": [
                    {
                        "Pos": [I; 1, 0, 0],
                        "Id": "minecraft:chest",
                        "Data": { "CustomName": "loot" },
                    },
                ],
            },
            "Biomes": {
                "Palette": { "minecraft:plains": 0, "minecraft:desert": 1 },
                "Data": [B; 0, 0, 1, 1],
            },
            "Entities": [
                {
                    "Pos": [0.5, 1.0, 1.5],
                    "Id": "minecraft:pig",
                    "Data": { "Health": 10.0f32 },
                },
            ],
        }
    })
}
