use schemnbt::{nbt, Tag, Value};
use serde_json::json;

use super::{field_mut, flat, flat_stone, nested, remove_field, varints};
use crate::{interpret, interpret_with_opts, Mode, ReadOpts, SchematicError, Warning};

fn lenient() -> ReadOpts {
    ReadOpts::new().mode(Mode::Lenient)
}

#[test]
fn single_stone() {
    let schematic = interpret(&flat_stone()).unwrap();

    assert_eq!(schematic.dimensions(), (1, 1, 1));
    assert_eq!(schematic.block_at(0, 0, 0).unwrap(), 0);
    assert_eq!(schematic.palette_entry(0), Some("minecraft:stone"));
    assert_eq!(schematic.palette_entry(1), None);
    assert_eq!(schematic.block_state_at(0, 0, 0).unwrap(), "minecraft:stone");
    assert_eq!(schematic.offset(), [0, 0, 0]);
    assert_eq!(schematic.version(), None);
    assert!(schematic.metadata().is_none());
    assert!(!schematic.is_lenient());
}

#[test]
fn index_beyond_palette() {
    let mut v = flat_stone();
    *field_mut(&mut v, &["BlockData"]) = nbt!([B; 1]);

    assert!(matches!(
        interpret(&v),
        Err(SchematicError::InvalidPaletteReference { index: 1, max: 1 })
    ));
}

#[test]
fn palette_with_gap() {
    let v = flat(
        (3, 1, 1),
        nbt!({ "a": 0, "b": 1, "c": 3 }),
        nbt!([B; 0, 1, 2]),
    );

    assert!(matches!(
        interpret(&v),
        Err(SchematicError::PaletteGap { missing: 2 })
    ));
}

#[test]
fn palette_with_duplicate_index() {
    let v = flat((2, 1, 1), nbt!({ "a": 0, "b": 0 }), nbt!([B; 0, 0]));

    match interpret(&v) {
        Err(SchematicError::DuplicatePaletteEntry { entry, index: 0 }) => assert_eq!(entry, "b"),
        other => panic!("expected duplicate, got {:?}", other),
    }
}

#[test]
fn negative_palette_index() {
    let v = flat((1, 1, 1), nbt!({ "a": -1 }), nbt!([B; 0]));
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::NegativePaletteIndex { index: -1, .. })
    ));
}

#[test]
fn list_palette() {
    let v = flat(
        (2, 1, 1),
        nbt!(["minecraft:air", "minecraft:dirt"]),
        nbt!([B; 1, 0]),
    );

    let schematic = interpret(&v).unwrap();
    assert_eq!(schematic.block_state_at(0, 0, 0).unwrap(), "minecraft:dirt");
    assert_eq!(schematic.block_state_at(1, 0, 0).unwrap(), "minecraft:air");
    assert_eq!(schematic.palette().len(), 2);
}

#[test]
fn truncated_by_one_byte() {
    let v = flat_stone();
    let mut truncated = v.clone();
    *field_mut(&mut truncated, &["BlockData"]) = nbt!([B;]);

    assert!(interpret(&v).is_ok());
    assert!(matches!(
        interpret(&truncated),
        Err(SchematicError::TruncatedBlockData)
    ));
}

#[test]
fn truncated_multi_byte_varint() {
    // 200 entries need two byte varints for the upper indices.
    let names: Vec<Value> = (0..200).map(|i| Value::from(format!("b{}", i))).collect();
    let palette = Value::List(schemnbt::List::new(Tag::String, names).unwrap());
    let indices: Vec<u32> = (0..200).collect();
    let data = varints(&indices);
    assert!(data.len() > 200);

    let v = flat((200, 1, 1), palette.clone(), Value::ByteArray(data.clone()));
    let schematic = interpret(&v).unwrap();
    assert_eq!(schematic.block_at(199, 0, 0).unwrap(), 199);
    assert_eq!(schematic.palette_entry(150), Some("b150"));

    for cut in 1..=3 {
        let short = data[..data.len() - cut].to_vec();
        let v = flat((200, 1, 1), palette.clone(), Value::ByteArray(short));
        assert!(
            matches!(interpret(&v), Err(SchematicError::TruncatedBlockData)),
            "cut {}",
            cut
        );
    }
}

#[test]
fn trailing_bytes() {
    let mut v = flat_stone();
    *field_mut(&mut v, &["BlockData"]) = nbt!([B; 0, 0]);

    assert!(matches!(
        interpret(&v),
        Err(SchematicError::TrailingBytes(1))
    ));

    let schematic = interpret_with_opts(&v, &lenient()).unwrap();
    assert_eq!(schematic.block_at(0, 0, 0).unwrap(), 0);
    assert!(schematic.is_lenient());
    assert_eq!(
        schematic.warnings(),
        &[Warning::TrailingBlockData {
            field: "BlockData",
            count: 1
        }]
    );
}

#[test]
fn unused_palette_entries() {
    let v = flat(
        (2, 1, 1),
        nbt!({ "a": 0, "b": 1, "c": 2 }),
        nbt!([B; 0, 2]),
    );

    assert!(matches!(
        interpret(&v),
        Err(SchematicError::UnusedPaletteEntry(1))
    ));

    let schematic = interpret_with_opts(&v, &lenient()).unwrap();
    assert_eq!(
        schematic.warnings(),
        &[Warning::UnusedPaletteEntries {
            field: "BlockData",
            count: 1
        }]
    );
}

#[test]
fn every_index_below_palette_size() {
    let v = nested();
    let schematic = interpret(&v).unwrap();
    let palette_len = schematic.palette().len() as u32;

    let max = schematic.volume().as_slice().iter().copied().max().unwrap();
    assert_eq!(palette_len, max + 1);
    assert!(schematic.volume().as_slice().iter().all(|i| *i < palette_len));
}

#[test]
fn bounds() {
    let n = 2 * 3 * 4;
    let palette: Vec<Value> = (0..n).map(|i| Value::from(format!("b{}", i))).collect();
    let palette = Value::List(schemnbt::List::new(Tag::String, palette).unwrap());
    let data = varints(&(0..n).collect::<Vec<_>>());
    let schematic = interpret(&flat((2, 3, 4), palette, Value::ByteArray(data))).unwrap();

    for x in 0..2 {
        for y in 0..3 {
            for z in 0..4 {
                assert!(schematic.block_at(x, y, z).is_ok());
            }
        }
    }

    for (x, y, z) in [(-1, 0, 0), (2, 0, 0), (0, -1, 0), (0, 3, 0), (0, 0, 4), (0, 0, i32::MIN)] {
        assert!(
            matches!(
                schematic.block_at(x, y, z),
                Err(SchematicError::OutOfBounds { .. })
            ),
            "{} {} {}",
            x,
            y,
            z
        );
        assert!(schematic.block_state_at(x, y, z).is_err());
        assert!(schematic.block_entity_at(x, y, z).is_err());
    }
}

#[test]
fn cell_order_is_x_then_z_then_y() {
    let palette: Vec<Value> = (0..8).map(|i| Value::from(format!("b{}", i))).collect();
    let palette = Value::List(schemnbt::List::new(Tag::String, palette).unwrap());
    let v = flat((2, 2, 2), palette, nbt!([B; 0, 1, 2, 3, 4, 5, 6, 7]));
    let schematic = interpret(&v).unwrap();

    assert_eq!(schematic.block_at(0, 0, 0).unwrap(), 0);
    assert_eq!(schematic.block_at(1, 0, 0).unwrap(), 1);
    assert_eq!(schematic.block_at(0, 0, 1).unwrap(), 2);
    assert_eq!(schematic.block_at(1, 0, 1).unwrap(), 3);
    assert_eq!(schematic.block_at(0, 1, 0).unwrap(), 4);
    assert_eq!(schematic.block_at(1, 1, 1).unwrap(), 7);
}

#[test]
fn nested_layout() {
    let schematic = interpret(&nested()).unwrap();

    assert_eq!(schematic.version(), Some(3));
    assert_eq!(schematic.data_version(), Some(3953));
    assert_eq!(schematic.dimensions(), (2, 1, 2));
    assert_eq!(schematic.offset(), [10, 64, -5]);
    assert_eq!(
        schematic.metadata().and_then(|m| m.get("Name")),
        Some(&Value::from("hut"))
    );

    assert_eq!(schematic.block_state_at(0, 0, 0).unwrap(), "minecraft:air");
    assert_eq!(
        schematic.block_state_at(1, 0, 0).unwrap(),
        "minecraft:chest[facing=north]"
    );
    assert_eq!(schematic.block_state_at(1, 0, 1).unwrap(), "minecraft:stone");

    let parsed = schematic.parsed_block_at(1, 0, 0).unwrap().unwrap();
    assert_eq!(parsed.name(), "chest");
    assert_eq!(parsed.property("facing"), Some("north"));

    assert_eq!(schematic.biome_at(0, 0, 0).unwrap(), Some("minecraft:plains"));
    assert_eq!(schematic.biome_at(0, 0, 1).unwrap(), Some("minecraft:desert"));
    assert_eq!(schematic.biome_palette().map(|p| p.len()), Some(2));
}

#[test]
fn nested_block_entities() {
    let schematic = interpret(&nested()).unwrap();

    let chest = schematic.block_entity_at(1, 0, 0).unwrap().unwrap();
    assert_eq!(chest.id(), "minecraft:chest");
    assert_eq!(chest.pos(), [1, 0, 0]);
    assert_eq!(chest.data().get("CustomName"), Some(&Value::from("loot")));
    assert!(schematic.block_entity_at(0, 0, 0).unwrap().is_none());

    // Every call starts over.
    assert_eq!(schematic.block_entities().count(), 1);
    assert_eq!(schematic.block_entities().count(), 1);
    assert_eq!(schematic.block_entities().next(), Some(chest));
}

#[test]
fn nested_entities() {
    let schematic = interpret(&nested()).unwrap();

    let entities = schematic.entities();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].id(), "minecraft:pig");
    assert_eq!(entities[0].pos(), [0.5, 1.0, 1.5]);
    assert_eq!(entities[0].data().get("Health"), Some(&Value::Float(10.0)));
}

#[test]
fn entities_serialize_as_json() {
    let schematic = interpret(&nested()).unwrap();

    let block_entities: Vec<_> = schematic.block_entities().collect();
    assert_eq!(
        serde_json::to_value(&block_entities).unwrap(),
        json!([{
            "pos": [1, 0, 0],
            "id": "minecraft:chest",
            "data": { "CustomName": "loot" },
        }])
    );

    assert_eq!(
        serde_json::to_value(schematic.entities()).unwrap(),
        json!([{
            "pos": [0.5, 1.0, 1.5],
            "id": "minecraft:pig",
            "data": { "Health": 10.0 },
        }])
    );
}

#[test]
fn no_biomes() {
    let schematic = interpret(&flat_stone()).unwrap();
    assert_eq!(schematic.biome_at(0, 0, 0).unwrap(), None);
    assert!(schematic.biome_at(1, 0, 0).is_err());
    assert!(schematic.biome_palette().is_none());
}

#[test]
fn biome_data_is_validated() {
    let mut v = nested();
    *field_mut(&mut v, &["Schematic", "Biomes", "Data"]) = nbt!([B; 0, 0, 1]);

    assert!(matches!(
        interpret(&v),
        Err(SchematicError::TruncatedBlockData)
    ));
}

#[test]
fn nested_missing_fields() {
    let mut v = nested();
    remove_field(&mut v, &["Schematic", "Blocks"], "Data");
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::MissingField("Blocks.Data"))
    ));

    let mut v = nested();
    remove_field(&mut v, &["Schematic"], "Length");
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::MissingField("Length"))
    ));
}

#[test]
fn flat_missing_palette() {
    let mut v = flat_stone();
    remove_field(&mut v, &[], "Palette");
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::MissingField("Palette"))
    ));
}

#[test]
fn root_must_be_compound() {
    assert!(matches!(
        interpret(&nbt!(1)),
        Err(SchematicError::WrongType {
            expected: Tag::Compound,
            found: Tag::Int,
            ..
        })
    ));
}

#[test]
fn wrong_types() {
    let mut v = flat_stone();
    *field_mut(&mut v, &["Palette"]) = nbt!(5);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::WrongType {
            field: "Palette",
            ..
        })
    ));

    let mut v = flat_stone();
    *field_mut(&mut v, &["BlockData"]) = nbt!("nope");
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::WrongType {
            field: "BlockData",
            expected: Tag::ByteArray,
            found: Tag::String,
        })
    ));

    let mut v = flat_stone();
    *field_mut(&mut v, &["Width"]) = nbt!(1.0);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::WrongType { field: "Width", .. })
    ));
}

#[test]
fn invalid_dimensions() {
    let mut v = flat_stone();
    *field_mut(&mut v, &["Width"]) = nbt!(0i16);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::InvalidDimensions { width: 0, .. })
    ));

    let mut v = flat_stone();
    *field_mut(&mut v, &["Height"]) = nbt!(-3);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::InvalidDimensions { height: -3, .. })
    ));

    // Fits in each field, but the volume is too large to index.
    let mut v = flat_stone();
    *field_mut(&mut v, &["Width"]) = nbt!(100_000);
    *field_mut(&mut v, &["Length"]) = nbt!(100_000);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::InvalidDimensions { .. })
    ));
}

#[test]
fn short_dimensions_are_unsigned() {
    // A width of 65535 rather than -1, so the one block of data is too short.
    let mut v = flat_stone();
    *field_mut(&mut v, &["Width"]) = nbt!(-1i16);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::TruncatedBlockData)
    ));
}

#[test]
fn int_dimensions() {
    let mut v = flat_stone();
    *field_mut(&mut v, &["Width"]) = nbt!(1);
    assert_eq!(interpret(&v).unwrap().dimensions(), (1, 1, 1));
}

#[test]
fn palette_max() {
    let mut v = flat_stone();
    if let Value::Compound(c) = &mut v {
        c.insert("PaletteMax".to_owned(), Value::Int(1));
    }
    assert!(interpret(&v).is_ok());

    *field_mut(&mut v, &["PaletteMax"]) = Value::Int(4);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::PaletteSizeMismatch {
            declared: 4,
            actual: 1
        })
    ));
}

#[test]
fn unsupported_version() {
    let mut v = nested();
    *field_mut(&mut v, &["Schematic", "Version"]) = nbt!(4);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::UnsupportedVersion(4))
    ));
}

#[test]
fn int_array_block_data() {
    let palette = nbt!({ "a": 0, "b": 1 });
    let v = flat((3, 1, 1), palette.clone(), nbt!([I; 1, 0, 1]));
    let schematic = interpret(&v).unwrap();
    assert_eq!(schematic.block_at(2, 0, 0).unwrap(), 1);

    let v = flat((3, 1, 1), palette.clone(), nbt!([I; 1, 0]));
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::TruncatedBlockData)
    ));

    let v = flat((3, 1, 1), palette.clone(), nbt!([I; 1, 0, 1, 0, 0]));
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::TrailingBytes(2))
    ));

    let v = flat((3, 1, 1), palette, nbt!([I; 1, -4, 0]));
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::NegativeBlockIndex(-4))
    ));
}

#[test]
fn overlong_varint() {
    let mut v = flat_stone();
    *field_mut(&mut v, &["BlockData"]) = nbt!([B; -1, -1, -1, -1, -1, 0]);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::VarIntTooLong { offset: 0 })
    ));
}

fn flat_with_tile_entities(key: &str, entities: Value) -> Value {
    let mut v = flat(
        (2, 2, 2),
        nbt!({ "minecraft:stone": 0 }),
        nbt!([B; 0, 0, 0, 0, 0, 0, 0, 0]),
    );
    if let Value::Compound(c) = &mut v {
        c.insert(key.to_owned(), entities);
    }
    v
}

#[test]
fn legacy_tile_entities() {
    let v = flat_with_tile_entities(
        "TileEntities",
        nbt!([{ "x": 1, "y": 1, "z": 0, "id": "Sign", "Text1": "hello" }]),
    );

    let schematic = interpret(&v).unwrap();
    let sign = schematic.block_entity_at(1, 1, 0).unwrap().unwrap();
    assert_eq!(sign.id(), "Sign");
    assert_eq!(sign.pos(), [1, 1, 0]);
    assert_eq!(sign.data().len(), 1);
    assert_eq!(sign.data().get("Text1"), Some(&Value::from("hello")));
}

#[test]
fn version_2_block_entities_keep_extra_fields() {
    let v = flat_with_tile_entities(
        "BlockEntities",
        nbt!([{ "Pos": [I; 0, 1, 1], "Id": "minecraft:chest", "Items": [] }]),
    );

    let schematic = interpret(&v).unwrap();
    let chest = schematic.block_entity_at(0, 1, 1).unwrap().unwrap();
    assert!(chest.data().contains_key("Items"));
    assert!(!chest.data().contains_key("Pos"));
}

#[test]
fn block_entity_out_of_bounds() {
    let v = flat_with_tile_entities(
        "BlockEntities",
        nbt!([{ "Pos": [I; 0, 2, 0], "Id": "minecraft:chest" }]),
    );

    assert!(matches!(
        interpret(&v),
        Err(SchematicError::BlockEntityOutOfBounds { x: 0, y: 2, z: 0 })
    ));
}

#[test]
fn duplicate_block_entity() {
    let v = flat_with_tile_entities(
        "BlockEntities",
        nbt!([
            { "Pos": [I; 1, 1, 1], "Id": "minecraft:chest" },
            { "Pos": [I; 1, 1, 1], "Id": "minecraft:barrel" },
        ]),
    );

    assert!(matches!(
        interpret(&v),
        Err(SchematicError::DuplicateBlockEntity { x: 1, y: 1, z: 1 })
    ));
}

#[test]
fn block_entity_fields() {
    let v = flat_with_tile_entities("BlockEntities", nbt!([{ "Pos": [I; 1, 1], "Id": "a" }]));
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::InvalidField { field: "Pos", .. })
    ));

    let v = flat_with_tile_entities("BlockEntities", nbt!([{ "Pos": [I; 1, 1, 1] }]));
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::MissingField("Id"))
    ));

    let v = flat_with_tile_entities("BlockEntities", nbt!([1, 2]));
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::WrongType {
            field: "BlockEntities",
            ..
        })
    ));
}

#[test]
fn empty_end_list_of_block_entities() {
    let v = flat_with_tile_entities("BlockEntities", nbt!([]));
    let schematic = interpret(&v).unwrap();
    assert_eq!(schematic.block_entities().count(), 0);
}

#[test]
fn entity_position_must_be_three_doubles() {
    let mut v = nested();
    *field_mut(&mut v, &["Schematic", "Entities"]) =
        nbt!([{ "Pos": [1.0, 2.0], "Id": "minecraft:pig" }]);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::InvalidField { field: "Pos", .. })
    ));

    *field_mut(&mut v, &["Schematic", "Entities"]) =
        nbt!([{ "Pos": [1, 2, 3], "Id": "minecraft:pig" }]);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::WrongType {
            field: "Pos",
            expected: Tag::Double,
            found: Tag::Int,
        })
    ));
}

#[test]
fn entities_may_be_outside_the_volume() {
    let mut v = nested();
    *field_mut(&mut v, &["Schematic", "Entities"]) =
        nbt!([{ "Pos": [-20.0, 300.0, 1.5], "Id": "minecraft:bat" }]);
    let schematic = interpret(&v).unwrap();
    assert_eq!(schematic.entities()[0].pos(), [-20.0, 300.0, 1.5]);
}

#[test]
fn bad_offset() {
    let mut v = nested();
    *field_mut(&mut v, &["Schematic", "Offset"]) = nbt!([I; 1, 2]);
    assert!(matches!(
        interpret(&v),
        Err(SchematicError::InvalidField {
            field: "Offset",
            ..
        })
    ));
}
