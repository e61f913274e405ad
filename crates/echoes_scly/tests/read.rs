use std::io::Cursor;

use echoes_scly::error::{Error, NotFoundError, Result};
use echoes_scly::schema::{
    EditorProperties, MenuOptions, ScanInfoSecondaryModel, ScanTreeFields, ScannableObjectInfo,
    ScannableParameters,
};
use echoes_scly::{
    InventorySlot, ObjectFields, PropertyLeaf, PropertyNode, PropertyStruct, SchemaRegistry,
    ScriptObject, ScriptObjectKind, StructId, StructKind,
};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn leaf(id: u32, data: &[u8]) -> Result<PropertyNode> {
    Ok(PropertyLeaf::new(id, data.to_vec())?.into())
}

fn editor_properties(name: &str) -> Result<PropertyNode> {
    editor_properties_as(name, StructKind::EditorProperties)
}

fn editor_properties_as(name: &str, kind: StructKind) -> Result<PropertyNode> {
    let mut name = name.as_bytes().to_vec();
    name.push(0);

    let mut transform = vec![0x00; 24];
    for _ in 0..3 {
        transform.extend_from_slice(&1.0f32.to_be_bytes());
    }

    Ok(PropertyStruct::new(
        StructId::EditorProperties,
        kind,
        [
            leaf(EditorProperties::NAME, &name)?,
            leaf(EditorProperties::TRANSFORM, &transform)?,
            leaf(EditorProperties::ACTIVE, &[0x01])?,
        ],
    )?
    .into())
}

fn scannable_parameters(scan_asset_id: u32) -> Result<PropertyNode> {
    Ok(PropertyStruct::new(
        StructId::ScannableParameters,
        StructKind::ScannableParameters,
        [leaf(
            ScannableParameters::SCAN_ASSET_ID,
            &scan_asset_id.to_be_bytes(),
        )?],
    )?
    .into())
}

fn secondary_model(id: StructId, model_asset_id: u32) -> Result<PropertyNode> {
    Ok(PropertyStruct::new(
        id,
        StructKind::ScanInfoSecondaryModel,
        [
            leaf(
                ScanInfoSecondaryModel::MODEL_ASSET_ID,
                &model_asset_id.to_be_bytes(),
            )?,
            leaf(ScanInfoSecondaryModel::ANIMATION_SET, &[0xFF; 12])?,
            leaf(ScanInfoSecondaryModel::ATTACH_BONE_NAME, b"\0")?,
        ],
    )?
    .into())
}

fn scannable_object_info() -> Result<PropertyStruct> {
    let mut nodes = vec![
        leaf(ScannableObjectInfo::SCAN_TEXT_ASSET_ID, &[0x11, 0x22, 0x33, 0x44])?,
        leaf(ScannableObjectInfo::SLOW, &[0x00, 0x00, 0x00, 0x01])?,
        leaf(ScannableObjectInfo::USE_LOGBOOK_MODEL_AFTER_SCAN, &[0x00])?,
        leaf(ScannableObjectInfo::POST_SCAN_OVERRIDE_TEXTURE_ASSET_ID, &[0xFF; 4])?,
        leaf(ScannableObjectInfo::LOGBOOK_DEFAULT_X_ROTATION, &0.5f32.to_be_bytes())?,
        leaf(ScannableObjectInfo::LOGBOOK_DEFAULT_Z_ROTATION, &0.0f32.to_be_bytes())?,
        leaf(ScannableObjectInfo::LOGBOOK_SCALE, &2.0f32.to_be_bytes())?,
        leaf(ScannableObjectInfo::LOGBOOK_MODEL_ASSET_ID, &[0xFF; 4])?,
        leaf(ScannableObjectInfo::LOGBOOK_ANIMATION_SET, &[0xFF; 12])?,
    ];
    for (slot, id) in StructId::SECONDARY_MODELS.into_iter().enumerate() {
        nodes.push(secondary_model(id, slot as u32)?);
    }

    PropertyStruct::new(StructId::Base, StructKind::Generic, nodes)
}

#[traced_test]
#[test]
fn leaf_and_nested_struct_lookup() -> Result<()> {
    #[rustfmt::skip]
    let input = vec![
        0xFF, 0xFF, 0xFF, 0xFF,
        0x00, 0x18,
        0x00, 0x02,
        // Leaf, not a struct id
        0xAA, 0xBB, 0xCC, 0xDD,
        0x00, 0x02,
        0x01, 0x02,
        // EditorProperties, empty
        0x25, 0x5A, 0x45, 0x80,
        0x00, 0x02,
        0x00, 0x00,
        // Leaf after the nested struct
        0x00, 0x00, 0x00, 0x01,
        0x00, 0x00,
    ];
    // Three subproperties are present, only two are declared
    assert!(PropertyStruct::from_packed(&input, SchemaRegistry::EMPTY).is_err());

    let mut input = input;
    input[7] = 0x03;
    let result = PropertyStruct::from_packed(&input, SchemaRegistry::EMPTY)?;
    assert_eq!(result.subproperty_count(), 3);

    let first = result.get_subproperty_by_id(0xAABB_CCDD)?;
    assert_eq!(first.as_leaf().map(PropertyLeaf::data), Some(&[0x01, 0x02][..]));

    let second = result.get_subproperty_by_id(StructId::EditorProperties.id())?;
    assert_eq!(second.as_struct().map(PropertyStruct::subproperty_count), Some(0));

    assert!(matches!(
        result.get_subproperty_by_id(0x0000_0002),
        Err(Error::NotFound(NotFoundError::Subproperty(2)))
    ));

    assert_eq!(result.packed()?, input);

    Ok(())
}

#[traced_test]
#[test]
fn scannable_object_info_round_trip() -> Result<()> {
    let object = ScriptObject::new(
        ScriptObjectKind::ScannableObjectInfo,
        0x0000_0001,
        vec![],
        scannable_object_info()?,
    )?;
    let packed = object.packed()?;
    assert_eq!(&packed[0..4], b"SNFO");

    let mut reader = Cursor::new(packed.as_slice());
    let result = ScriptObject::read_as(&mut reader, ScriptObjectKind::ScannableObjectInfo)?;
    assert_eq!(result, object);

    let ObjectFields::ScannableObjectInfo(info) = result.fields() else {
        panic!("expected scannable object info, got {:?}", result.fields());
    };
    assert_eq!(info.scan_text_asset_id, 0x1122_3344);
    assert!(info.slow);
    assert!(!info.use_logbook_model_after_scan);
    assert_eq!(info.logbook_default_x_rotation, 0.5);
    assert_eq!(info.logbook_scale, 2.0);
    assert_eq!(info.logbook_animation_set.ancs_asset_id, 0xFFFF_FFFF);

    let models = info
        .secondary_models
        .iter()
        .map(|m| m.model_asset_id)
        .collect::<Vec<_>>();
    assert_eq!(models, (0..9).collect::<Vec<_>>());

    // Nested secondary models carry their schema
    let first = result.properties().get_struct(StructId::SecondaryModel1)?;
    assert_eq!(first.kind(), StructKind::ScanInfoSecondaryModel);

    Ok(())
}

fn node_properties(name: &str, extra: impl IntoIterator<Item = PropertyNode>) -> Result<PropertyStruct> {
    let mut name_string_name = name.replace(' ', "").into_bytes();
    name_string_name.push(0);

    let mut nodes = vec![
        editor_properties(name)?,
        leaf(ScanTreeFields::NAME_STRING_STRG_ASSET_ID, &[0x00, 0x00, 0x20, 0x00])?,
        leaf(ScanTreeFields::NAME_STRING_NAME, &name_string_name)?,
    ];
    nodes.extend(extra);
    PropertyStruct::new(StructId::Base, StructKind::Generic, nodes)
}

#[traced_test]
#[test]
fn scan_entry_round_trip() -> Result<()> {
    let properties = node_properties("Spider Ball", [scannable_parameters(0x1234_5678)?])?;
    let object = ScriptObject::new(ScriptObjectKind::Scsn, 0x0042_0010, vec![], properties)?;

    let packed = object.packed()?;
    assert_eq!(&packed[0..4], b"SCSN");

    let result = ScriptObject::from_packed(&packed)?;
    assert_eq!(result, object);
    assert_eq!(result.packed()?, packed);

    let ObjectFields::Scsn {
        node,
        scannable_parameters,
    } = result.fields()
    else {
        panic!("expected scan entry fields, got {:?}", result.fields());
    };
    assert_eq!(node.editor_properties.name, "Spider Ball");
    assert!(node.editor_properties.active);
    assert_eq!(node.name_string_strg_asset_id, 0x0000_2000);
    assert_eq!(node.name_string_name, "SpiderBall");
    assert_eq!(scannable_parameters.scan_asset_id, 0x1234_5678);

    Ok(())
}

#[traced_test]
#[test]
fn menu_round_trip() -> Result<()> {
    let names = ["Research", "Creatures", "Lore", "Bosses"];
    let mut menu = vec![leaf(
        MenuOptions::MENU_OPTIONS_STRG_ASSET_ID,
        &[0x00, 0x00, 0x30, 0x00],
    )?];
    for (id, name) in MenuOptions::OPTION_STRING_NAMES.into_iter().zip(names) {
        let mut data = name.as_bytes().to_vec();
        data.push(0);
        menu.push(leaf(id, &data)?);
    }

    let properties = node_properties("Logbook", menu)?;
    let object = ScriptObject::new(ScriptObjectKind::Scmn, 0x0042_0011, vec![], properties)?;

    let packed = object.packed()?;
    assert_eq!(&packed[0..4], b"SCMN");

    let result = ScriptObject::from_packed(&packed)?;
    assert_eq!(result, object);
    assert_eq!(result.packed()?, packed);

    let ObjectFields::Scmn { node, menu } = result.fields() else {
        panic!("expected menu fields, got {:?}", result.fields());
    };
    assert_eq!(node.editor_properties.name, "Logbook");
    assert_eq!(menu.menu_options_strg_asset_id, 0x0000_3000);
    assert_eq!(menu.option_string_names, names.map(String::from));

    Ok(())
}

#[traced_test]
#[test]
fn nested_structs_take_the_schema_of_the_object() -> Result<()> {
    // Built without binding the editor properties to their schema
    let properties = PropertyStruct::new(
        StructId::Base,
        StructKind::Generic,
        [
            editor_properties_as("Node", StructKind::Generic)?,
            leaf(ScanTreeFields::NAME_STRING_STRG_ASSET_ID, &[0x00; 4])?,
            leaf(ScanTreeFields::NAME_STRING_NAME, b"Node\0")?,
        ],
    )?;
    let object = ScriptObject::new(ScriptObjectKind::Scnd, 1, vec![], properties)?;

    let editor = object.properties().get_struct(StructId::EditorProperties)?;
    assert_eq!(editor.kind(), StructKind::EditorProperties);

    let result = ScriptObject::from_packed(&object.packed()?)?;
    assert_eq!(result, object);

    Ok(())
}

#[traced_test]
#[test]
fn inventory_entry_fields() -> Result<()> {
    let properties = PropertyStruct::new(
        StructId::Base,
        StructKind::Generic,
        [
            editor_properties("Screw Attack")?,
            leaf(ScanTreeFields::NAME_STRING_STRG_ASSET_ID, &[0x00, 0x00, 0x10, 0x00])?,
            leaf(ScanTreeFields::NAME_STRING_NAME, b"ScrewAttack\0")?,
            leaf(ObjectFields::INVENTORY_SLOT, &[0x00, 0x00, 0x00, 0x1B])?,
            scannable_parameters(0xCAFE_BABE)?,
        ],
    )?;
    let object = ScriptObject::new(ScriptObjectKind::Scin, 0x0042_0007, vec![], properties)?;

    let result = ScriptObject::from_packed(&object.packed()?)?;
    assert_eq!(result.instance_type(), ScriptObjectKind::Scin.tag());

    let ObjectFields::Scin {
        node,
        inventory_slot,
        scannable_parameters,
    } = result.fields()
    else {
        panic!("expected inventory fields, got {:?}", result.fields());
    };
    assert_eq!(node.editor_properties.name, "Screw Attack");
    assert_eq!(node.name_string_name, "ScrewAttack");
    assert_eq!(*inventory_slot, InventorySlot::ScrewAttack);
    assert_eq!(scannable_parameters.scan_asset_id, 0xCAFE_BABE);
    assert_eq!(result.fields().scannable_parameters(), Some(scannable_parameters));

    Ok(())
}

#[test]
fn missing_schema_field_fails() -> Result<()> {
    let properties = PropertyStruct::new(
        StructId::Base,
        StructKind::Generic,
        [
            editor_properties("Node")?,
            leaf(ScanTreeFields::NAME_STRING_STRG_ASSET_ID, &[0x00; 4])?,
            leaf(ScanTreeFields::NAME_STRING_NAME, b"Node\0")?,
        ],
    )?;

    // A category node only needs the shared fields
    let node = ScriptObject::new(ScriptObjectKind::Scnd, 1, vec![], properties.clone())?;
    assert!(matches!(node.fields(), ObjectFields::Scnd(_)));

    // A menu needs its options
    assert!(matches!(
        ScriptObject::new(ScriptObjectKind::Scmn, 1, vec![], properties),
        Err(Error::NotFound(_))
    ));

    Ok(())
}
