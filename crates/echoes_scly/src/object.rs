//! Script objects: a fixed header, a list of connections and one base property struct.

use std::io::{Cursor, Seek, Write};

use binrw::{BinRead, BinReaderExt, BinWrite};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::reader::{expect_consumed, take};
use echoes_common::FourCC;
use tracing::{debug, instrument, trace};

use crate::error::{Error, Result};
use crate::property::{PropertyStruct, SchemaRegistry, StructId, StructKind};
use crate::schema::{
    inventory_slot, scannable_parameters, scsl_unknown, MenuOptions, ObjectFields,
    ScanTreeFields, ScannableObjectInfo,
};

/// Wiring from one script object to another: when the owner reaches `state`, `message` is sent to
/// the object with `target_instance_id`
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct Connection {
    pub state: FourCC,
    pub message: FourCC,
    pub target_instance_id: u32,
}

impl Connection {
    pub const PACKED_SIZE: usize = 12;

    pub fn new(state: impl Into<FourCC>, message: impl Into<FourCC>, target_instance_id: u32) -> Self {
        Self {
            state: state.into(),
            message: message.into(),
            target_instance_id,
        }
    }
}

const SCANNABLE_OBJECT_INFO_REGISTRY: SchemaRegistry = SchemaRegistry::new(&[
    (StructId::SecondaryModel1, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel2, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel3, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel4, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel5, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel6, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel7, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel8, StructKind::ScanInfoSecondaryModel),
    (StructId::SecondaryModel9, StructKind::ScanInfoSecondaryModel),
]);

const SCAN_TREE_REGISTRY: SchemaRegistry = SchemaRegistry::new(&[
    (StructId::EditorProperties, StructKind::EditorProperties),
    (StructId::ScannableParameters, StructKind::ScannableParameters),
]);

/// The closed set of supported script object types
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScriptObjectKind {
    /// Logbook entry of a SCAN asset
    ScannableObjectInfo,
    /// Scan tree category node
    Scnd,
    /// Scan tree scannable entry
    Scsn,
    /// Scan tree inventory entry
    Scin,
    /// Scan tree slider
    Scsl,
    /// Scan tree menu
    Scmn,
}

impl ScriptObjectKind {
    pub const ALL: [ScriptObjectKind; 6] = [
        ScriptObjectKind::ScannableObjectInfo,
        ScriptObjectKind::Scnd,
        ScriptObjectKind::Scsn,
        ScriptObjectKind::Scin,
        ScriptObjectKind::Scsl,
        ScriptObjectKind::Scmn,
    ];

    /// The instance type written in the object header
    pub const fn tag(self) -> FourCC {
        FourCC::new(match self {
            ScriptObjectKind::ScannableObjectInfo => *b"SNFO",
            ScriptObjectKind::Scnd => *b"SCND",
            ScriptObjectKind::Scsn => *b"SCSN",
            ScriptObjectKind::Scin => *b"SCIN",
            ScriptObjectKind::Scsl => *b"SCSL",
            ScriptObjectKind::Scmn => *b"SCMN",
        })
    }

    pub fn from_tag(tag: FourCC) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or(Error::UnsupportedObjectType(tag))
    }

    /// Schemas of the nested structs this kind of object carries
    pub const fn registry(self) -> SchemaRegistry {
        match self {
            ScriptObjectKind::ScannableObjectInfo => SCANNABLE_OBJECT_INFO_REGISTRY,
            _ => SCAN_TREE_REGISTRY,
        }
    }

    /// Project the named fields of this kind out of a base property struct
    pub fn project(self, properties: &PropertyStruct) -> Result<ObjectFields> {
        if properties.struct_id() != StructId::Base {
            return Err(Error::MalformedInput(format!(
                "script object properties must use the base struct id, found {:#010X}",
                properties.id()
            )));
        }

        if self == ScriptObjectKind::ScannableObjectInfo {
            return ScannableObjectInfo::try_from(properties).map(ObjectFields::ScannableObjectInfo);
        }

        let node = ScanTreeFields::try_from(properties)?;
        Ok(match self {
            ScriptObjectKind::Scsn => ObjectFields::Scsn {
                node,
                scannable_parameters: scannable_parameters(properties)?,
            },
            ScriptObjectKind::Scin => ObjectFields::Scin {
                node,
                inventory_slot: inventory_slot(properties)?,
                scannable_parameters: scannable_parameters(properties)?,
            },
            ScriptObjectKind::Scsl => ObjectFields::Scsl {
                node,
                unknown: scsl_unknown(properties)?,
            },
            ScriptObjectKind::Scmn => ObjectFields::Scmn {
                node,
                menu: MenuOptions::try_from(properties)?,
            },
            _ => ObjectFields::Scnd(node),
        })
    }
}

/// A decoded script object.
///
/// The instance size of the header is derived from the connections and properties; the named
/// fields are projected from the properties when the object is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptObject {
    instance_type: FourCC,
    kind: ScriptObjectKind,
    instance_id: u32,
    connections: Vec<Connection>,
    properties: PropertyStruct,
    fields: ObjectFields,
}

impl ScriptObject {
    /// Build an object, projecting the named fields of `kind` out of `properties`.
    ///
    /// Connections are stored in the order given.
    pub fn new(
        kind: ScriptObjectKind,
        instance_id: u32,
        connections: Vec<Connection>,
        properties: PropertyStruct,
    ) -> Result<Self> {
        Self::build(kind.tag(), kind, instance_id, connections, properties)
    }

    fn build(
        instance_type: FourCC,
        kind: ScriptObjectKind,
        instance_id: u32,
        connections: Vec<Connection>,
        properties: PropertyStruct,
    ) -> Result<Self> {
        if connections.len() > u16::MAX as usize {
            return Err(Error::SizeOverflow("script object connection count"));
        }

        // Nested structs are bound as a read of this kind binds them
        let properties = properties.bind(StructKind::Generic, kind.registry())?;
        let fields = kind.project(&properties)?;
        let result = Self {
            instance_type,
            kind,
            instance_id,
            connections,
            properties,
            fields,
        };
        result.instance_size()?;
        Ok(result)
    }

    /// Decode an object which occupies the whole buffer, dispatching on its instance type
    #[instrument(skip_all, err)]
    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(packed);
        let result = Self::read(&mut reader)?;
        expect_consumed(&reader, "script object")?;
        Ok(result)
    }

    /// Read one object, dispatching on its instance type
    pub fn read(reader: &mut Cursor<&[u8]>) -> Result<Self> {
        let tag: FourCC = reader.read_be()?;
        let kind = ScriptObjectKind::from_tag(tag)?;
        Self::read_body(reader, tag, kind)
    }

    /// Read one object whose layout is known from context rather than from its instance type.
    ///
    /// The instance type found on the wire is kept and written back unchanged.
    pub fn read_as(reader: &mut Cursor<&[u8]>, kind: ScriptObjectKind) -> Result<Self> {
        let tag: FourCC = reader.read_be()?;
        trace!("reading {tag} as {kind:?}");
        Self::read_body(reader, tag, kind)
    }

    fn read_body(
        reader: &mut Cursor<&[u8]>,
        instance_type: FourCC,
        kind: ScriptObjectKind,
    ) -> Result<Self> {
        let instance_size = reader.read_u16::<BigEndian>()?;
        let body = take(reader, instance_size as usize)?;
        let mut body_reader = Cursor::new(body);

        let instance_id = body_reader.read_u32::<BigEndian>()?;
        let connection_count = body_reader.read_u16::<BigEndian>()?;
        debug!(
            "{kind:?} {instance_id:#010X}: {instance_size} bytes, {connection_count} connections"
        );

        let connections = (0..connection_count)
            .map(|_| Connection::read(&mut body_reader))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let properties = PropertyStruct::read(&mut body_reader, StructKind::Generic, kind.registry())?;
        if body_reader.position() != body.len() as u64 {
            return Err(Error::MalformedInput(format!(
                "script object {instance_id:#010X} declares {instance_size} bytes but uses {}",
                body_reader.position()
            )));
        }

        Self::build(instance_type, kind, instance_id, connections, properties)
    }

    /// The instance type written in the object header
    pub fn instance_type(&self) -> FourCC {
        self.instance_type
    }

    pub fn kind(&self) -> ScriptObjectKind {
        self.kind
    }

    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// The base property struct
    pub fn properties(&self) -> &PropertyStruct {
        &self.properties
    }

    /// The named fields projected out of the properties
    pub fn fields(&self) -> &ObjectFields {
        &self.fields
    }

    /// Byte length of everything after the instance size field
    pub fn instance_size(&self) -> Result<u16> {
        let size = 4 + 2 + Connection::PACKED_SIZE * self.connections.len() + self.properties.packed_size()?;
        u16::try_from(size).map_err(|_| Error::SizeOverflow("script object instance size"))
    }

    /// Return a copy of this object with new connections, sorted by target instance ID
    pub fn with_connections_replaced(&self, connections: impl Into<Vec<Connection>>) -> Result<Self> {
        let mut connections = connections.into();
        connections.sort_by_key(|connection| connection.target_instance_id);

        Self::build(
            self.instance_type,
            self.kind,
            self.instance_id,
            connections,
            self.properties.clone(),
        )
    }

    /// Return a copy of this object with a new base property struct
    pub fn with_properties_replaced(&self, properties: PropertyStruct) -> Result<Self> {
        Self::build(
            self.instance_type,
            self.kind,
            self.instance_id,
            self.connections.clone(),
            properties,
        )
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        self.instance_type().write(writer)?;
        writer.write_u16::<BigEndian>(self.instance_size()?)?;
        writer.write_u32::<BigEndian>(self.instance_id)?;
        writer.write_u16::<BigEndian>(self.connections.len() as u16)?;
        for connection in &self.connections {
            connection.write(writer)?;
        }
        self.properties.write_packed(writer)?;
        Ok(())
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        self.write_packed(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Size of the object once packed, measured by packing it
    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}

#[cfg(test)]
mod test {
    use echoes_common::FourCC;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, Result};
    use crate::object::{Connection, ScriptObject, ScriptObjectKind};
    use crate::schema::ObjectFields;

    #[rustfmt::skip]
    fn scsl() -> Vec<u8> {
        let mut packed = vec![
            b'S', b'C', b'S', b'L',
            0x00, 0x00,             // Instance size, patched below
            0x00, 0x10, 0x00, 0x2A, // Instance id
            0x00, 0x01,             // Connections
            b'Z', b'E', b'R', b'O', b'A', b'C', b'T', b'V', 0x00, 0x10, 0x00, 0x01,
            0xFF, 0xFF, 0xFF, 0xFF, // Base struct
            0x00, 0x5F,
            0x00, 0x04,
            // EditorProperties
            0x25, 0x5A, 0x45, 0x80,
            0x00, 0x3B,
            0x00, 0x03,
            0x49, 0x4E, 0x41, 0x4D, 0x00, 0x02, b'A', 0x00,
            0x58, 0x46, 0x52, 0x4D, 0x00, 0x24,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x3F, 0x80, 0x00, 0x00, 0x3F, 0x80, 0x00, 0x00, 0x3F, 0x80, 0x00, 0x00,
            0x41, 0x43, 0x54, 0x56, 0x00, 0x01, 0x01,
            // Name string
            0x46, 0x21, 0x9B, 0xAC, 0x00, 0x04, 0x00, 0x00, 0x00, 0x07,
            0x32, 0x69, 0x8B, 0xD6, 0x00, 0x02, b'B', 0x00,
            // Unknown
            0x02, 0x61, 0xA4, 0xE0, 0x00, 0x04, 0x00, 0x00, 0x00, 0x03,
        ];
        let size = (packed.len() - 6) as u16;
        packed[4..6].copy_from_slice(&size.to_be_bytes());
        packed
    }

    #[traced_test]
    #[test]
    fn read_scan_tree_object() -> Result<()> {
        let input = scsl();
        let result = ScriptObject::from_packed(&input)?;

        assert_eq!(result.kind(), ScriptObjectKind::Scsl);
        assert_eq!(result.instance_id(), 0x0010_002A);
        assert_eq!(result.connections(), &[Connection::new(b"ZERO", b"ACTV", 0x0010_0001)]);
        assert_eq!(result.instance_size()? as usize, input.len() - 6);

        let ObjectFields::Scsl { node, unknown } = result.fields() else {
            panic!("expected SCSL fields, got {:?}", result.fields());
        };
        assert_eq!(node.editor_properties.name, "A");
        assert!(node.editor_properties.active);
        assert_eq!(node.name_string_strg_asset_id, 7);
        assert_eq!(node.name_string_name, "B");
        assert_eq!(*unknown, 3);

        assert_eq!(result.packed()?, input);

        Ok(())
    }

    #[test]
    fn unknown_instance_type_is_unsupported() {
        let mut input = scsl();
        input[0..4].copy_from_slice(b"ACKT");

        assert!(matches!(
            ScriptObject::from_packed(&input),
            Err(Error::UnsupportedObjectType(_))
        ));
    }

    #[test]
    fn inconsistent_instance_size_is_malformed() {
        let mut input = scsl();
        input[5] += 1;
        input.push(0x00);

        assert!(matches!(
            ScriptObject::from_packed(&input),
            Err(Error::MalformedInput(_))
        ));
    }

    #[traced_test]
    #[test]
    fn replaced_connections_are_sorted() -> Result<()> {
        let object = ScriptObject::from_packed(&scsl())?;
        let replaced = object.with_connections_replaced(vec![
            Connection::new(b"ZERO", b"ACTV", 0x0010_0009),
            Connection::new(b"ZERO", b"DCTV", 0x0010_0003),
            Connection::new(b"ARRV", b"ACTV", 0x0010_0009),
        ])?;

        let targets = replaced
            .connections()
            .iter()
            .map(|c| c.target_instance_id)
            .collect::<Vec<_>>();
        assert_eq!(targets, vec![0x0010_0003, 0x0010_0009, 0x0010_0009]);

        // Stable for equal targets
        assert_eq!(replaced.connections()[1].message, FourCC::from(b"ACTV"));

        let size = object.instance_size()? as usize + 2 * Connection::PACKED_SIZE;
        assert_eq!(replaced.instance_size()? as usize, size);
        assert_eq!(replaced.packed_size()?, object.packed_size()? + 24);
        assert_eq!(ScriptObject::from_packed(&replaced.packed()?)?, replaced);

        Ok(())
    }
}
