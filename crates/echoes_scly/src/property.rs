//! The self-describing property struct encoding.
//!
//! A property struct is a tree of ID-addressed subproperties. Nothing in the wire format says
//! whether a subproperty is a nested struct or an opaque leaf: the decision is made out of band by
//! checking the subproperty ID against the closed set in [`StructId`].

use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use derive_more::derive::From;
use echoes_common::reader::{expect_consumed, take};
use indexmap::IndexMap;
use tracing::{instrument, trace};

use crate::error::{Error, NotFoundError, Result};

/// The closed set of subproperty IDs which are encoded as nested property structs.
///
/// Every ID outside of this set is decoded as a [`PropertyLeaf`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StructId {
    /// The root struct of every script object
    Base = 0xFFFF_FFFF,

    SecondaryModel1 = 0x1C5B_4A3A,
    SecondaryModel2 = 0x8728_A0EE,
    SecondaryModel3 = 0xF1CD_99D3,
    SecondaryModel4 = 0x6ABE_7307,
    SecondaryModel5 = 0x1C07_EBA9,
    SecondaryModel6 = 0x8774_017D,
    SecondaryModel7 = 0xF191_3840,
    SecondaryModel8 = 0x6AE2_D294,
    SecondaryModel9 = 0x1CE2_091C,

    EditorProperties = 0x255A_4580,
    ScannableParameters = 0x2DA1_EC33,
}

impl StructId {
    pub const ALL: [StructId; 12] = [
        StructId::Base,
        StructId::SecondaryModel1,
        StructId::SecondaryModel2,
        StructId::SecondaryModel3,
        StructId::SecondaryModel4,
        StructId::SecondaryModel5,
        StructId::SecondaryModel6,
        StructId::SecondaryModel7,
        StructId::SecondaryModel8,
        StructId::SecondaryModel9,
        StructId::EditorProperties,
        StructId::ScannableParameters,
    ];

    /// The IDs of the nine secondary model slots of a scannable object, in slot order
    pub const SECONDARY_MODELS: [StructId; 9] = [
        StructId::SecondaryModel1,
        StructId::SecondaryModel2,
        StructId::SecondaryModel3,
        StructId::SecondaryModel4,
        StructId::SecondaryModel5,
        StructId::SecondaryModel6,
        StructId::SecondaryModel7,
        StructId::SecondaryModel8,
        StructId::SecondaryModel9,
    ];

    /// Look up a raw subproperty ID in the struct set
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub const fn id(self) -> u32 {
        self as u32
    }
}

/// The schema bound to a decoded property struct
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StructKind {
    /// No named fields are projected out of the struct
    #[default]
    Generic,
    EditorProperties,
    ScannableParameters,
    ScanInfoSecondaryModel,
}

/// Maps struct-typed subproperty IDs to the schema used when decoding them.
///
/// Registries are constant tables; any ID without an entry decodes as [`StructKind::Generic`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SchemaRegistry(&'static [(StructId, StructKind)]);

impl SchemaRegistry {
    pub const EMPTY: SchemaRegistry = SchemaRegistry(&[]);

    pub const fn new(bindings: &'static [(StructId, StructKind)]) -> Self {
        Self(bindings)
    }

    pub fn get(&self, id: StructId) -> StructKind {
        self.0
            .iter()
            .find(|(bound, _)| *bound == id)
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }
}

/// An undispatched subproperty: an ID followed by an opaque payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLeaf {
    id: u32,
    data: Vec<u8>,
}

impl PropertyLeaf {
    /// Create a leaf, checking that the ID is not reserved for structs and the payload fits a u16 size
    pub fn new(id: u32, data: impl Into<Vec<u8>>) -> Result<Self> {
        if StructId::from_id(id).is_some() {
            return Err(Error::MalformedInput(format!(
                "{id:#010X} is reserved for property structs"
            )));
        }

        let data = data.into();
        if data.len() > u16::MAX as usize {
            return Err(Error::SizeOverflow("property leaf size"));
        }

        Ok(Self { id, data })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// The raw payload of the leaf
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decode the payload with a leaf decoding function
    pub fn decode<T>(&self, decode: impl FnOnce(&[u8]) -> Result<T>) -> Result<T> {
        decode(&self.data)
    }

    pub fn write_packed<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.id)?;
        writer.write_u16::<BigEndian>(self.data.len() as u16)?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    pub fn packed_size(&self) -> usize {
        6 + self.data.len()
    }
}

/// A subproperty of a [`PropertyStruct`]
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum PropertyNode {
    Leaf(PropertyLeaf),
    Struct(PropertyStruct),
}

impl PropertyNode {
    pub fn id(&self) -> u32 {
        match self {
            PropertyNode::Leaf(leaf) => leaf.id(),
            PropertyNode::Struct(child) => child.id(),
        }
    }

    pub fn as_leaf(&self) -> Option<&PropertyLeaf> {
        match self {
            PropertyNode::Leaf(leaf) => Some(leaf),
            PropertyNode::Struct(_) => None,
        }
    }

    pub fn as_struct(&self) -> Option<&PropertyStruct> {
        match self {
            PropertyNode::Leaf(_) => None,
            PropertyNode::Struct(child) => Some(child),
        }
    }

    fn read(reader: &mut Cursor<&[u8]>, registry: SchemaRegistry) -> Result<Self> {
        let start = reader.position();
        let id = reader.read_u32::<BigEndian>()?;
        let size = reader.read_u16::<BigEndian>()?;

        match StructId::from_id(id) {
            Some(struct_id) => {
                let kind = registry.get(struct_id);
                trace!("struct subproperty {id:#010X} ({size} bytes, {kind:?})");

                reader.set_position(start);
                PropertyStruct::read(reader, kind, SchemaRegistry::EMPTY).map(PropertyNode::Struct)
            }
            None => {
                trace!("leaf subproperty {id:#010X} ({size} bytes)");

                let data = take(reader, size as usize)?.to_vec();
                Ok(PropertyNode::Leaf(PropertyLeaf { id, data }))
            }
        }
    }

    pub fn write_packed<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PropertyNode::Leaf(leaf) => leaf.write_packed(writer),
            PropertyNode::Struct(child) => child.write_packed(writer),
        }
    }

    pub fn packed_size(&self) -> Result<usize> {
        match self {
            PropertyNode::Leaf(leaf) => Ok(leaf.packed_size()),
            PropertyNode::Struct(child) => child.packed_size(),
        }
    }
}

/// A decoded property struct.
///
/// The declared size and subproperty count of the wire format are not stored; both are derived
/// from the subproperties when the struct is written.
#[derive(Debug, Clone)]
pub struct PropertyStruct {
    id: StructId,
    kind: StructKind,
    subproperties: IndexMap<u32, PropertyNode>,
}

impl PartialEq for PropertyStruct {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.subproperties.iter().eq(other.subproperties.iter())
    }
}

impl Eq for PropertyStruct {}

impl PropertyStruct {
    /// Build a struct from its subproperties, binding it to the schema `kind`.
    ///
    /// Fails if two subproperties share an ID or if the schema's fields cannot be projected.
    pub fn new(
        id: StructId,
        kind: StructKind,
        subproperties: impl IntoIterator<Item = PropertyNode>,
    ) -> Result<Self> {
        let mut map = IndexMap::new();
        for node in subproperties {
            let node_id = node.id();
            if map.insert(node_id, node).is_some() {
                return Err(Error::MalformedInput(format!(
                    "duplicate subproperty {node_id:#010X} in struct {:#010X}",
                    id.id()
                )));
            }
        }
        Self::from_map(id, kind, map)
    }

    fn from_map(
        id: StructId,
        kind: StructKind,
        subproperties: IndexMap<u32, PropertyNode>,
    ) -> Result<Self> {
        if subproperties.len() > u16::MAX as usize {
            return Err(Error::SizeOverflow("property struct subproperty count"));
        }

        let result = Self {
            id,
            kind,
            subproperties,
        };
        kind.validate(&result)?;
        Ok(result)
    }

    /// Rebind this struct to `kind` and its struct-typed subproperties to the schemas in
    /// `registry`, the same way [`PropertyStruct::read`] binds them.
    ///
    /// Deeper structs are bound as [`StructKind::Generic`].
    pub(crate) fn bind(self, kind: StructKind, registry: SchemaRegistry) -> Result<Self> {
        let subproperties = self
            .subproperties
            .into_iter()
            .map(|(node_id, node)| -> Result<_> {
                let node = match node {
                    PropertyNode::Struct(child) => {
                        let child_kind = registry.get(child.id);
                        PropertyNode::Struct(child.bind(child_kind, SchemaRegistry::EMPTY)?)
                    }
                    leaf => leaf,
                };
                Ok((node_id, node))
            })
            .collect::<Result<IndexMap<_, _>>>()?;
        Self::from_map(self.id, kind, subproperties)
    }

    /// Decode a struct which occupies the whole buffer, using `registry` to bind its struct-typed
    /// subproperties to schemas.
    #[instrument(skip_all, err)]
    pub fn from_packed(packed: &[u8], registry: SchemaRegistry) -> Result<Self> {
        let mut reader = Cursor::new(packed);
        let result = Self::read(&mut reader, StructKind::Generic, registry)?;
        expect_consumed(&reader, "property struct")?;
        Ok(result)
    }

    pub(crate) fn read(
        reader: &mut Cursor<&[u8]>,
        kind: StructKind,
        registry: SchemaRegistry,
    ) -> Result<Self> {
        let raw_id = reader.read_u32::<BigEndian>()?;
        let id = StructId::from_id(raw_id).ok_or_else(|| {
            Error::MalformedInput(format!("{raw_id:#010X} is not a property struct id"))
        })?;
        let size = reader.read_u16::<BigEndian>()? as usize;
        let count = reader.read_u16::<BigEndian>()?;

        let body_size = size.checked_sub(2).ok_or_else(|| {
            Error::MalformedInput(format!(
                "struct {raw_id:#010X} declares {size} bytes, less than its own count field"
            ))
        })?;
        let body = take(reader, body_size)?;
        let mut body_reader = Cursor::new(body);

        let mut subproperties = IndexMap::with_capacity(count as usize);
        for _ in 0..count {
            let node = PropertyNode::read(&mut body_reader, registry)?;
            let node_id = node.id();
            if subproperties.insert(node_id, node).is_some() {
                return Err(Error::MalformedInput(format!(
                    "duplicate subproperty {node_id:#010X} in struct {raw_id:#010X}"
                )));
            }
        }

        if body_reader.position() != body.len() as u64 {
            return Err(Error::MalformedInput(format!(
                "struct {raw_id:#010X} declares {size} bytes but its {count} subproperties use {}",
                body_reader.position() + 2
            )));
        }

        Self::from_map(id, kind, subproperties)
    }

    pub fn id(&self) -> u32 {
        self.id.id()
    }

    pub fn struct_id(&self) -> StructId {
        self.id
    }

    /// The schema this struct was decoded with
    pub fn kind(&self) -> StructKind {
        self.kind
    }

    pub fn subproperty_count(&self) -> usize {
        self.subproperties.len()
    }

    /// The subproperties, in wire order
    pub fn subproperties(&self) -> impl Iterator<Item = &PropertyNode> {
        self.subproperties.values()
    }

    pub fn get_subproperty_by_id(&self, id: u32) -> Result<&PropertyNode> {
        self.subproperties
            .get(&id)
            .ok_or(Error::NotFound(NotFoundError::Subproperty(id)))
    }

    /// Look up a subproperty which the schema expects to be a leaf
    pub fn get_leaf(&self, id: u32) -> Result<&PropertyLeaf> {
        self.get_subproperty_by_id(id)?.as_leaf().ok_or_else(|| {
            Error::MalformedInput(format!("subproperty {id:#010X} is a struct, not a leaf"))
        })
    }

    /// Look up a nested struct
    pub fn get_struct(&self, id: StructId) -> Result<&PropertyStruct> {
        self.get_subproperty_by_id(id.id())?
            .as_struct()
            .ok_or_else(|| {
                Error::MalformedInput(format!(
                    "subproperty {:#010X} is a leaf, not a struct",
                    id.id()
                ))
            })
    }

    /// Project a named field out of a leaf's payload
    pub fn project<T>(&self, id: u32, decode: impl FnOnce(&[u8]) -> Result<T>) -> Result<T> {
        self.get_leaf(id)?.decode(decode)
    }

    /// Return a copy of this struct with the subproperty sharing `node`'s ID replaced in place
    pub fn with_subproperty_replaced(&self, node: impl Into<PropertyNode>) -> Result<Self> {
        let node = node.into();
        let mut subproperties = self.subproperties.clone();
        let slot = subproperties
            .get_mut(&node.id())
            .ok_or(Error::NotFound(NotFoundError::Subproperty(node.id())))?;
        *slot = node;

        Self::from_map(self.id, self.kind, subproperties)
    }

    pub fn write_packed<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut body = Vec::new();
        for node in self.subproperties.values() {
            node.write_packed(&mut body)?;
        }

        let size =
            u16::try_from(body.len() + 2).map_err(|_| Error::SizeOverflow("property struct size"))?;

        writer.write_u32::<BigEndian>(self.id())?;
        writer.write_u16::<BigEndian>(size)?;
        writer.write_u16::<BigEndian>(self.subproperties.len() as u16)?;
        writer.write_all(&body)?;
        Ok(())
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut packed = Vec::new();
        self.write_packed(&mut packed)?;
        Ok(packed)
    }

    /// Size of the struct once packed, measured by packing it
    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::{Error, NotFoundError, Result};
    use crate::property::{
        PropertyLeaf, PropertyNode, PropertyStruct, SchemaRegistry, StructId, StructKind,
    };

    #[rustfmt::skip]
    fn nested_struct() -> Vec<u8> {
        vec![
            0xFF, 0xFF, 0xFF, 0xFF, // Base struct
            0x00, 0x1E,             // Size
            0x00, 0x02,             // Subproperties
            // Leaf
            0x12, 0x34, 0x56, 0x78,
            0x00, 0x04,
            0xDE, 0xAD, 0xBE, 0xEF,
            // ScannableParameters
            0x2D, 0xA1, 0xEC, 0x33,
            0x00, 0x0C,
            0x00, 0x01,
            0xB9, 0x4E, 0x9B, 0xE7,
            0x00, 0x04,
            0x00, 0x00, 0x00, 0x2A,
        ]
    }

    #[traced_test]
    #[test]
    fn read_leaf_and_nested_struct() -> Result<()> {
        let result = PropertyStruct::from_packed(&nested_struct(), SchemaRegistry::EMPTY)?;

        assert_eq!(result.id(), 0xFFFF_FFFF);
        assert_eq!(result.subproperty_count(), 2);

        let leaf = result.get_subproperty_by_id(0x1234_5678)?;
        assert_eq!(leaf.as_leaf().map(|l| l.data()), Some(&[0xDE, 0xAD, 0xBE, 0xEF][..]));

        let nested = result.get_struct(StructId::ScannableParameters)?;
        assert_eq!(nested.kind(), StructKind::Generic);
        assert_eq!(nested.subproperty_count(), 1);
        assert_eq!(
            nested.get_leaf(0xB94E_9BE7)?.data(),
            &[0x00, 0x00, 0x00, 0x2A]
        );

        Ok(())
    }

    #[traced_test]
    #[test]
    fn registry_binds_schema() -> Result<()> {
        const REGISTRY: SchemaRegistry = SchemaRegistry::new(&[(
            StructId::ScannableParameters,
            StructKind::ScannableParameters,
        )]);

        let result = PropertyStruct::from_packed(&nested_struct(), REGISTRY)?;
        let nested = result.get_struct(StructId::ScannableParameters)?;
        assert_eq!(nested.kind(), StructKind::ScannableParameters);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn write_matches_input() -> Result<()> {
        let input = nested_struct();
        let result = PropertyStruct::from_packed(&input, SchemaRegistry::EMPTY)?;

        assert_eq!(result.packed()?, input);
        assert_eq!(result.packed_size()?, input.len());

        Ok(())
    }

    #[test]
    fn missing_subproperty_is_not_found() -> Result<()> {
        let result = PropertyStruct::from_packed(&nested_struct(), SchemaRegistry::EMPTY)?;

        assert!(matches!(
            result.get_subproperty_by_id(0x0BAD_F00D),
            Err(Error::NotFound(NotFoundError::Subproperty(0x0BAD_F00D)))
        ));

        Ok(())
    }

    #[test]
    fn inconsistent_size_is_malformed() {
        let mut input = nested_struct();
        input[5] = 0x1F;
        input.push(0x00);

        assert!(matches!(
            PropertyStruct::from_packed(&input, SchemaRegistry::EMPTY),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn truncated_input_fails() {
        let input = nested_struct();

        assert!(PropertyStruct::from_packed(&input[..input.len() - 1], SchemaRegistry::EMPTY).is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() -> Result<()> {
        let leaf = PropertyLeaf::new(0x1234_5678, vec![0x01])?;

        assert!(matches!(
            PropertyStruct::new(
                StructId::Base,
                StructKind::Generic,
                [PropertyNode::from(leaf.clone()), PropertyNode::from(leaf)]
            ),
            Err(Error::MalformedInput(_))
        ));

        Ok(())
    }

    #[test]
    fn leaf_rejects_struct_id() {
        assert!(PropertyLeaf::new(StructId::EditorProperties.id(), vec![]).is_err());
    }

    #[test]
    fn replace_subproperty_updates_size() -> Result<()> {
        let result = PropertyStruct::from_packed(&nested_struct(), SchemaRegistry::EMPTY)?;
        let replaced =
            result.with_subproperty_replaced(PropertyLeaf::new(0x1234_5678, vec![0x01, 0x02])?)?;

        assert_eq!(replaced.subproperty_count(), 2);
        assert_eq!(replaced.packed_size()?, result.packed_size()? - 2);

        let packed = replaced.packed()?;
        assert_eq!(&packed[4..6], &[0x00, 0x1C]);
        assert_eq!(
            PropertyStruct::from_packed(&packed, SchemaRegistry::EMPTY)?,
            replaced
        );

        // Order of subproperties is preserved
        let ids = replaced.subproperties().map(|n| n.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec![0x1234_5678, 0x2DA1_EC33]);

        Ok(())
    }
}
