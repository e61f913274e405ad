//! SCAN assets: the logbook entry shown for a scanned object.

use std::io::{Cursor, Seek, Write};

use binrw::{BinReaderExt, BinWrite};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::reader::expect_consumed;
use echoes_common::FourCC;
use echoes_scly::schema::ScannableObjectInfo;
use echoes_scly::{ObjectFields, ScriptObject, ScriptObjectKind};
use tracing::{debug, instrument};

use crate::dgrp::{DependencyOrder, Dgrp};
use crate::error::{Error, Result};

/// A decoded SCAN asset.
///
/// The asset holds exactly one scannable object info script object, followed by its dependencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    magic: FourCC,
    unknown_1: u32,
    unknown_2: u8,
    scannable_object_info: ScriptObject,
    dependencies: Dgrp,
}

impl Scan {
    pub const ASSET_TYPE: FourCC = FourCC::new(*b"SCAN");

    pub fn new(
        unknown_1: u32,
        unknown_2: u8,
        scannable_object_info: ScriptObject,
        dependencies: Dgrp,
    ) -> Result<Self> {
        Self::check_object(&scannable_object_info)?;
        Ok(Self {
            magic: Self::ASSET_TYPE,
            unknown_1,
            unknown_2,
            scannable_object_info,
            dependencies,
        })
    }

    fn check_object(object: &ScriptObject) -> Result<()> {
        if object.kind() != ScriptObjectKind::ScannableObjectInfo {
            return Err(Error::MalformedInput(format!(
                "a SCAN asset holds scannable object info, not {:?}",
                object.kind()
            )));
        }
        Ok(())
    }

    /// Decode an asset whose dependencies use the default field order
    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        Self::from_packed_with_order(packed, DependencyOrder::default())
    }

    #[instrument(skip(packed), err)]
    pub fn from_packed_with_order(packed: &[u8], order: DependencyOrder) -> Result<Self> {
        let mut reader = Cursor::new(packed);

        let magic: FourCC = reader.read_be()?;
        let unknown_1 = reader.read_u32::<BigEndian>()?;
        let unknown_2 = reader.read_u8()?;
        let object_count = reader.read_u32::<BigEndian>()?;
        debug!("{magic} asset with {object_count} objects");
        if object_count != 1 {
            return Err(Error::MalformedInput(format!(
                "a SCAN asset holds one object, found {object_count}"
            )));
        }

        let scannable_object_info =
            ScriptObject::read_as(&mut reader, ScriptObjectKind::ScannableObjectInfo)?;
        let dependencies = Dgrp::read(&mut reader, order)?;
        expect_consumed(&reader, "SCAN asset")?;

        Ok(Self {
            magic,
            unknown_1,
            unknown_2,
            scannable_object_info,
            dependencies,
        })
    }

    pub fn magic(&self) -> FourCC {
        self.magic
    }

    pub fn unknown_1(&self) -> u32 {
        self.unknown_1
    }

    pub fn unknown_2(&self) -> u8 {
        self.unknown_2
    }

    pub fn scannable_object_info(&self) -> &ScriptObject {
        &self.scannable_object_info
    }

    /// The named logbook fields of the scannable object info
    pub fn logbook(&self) -> Option<&ScannableObjectInfo> {
        match self.scannable_object_info.fields() {
            ObjectFields::ScannableObjectInfo(info) => Some(info),
            _ => None,
        }
    }

    pub fn dependencies(&self) -> &Dgrp {
        &self.dependencies
    }

    pub fn with_scannable_object_info_replaced(&self, scannable_object_info: ScriptObject) -> Result<Self> {
        Self::check_object(&scannable_object_info)?;
        Ok(Self {
            scannable_object_info,
            ..self.clone()
        })
    }

    pub fn with_dependencies_replaced(&self, dependencies: Dgrp) -> Self {
        Self {
            dependencies,
            ..self.clone()
        }
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        self.magic.write(writer)?;
        writer.write_u32::<BigEndian>(self.unknown_1)?;
        writer.write_u8(self.unknown_2)?;
        writer.write_u32::<BigEndian>(1)?;
        self.scannable_object_info.write_packed(writer)?;
        self.dependencies.write_packed(writer)?;
        Ok(())
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        self.write_packed(&mut writer)?;
        Ok(writer.into_inner())
    }

    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}
