//! Scan trees: the logbook menu hierarchy, stored as a DUMB resource.

use std::io::{Cursor, Seek, Write};

use binrw::{BinReaderExt, BinWrite};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::FourCC;
use echoes_scly::{ScriptObject, ScriptObjectKind};
use tracing::{debug, instrument, trace};

use crate::error::{Error, NotFoundError, Result};

/// A decoded scan tree.
///
/// The object count and the trailing `0xFF` padding are derived when written.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTree {
    magic: FourCC,
    root_instance_id: u32,
    unknown: u8,
    objects: Vec<ScriptObject>,
}

impl ScanTree {
    /// The asset ID under which the scan tree is stored, whatever type the archive declares for it
    pub const ASSET_ID: u32 = 0x95B6_1279;
    pub const MAGIC: FourCC = FourCC::new(*b"TREE");
    pub const ALIGNMENT: usize = 32;
    pub const PADDING_BYTE: u8 = 0xFF;

    pub fn new(
        root_instance_id: u32,
        unknown: u8,
        objects: impl IntoIterator<Item = ScriptObject>,
    ) -> Result<Self> {
        let objects = objects.into_iter().collect::<Vec<_>>();
        for object in &objects {
            Self::check_object(object)?;
        }
        Ok(Self {
            magic: Self::MAGIC,
            root_instance_id,
            unknown,
            objects,
        })
    }

    fn check_object(object: &ScriptObject) -> Result<()> {
        if object.kind() == ScriptObjectKind::ScannableObjectInfo {
            return Err(Error::MalformedInput(format!(
                "{} objects belong to SCAN assets, not scan trees",
                object.instance_type()
            )));
        }
        Ok(())
    }

    #[instrument(skip_all, err)]
    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(packed);

        let magic: FourCC = reader.read_be()?;
        let root_instance_id = reader.read_u32::<BigEndian>()?;
        let unknown = reader.read_u8()?;
        let object_count = reader.read_u32::<BigEndian>()?;
        debug!("{magic} rooted at {root_instance_id:#010X} with {object_count} objects");

        let objects = (0..object_count)
            .map(|_| -> Result<_> {
                let object = ScriptObject::read(&mut reader)?;
                Self::check_object(&object)?;
                trace!("{:?} {:#010X}", object.kind(), object.instance_id());
                Ok(object)
            })
            .collect::<Result<Vec<_>>>()?;

        let end = reader.position() as usize;
        let padding = &packed[end..];
        if padding.len() != Self::padding_len(end)
            || padding.iter().any(|&byte| byte != Self::PADDING_BYTE)
        {
            return Err(Error::MalformedInput(format!(
                "scan tree ends at {end:#X} but is followed by {} bytes other than its padding",
                padding.len()
            )));
        }

        Ok(Self {
            magic,
            root_instance_id,
            unknown,
            objects,
        })
    }

    fn padding_len(unpadded_len: usize) -> usize {
        (Self::ALIGNMENT - unpadded_len % Self::ALIGNMENT) % Self::ALIGNMENT
    }

    pub fn magic(&self) -> FourCC {
        self.magic
    }

    pub fn root_instance_id(&self) -> u32 {
        self.root_instance_id
    }

    pub fn unknown(&self) -> u8 {
        self.unknown
    }

    pub fn objects(&self) -> &[ScriptObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn get_object(&self, index: usize) -> Result<&ScriptObject> {
        self.objects
            .get(index)
            .ok_or(NotFoundError::Index(index).into())
    }

    pub fn get_object_by_instance_id(&self, instance_id: u32) -> Result<&ScriptObject> {
        self.objects
            .iter()
            .find(|object| object.instance_id() == instance_id)
            .ok_or(NotFoundError::InstanceId(instance_id).into())
    }

    /// Return a copy of this tree with the object at `index` swapped out
    pub fn with_object_replaced(&self, index: usize, object: ScriptObject) -> Result<Self> {
        Self::check_object(&object)?;
        self.get_object(index)?;

        let mut objects = self.objects.clone();
        objects[index] = object;
        Ok(Self {
            objects,
            ..self.clone()
        })
    }

    pub fn with_object_appended(&self, object: ScriptObject) -> Result<Self> {
        Self::check_object(&object)?;

        let mut objects = self.objects.clone();
        objects.push(object);
        Ok(Self {
            objects,
            ..self.clone()
        })
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let start = writer.stream_position()?;

        self.magic.write(writer)?;
        writer.write_u32::<BigEndian>(self.root_instance_id)?;
        writer.write_u8(self.unknown)?;
        let count = u32::try_from(self.objects.len())
            .map_err(|_| Error::SizeOverflow("scan tree object count"))?;
        writer.write_u32::<BigEndian>(count)?;
        for object in &self.objects {
            object.write_packed(writer)?;
        }

        let written = (writer.stream_position()? - start) as usize;
        writer.write_all(&vec![Self::PADDING_BYTE; Self::padding_len(written)])?;
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
