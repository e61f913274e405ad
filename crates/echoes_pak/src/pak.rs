use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};

use binrw::{BinRead, BinReaderExt, BinWrite};
use bon::Builder;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::reader::{span, take};
use tracing::{debug, instrument, trace};

use crate::error::{Error, NotFoundError, Result};
use crate::resource::Resource;
use crate::types::{NamedResource, PakHeader, ResourceTableEntry};

/// A decoded PAK archive.
///
/// Every resource table entry describes the resource at the same index. Offsets are kept
/// contiguous by the editing methods, and the asset ID index is rebuilt by each of them.
///
/// ```
/// # fn doit() -> echoes_pak::error::Result<()>
/// # {
/// use echoes_formats::Dumb;
/// use echoes_pak::Pak;
///
/// let pak = Pak::builder()
///     .build()
///     .with_resource_appended(0x1000, Dumb::from(vec![0x01; 16]).into())?;
///
/// let reread = Pak::from_packed(&pak.packed()?)?;
/// assert_eq!(reread.resource_count(), 1);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Pak {
    #[builder(default = Pak::MAJOR_VERSION)]
    major_version: u16,

    #[builder(default = Pak::MINOR_VERSION)]
    minor_version: u16,

    #[builder(default)]
    unused: u32,

    #[builder(default)]
    named_resources: Vec<NamedResource>,

    #[builder(skip)]
    resource_tables: Vec<ResourceTableEntry>,

    #[builder(skip)]
    resources: Vec<Resource>,

    #[builder(skip)]
    asset_index: HashMap<u32, usize>,
}

impl Pak {
    pub const MAJOR_VERSION: u16 = 3;
    pub const MINOR_VERSION: u16 = 5;
    pub const ALIGNMENT: usize = 32;

    fn assemble(
        header: PakHeader,
        named_resources: Vec<NamedResource>,
        resource_tables: Vec<ResourceTableEntry>,
        resources: Vec<Resource>,
    ) -> Self {
        // Later entries win when an asset ID repeats
        let asset_index = resource_tables
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.asset_id, index))
            .collect();

        Self {
            major_version: header.major_version,
            minor_version: header.minor_version,
            unused: header.unused,
            named_resources,
            resource_tables,
            resources,
            asset_index,
        }
    }

    fn header(&self) -> PakHeader {
        PakHeader {
            major_version: self.major_version,
            minor_version: self.minor_version,
            unused: self.unused,
        }
    }

    #[instrument(skip_all, err)]
    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(packed);

        let header: PakHeader = reader.read_be()?;
        debug!(
            "version {}.{}",
            header.major_version, header.minor_version
        );

        let named_count = reader.read_u32::<BigEndian>()?;
        debug!("{named_count} named resources");
        let named_resources = (0..named_count)
            .map(|_| NamedResource::read(&mut reader))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let resource_count = reader.read_u32::<BigEndian>()?;
        debug!("{resource_count} resources");
        let remaining = (packed.len() as u64).saturating_sub(reader.position());
        if resource_count as u64 * ResourceTableEntry::PACKED_SIZE as u64 > remaining {
            return Err(Error::MalformedInput(format!(
                "{resource_count} resource table entries do not fit in {remaining} bytes"
            )));
        }
        let resource_tables = (0..resource_count)
            .map(|_| ResourceTableEntry::read(&mut reader))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let header_size = reader.position() as usize;
        let padding = take(&mut reader, padding_len(header_size))?;
        if padding.iter().any(|&byte| byte != 0) {
            return Err(Error::MalformedInput(format!(
                "padding after the resource table at {header_size:#X} is not zeroed"
            )));
        }

        let payloads = &packed[reader.position() as usize..];
        let mut expected_offset = 0usize;
        let resources = resource_tables
            .iter()
            .map(|entry| -> Result<_> {
                trace!(
                    "{} {:#010X}: {} bytes at {:#X}",
                    entry.asset_type,
                    entry.asset_id,
                    entry.size,
                    entry.offset
                );
                if entry.offset as usize != expected_offset {
                    return Err(Error::MalformedInput(format!(
                        "resource {:#010X} is at {:#X}, expected {expected_offset:#X}",
                        entry.asset_id, entry.offset
                    )));
                }
                expected_offset += entry.size as usize;

                let data = span(payloads, entry.offset as usize, entry.size as usize)?;
                Resource::decode(entry, data)
            })
            .collect::<Result<Vec<_>>>()?;

        if expected_offset != payloads.len() {
            return Err(Error::MalformedInput(format!(
                "resources end at {expected_offset:#X} but the payload section is {:#X} bytes",
                payloads.len()
            )));
        }

        Ok(Self::assemble(
            header,
            named_resources,
            resource_tables,
            resources,
        ))
    }

    pub fn major_version(&self) -> u16 {
        self.major_version
    }

    pub fn minor_version(&self) -> u16 {
        self.minor_version
    }

    pub fn unused(&self) -> u32 {
        self.unused
    }

    pub fn named_resources(&self) -> &[NamedResource] {
        &self.named_resources
    }

    pub fn named_resource_count(&self) -> usize {
        self.named_resources.len()
    }

    pub fn resource_tables(&self) -> &[ResourceTableEntry] {
        &self.resource_tables
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn get_resource(&self, index: usize) -> Result<&Resource> {
        self.resources
            .get(index)
            .ok_or(NotFoundError::Index(index).into())
    }

    pub fn get_resource_by_asset_id(&self, asset_id: u32) -> Result<&Resource> {
        self.get_resource(self.index_of(asset_id)?)
    }

    /// Index of the resource with `asset_id`, the last one if the ID repeats
    pub fn index_of(&self, asset_id: u32) -> Result<usize> {
        self.asset_index
            .get(&asset_id)
            .copied()
            .ok_or(NotFoundError::AssetId(asset_id).into())
    }

    /// Return a copy of this archive with `resource` stored at `index`.
    ///
    /// Resources from `index` on move up by the size of the new resource. The new entry is written
    /// uncompressed unless the resource holds bytes read from a compressed entry.
    #[instrument(skip(self, resource), err)]
    pub fn with_resource_inserted(&self, index: usize, asset_id: u32, resource: Resource) -> Result<Self> {
        if index > self.resources.len() {
            return Err(NotFoundError::Index(index).into());
        }

        let size = u32::try_from(resource.packed_size()?)
            .map_err(|_| Error::SizeOverflow("resource size"))?;
        let offset = match self.resource_tables.get(index) {
            Some(entry) => entry.offset,
            None => self.end_offset()?,
        };

        let mut resource_tables = Vec::with_capacity(self.resource_tables.len() + 1);
        resource_tables.extend_from_slice(&self.resource_tables[..index]);
        resource_tables.push(ResourceTableEntry {
            compressed: resource.compressed(),
            asset_type: resource.asset_type(),
            asset_id,
            size,
            offset,
        });
        for entry in &self.resource_tables[index..] {
            let offset = entry
                .offset
                .checked_add(size)
                .ok_or(Error::SizeOverflow("resource offset"))?;
            resource_tables.push(ResourceTableEntry { offset, ..*entry });
        }

        let mut resources = self.resources.clone();
        resources.insert(index, resource);

        Ok(Self::assemble(
            self.header(),
            self.named_resources.clone(),
            resource_tables,
            resources,
        ))
    }

    pub fn with_resource_appended(&self, asset_id: u32, resource: Resource) -> Result<Self> {
        self.with_resource_inserted(self.resources.len(), asset_id, resource)
    }

    /// Return a copy of this archive without the resource at `index`.
    ///
    /// Resources after `index` move down by the size of the removed resource.
    #[instrument(skip(self), err)]
    pub fn with_resource_removed(&self, index: usize) -> Result<Self> {
        let removed = self
            .resource_tables
            .get(index)
            .ok_or(NotFoundError::Index(index))?;

        let mut resource_tables = self.resource_tables[..index].to_vec();
        for entry in &self.resource_tables[index + 1..] {
            let offset = entry
                .offset
                .checked_sub(removed.size)
                .ok_or(Error::SizeOverflow("resource offset"))?;
            resource_tables.push(ResourceTableEntry { offset, ..*entry });
        }

        let mut resources = self.resources.clone();
        resources.remove(index);

        Ok(Self::assemble(
            self.header(),
            self.named_resources.clone(),
            resource_tables,
            resources,
        ))
    }

    pub fn with_resource_removed_by_asset_id(&self, asset_id: u32) -> Result<Self> {
        self.with_resource_removed(self.index_of(asset_id)?)
    }

    /// Return a copy of this archive with the resource at `index` swapped out, keeping its asset ID
    pub fn with_resource_replaced(&self, index: usize, resource: Resource) -> Result<Self> {
        let asset_id = self
            .resource_tables
            .get(index)
            .ok_or(NotFoundError::Index(index))?
            .asset_id;

        self.with_resource_removed(index)?
            .with_resource_inserted(index, asset_id, resource)
    }

    pub fn with_resource_replaced_by_asset_id(&self, asset_id: u32, resource: Resource) -> Result<Self> {
        let index = self.index_of(asset_id)?;

        self.with_resource_removed(index)?
            .with_resource_inserted(index, asset_id, resource)
    }

    pub fn with_named_resources_replaced(&self, named_resources: impl IntoIterator<Item = NamedResource>) -> Self {
        Self {
            named_resources: named_resources.into_iter().collect(),
            ..self.clone()
        }
    }

    fn end_offset(&self) -> Result<u32> {
        match self.resource_tables.last() {
            Some(entry) => entry
                .offset
                .checked_add(entry.size)
                .ok_or(Error::SizeOverflow("resource offset")),
            None => Ok(0),
        }
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let start = writer.stream_position()?;

        self.header().write(writer)?;
        writer.write_u32::<BigEndian>(
            u32::try_from(self.named_resources.len())
                .map_err(|_| Error::SizeOverflow("named resource count"))?,
        )?;
        for named in &self.named_resources {
            named.write(writer)?;
        }
        writer.write_u32::<BigEndian>(
            u32::try_from(self.resource_tables.len())
                .map_err(|_| Error::SizeOverflow("resource count"))?,
        )?;
        for entry in &self.resource_tables {
            entry.write(writer)?;
        }

        let header_size = (writer.stream_position()? - start) as usize;
        writer.write_all(&vec![0; padding_len(header_size)])?;

        for (entry, resource) in self.resource_tables.iter().zip(&self.resources) {
            let before = writer.stream_position()?;
            resource.write_packed(writer)?;
            let written = writer.stream_position()? - before;
            if written != entry.size as u64 {
                return Err(Error::MalformedInput(format!(
                    "resource {:#010X} packs to {written} bytes but its entry says {}",
                    entry.asset_id, entry.size
                )));
            }
        }
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

/// Zero bytes needed after `header_size` bytes to reach the next resource boundary
fn padding_len(header_size: usize) -> usize {
    (Pak::ALIGNMENT - header_size % Pak::ALIGNMENT) % Pak::ALIGNMENT
}
