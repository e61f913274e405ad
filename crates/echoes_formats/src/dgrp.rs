//! Dependency groups: the list of assets another asset needs loaded.

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::reader::expect_consumed;
use echoes_common::FourCC;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Field order of a packed dependency.
///
/// Revisions of the format disagree on whether the asset type or the asset ID comes first.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DependencyOrder {
    /// `asset_type:4B, asset_id:u32`
    #[default]
    TypeFirst,
    /// `asset_id:u32, asset_type:4B`
    IdFirst,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub asset_type: FourCC,
    pub asset_id: u32,
}

impl Dependency {
    pub const PACKED_SIZE: usize = 8;

    pub fn new(asset_type: impl Into<FourCC>, asset_id: u32) -> Self {
        Self {
            asset_type: asset_type.into(),
            asset_id,
        }
    }

    fn read<R: Read>(reader: &mut R, order: DependencyOrder) -> Result<Self> {
        let mut asset_type = [0u8; 4];
        let asset_id = match order {
            DependencyOrder::TypeFirst => {
                reader.read_exact(&mut asset_type)?;
                reader.read_u32::<BigEndian>()?
            }
            DependencyOrder::IdFirst => {
                let asset_id = reader.read_u32::<BigEndian>()?;
                reader.read_exact(&mut asset_type)?;
                asset_id
            }
        };

        Ok(Self {
            asset_type: FourCC(asset_type),
            asset_id,
        })
    }

    fn write<W: Write>(&self, writer: &mut W, order: DependencyOrder) -> Result<()> {
        match order {
            DependencyOrder::TypeFirst => {
                writer.write_all(self.asset_type.as_bytes())?;
                writer.write_u32::<BigEndian>(self.asset_id)?;
            }
            DependencyOrder::IdFirst => {
                writer.write_u32::<BigEndian>(self.asset_id)?;
                writer.write_all(self.asset_type.as_bytes())?;
            }
        }
        Ok(())
    }
}

/// A decoded DGRP asset, or the dependency list trailing a SCAN asset
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dgrp {
    order: DependencyOrder,
    dependencies: Vec<Dependency>,
}

impl Dgrp {
    pub const ASSET_TYPE: FourCC = FourCC::new(*b"DGRP");

    pub fn new(order: DependencyOrder, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        Self {
            order,
            dependencies: dependencies.into_iter().collect(),
        }
    }

    /// Decode a group in the default field order which occupies the whole buffer
    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        Self::from_packed_with_order(packed, DependencyOrder::default())
    }

    #[instrument(skip(packed), err)]
    pub fn from_packed_with_order(packed: &[u8], order: DependencyOrder) -> Result<Self> {
        let mut reader = Cursor::new(packed);
        let result = Self::read(&mut reader, order)?;
        expect_consumed(&reader, "dependency group")?;
        Ok(result)
    }

    pub(crate) fn read(reader: &mut Cursor<&[u8]>, order: DependencyOrder) -> Result<Self> {
        let count = reader.read_u32::<BigEndian>()?;
        debug!("{count} dependencies");

        let remaining = (reader.get_ref().len() as u64).saturating_sub(reader.position());
        if count as u64 * Dependency::PACKED_SIZE as u64 > remaining {
            return Err(Error::MalformedInput(format!(
                "{count} dependencies do not fit in {remaining} bytes"
            )));
        }

        let dependencies = (0..count)
            .map(|_| Dependency::read(reader, order))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            order,
            dependencies,
        })
    }

    pub fn order(&self) -> DependencyOrder {
        self.order
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Return a copy of this group with a new dependency list
    pub fn with_dependencies_replaced(&self, dependencies: impl IntoIterator<Item = Dependency>) -> Self {
        Self::new(self.order, dependencies)
    }

    pub fn write_packed<W: Write>(&self, writer: &mut W) -> Result<()> {
        let count = u32::try_from(self.dependencies.len())
            .map_err(|_| Error::SizeOverflow("dependency count"))?;
        writer.write_u32::<BigEndian>(count)?;
        for dependency in &self.dependencies {
            dependency.write(writer, self.order)?;
        }
        Ok(())
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut packed = Vec::new();
        self.write_packed(&mut packed)?;
        Ok(packed)
    }

    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}
