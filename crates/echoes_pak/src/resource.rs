//! Decoded archive resources and the registry choosing a decoder for each asset type.

use std::io::{Cursor, Seek, Write};

use derive_more::derive::From;
use echoes_common::FourCC;
use echoes_formats::{Dumb, ScanTree};
use echoes_strg::Strg;
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::ResourceTableEntry;

/// The bytes of a resource this library does not decode, kept as found.
///
/// `compressed` is set for resources read from a compressed entry, so the bytes keep their flag
/// when they are inserted again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueResource {
    pub asset_type: FourCC,
    pub compressed: bool,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, From)]
pub enum Resource {
    ScanTree(ScanTree),
    Dumb(Dumb),
    Strg(Strg),
    Opaque(OpaqueResource),
}

type Decoder = fn(&[u8]) -> Result<Resource>;

/// Asset types with a decoder, anything else is kept opaque
const REGISTRY: [(FourCC, Decoder); 2] = [
    (Dumb::ASSET_TYPE, |packed| Ok(Dumb::from_packed(packed).into())),
    (Strg::ASSET_TYPE, |packed| Ok(Strg::from_packed(packed)?.into())),
];

impl Resource {
    /// Decode the bytes described by `entry`.
    ///
    /// The scan tree is recognised by its asset ID alone. Compressed resources are never
    /// decompressed and stay opaque.
    pub fn decode(entry: &ResourceTableEntry, packed: &[u8]) -> Result<Self> {
        if entry.compressed {
            warn!(
                "{} {:#010X} is compressed, keeping it opaque",
                entry.asset_type, entry.asset_id
            );
            return Ok(Self::Opaque(OpaqueResource {
                asset_type: entry.asset_type,
                compressed: true,
                data: packed.to_vec(),
            }));
        }

        if entry.asset_id == ScanTree::ASSET_ID {
            debug!("{} {:#010X} as scan tree", entry.asset_type, entry.asset_id);
            return Ok(ScanTree::from_packed(packed)?.into());
        }

        match REGISTRY.iter().find(|(asset_type, _)| *asset_type == entry.asset_type) {
            Some((_, decode)) => decode(packed),
            None => {
                debug!("no decoder for {}, keeping it opaque", entry.asset_type);
                Ok(Self::opaque(entry.asset_type, packed))
            }
        }
    }

    pub fn opaque(asset_type: impl Into<FourCC>, data: impl Into<Vec<u8>>) -> Self {
        Self::Opaque(OpaqueResource {
            asset_type: asset_type.into(),
            compressed: false,
            data: data.into(),
        })
    }

    /// Whether the table entry for this resource is flagged as compressed.
    ///
    /// Only bytes read from a compressed entry are; decoded resources are always written plain.
    pub fn compressed(&self) -> bool {
        match self {
            Self::Opaque(opaque) => opaque.compressed,
            _ => false,
        }
    }

    /// The asset type written to the resource table when this resource is inserted
    pub fn asset_type(&self) -> FourCC {
        match self {
            // The scan tree is stored as a blob
            Self::ScanTree(_) | Self::Dumb(_) => Dumb::ASSET_TYPE,
            Self::Strg(_) => Strg::ASSET_TYPE,
            Self::Opaque(opaque) => opaque.asset_type,
        }
    }

    pub fn as_scan_tree(&self) -> Option<&ScanTree> {
        match self {
            Self::ScanTree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_dumb(&self) -> Option<&Dumb> {
        match self {
            Self::Dumb(dumb) => Some(dumb),
            _ => None,
        }
    }

    pub fn as_strg(&self) -> Option<&Strg> {
        match self {
            Self::Strg(strg) => Some(strg),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueResource> {
        match self {
            Self::Opaque(opaque) => Some(opaque),
            _ => None,
        }
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::ScanTree(tree) => tree.write_packed(writer)?,
            Self::Dumb(dumb) => writer.write_all(dumb.data())?,
            Self::Strg(strg) => strg.write_packed(writer)?,
            Self::Opaque(opaque) => writer.write_all(&opaque.data)?,
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

#[cfg(test)]
mod test {
    use echoes_common::FourCC;
    use echoes_formats::{Dumb, ScanTree};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::error::Result;
    use crate::resource::Resource;
    use crate::types::ResourceTableEntry;

    fn entry(asset_type: &[u8; 4], asset_id: u32, size: usize) -> ResourceTableEntry {
        ResourceTableEntry {
            compressed: false,
            asset_type: FourCC::from(asset_type),
            asset_id,
            size: size as u32,
            offset: 0,
        }
    }

    #[traced_test]
    #[test]
    fn unknown_type_is_opaque() -> Result<()> {
        let input = vec![0x01, 0x02, 0x03, 0x04];
        let result = Resource::decode(&entry(b"TXTR", 1, input.len()), &input)?;

        assert_eq!(result, Resource::opaque(b"TXTR", input.clone()));
        assert_eq!(result.asset_type(), FourCC::from(b"TXTR"));
        assert!(!result.compressed());
        assert_eq!(result.packed()?, input);

        Ok(())
    }

    #[test]
    fn dumb_is_decoded() -> Result<()> {
        let input = vec![0xAA; 8];
        let result = Resource::decode(&entry(b"DUMB", 1, input.len()), &input)?;

        assert_eq!(result.as_dumb(), Some(&Dumb::from(input)));

        Ok(())
    }

    #[test]
    fn compressed_is_opaque() -> Result<()> {
        let input = vec![0xAA; 8];
        let mut compressed = entry(b"DUMB", 1, input.len());
        compressed.compressed = true;

        let result = Resource::decode(&compressed, &input)?;
        assert_eq!(result.as_opaque().map(|opaque| opaque.compressed), Some(true));
        assert!(result.compressed());
        assert_eq!(result.asset_type(), Dumb::ASSET_TYPE);
        assert_eq!(result.packed()?, input);

        Ok(())
    }

    #[test]
    fn scan_tree_is_found_by_asset_id() -> Result<()> {
        let tree = ScanTree::new(0, 0, [])?;
        let input = tree.packed()?;

        let result = Resource::decode(&entry(b"TXTR", ScanTree::ASSET_ID, input.len()), &input)?;
        assert_eq!(result.as_scan_tree(), Some(&tree));
        assert_eq!(result.asset_type(), Dumb::ASSET_TYPE);

        Ok(())
    }
}
