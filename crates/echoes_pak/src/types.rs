use binrw::binrw;
use binrw::{BinRead, BinWrite};
use echoes_common::FourCC;

/// Fixed fields at the start of every archive
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct PakHeader {
    pub major_version: u16,
    pub minor_version: u16,
    pub unused: u32,
}

impl PakHeader {
    pub const PACKED_SIZE: usize = 8;
}

/// Gives a name to one of the archived resources
#[binrw]
#[brw(big)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedResource {
    pub asset_type: FourCC,
    pub asset_id: u32,

    #[br(temp)]
    #[bw(try_calc = name.len().try_into())]
    name_length: u32,

    #[br(count = name_length, try_map = String::from_utf8)]
    #[br(assert(name.is_ascii(), "resource name {:?} is not ASCII", name))]
    #[bw(map = |name: &String| name.as_bytes().to_vec())]
    pub name: String,
}

impl NamedResource {
    pub fn new(asset_type: impl Into<FourCC>, asset_id: u32, name: impl Into<String>) -> Self {
        Self {
            asset_type: asset_type.into(),
            asset_id,
            name: name.into(),
        }
    }
}

/// Describes one archived resource.
///
/// Offsets are relative to the first byte after the padding that follows the tables.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct ResourceTableEntry {
    #[br(map = |compressed: u32| compressed != 0)]
    #[bw(map = |compressed: &bool| u32::from(*compressed))]
    pub compressed: bool,
    pub asset_type: FourCC,
    pub asset_id: u32,
    pub size: u32,
    pub offset: u32,
}

impl ResourceTableEntry {
    pub const PACKED_SIZE: usize = 20;
}
