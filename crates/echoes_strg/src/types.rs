use binrw::{BinRead, BinWrite};
use echoes_common::FourCC;

/// Locates the string table of one language
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct LanguageTable {
    pub language_id: FourCC,
    /// Relative to the end of the name table
    pub strings_offset: u32,
    pub strings_size: u32,
}

impl LanguageTable {
    pub const PACKED_SIZE: usize = 12;
}

/// Maps a name to a string index
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct NameEntry {
    /// Relative to the end of the name table's count and size fields
    pub offset: u32,
    pub string_index: u32,
}

impl NameEntry {
    pub const PACKED_SIZE: usize = 8;
}
