//! Hint system assets.

use std::io::{Cursor, Seek, Write};

use binrw::{binrw, BinRead, BinResult, BinWrite, NullString};
use echoes_common::reader::expect_consumed;
use echoes_common::string::{pack_null_terminated_ascii, unpack_ascii};
use echoes_common::FourCC;
use tracing::{debug, instrument};

use crate::error::Result;

/// A room a hint points the player to
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct HintLocation {
    pub world_mlvl_asset_id: u32,
    pub room_mrea_asset_id: u32,
    pub room_index: u32,
    pub map_text_strg_asset_id: u32,
}

#[binrw]
#[brw(big)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HintEntry {
    #[br(parse_with = read_name)]
    #[bw(write_with = write_name)]
    pub name: String,
    pub immediate_time: f32,
    pub normal_time: f32,
    pub text_strg_asset_id: u32,
    pub text_time: f32,

    #[br(temp)]
    #[bw(try_calc = locations.len().try_into())]
    location_count: u32,

    #[br(count = location_count)]
    pub locations: Vec<HintLocation>,
}

fn name_error(pos: u64, err: echoes_common::error::Error) -> binrw::Error {
    binrw::Error::AssertFail {
        pos,
        message: format!("hint name: {err}"),
    }
}

#[binrw::parser(reader)]
fn read_name() -> BinResult<String> {
    let pos = reader.stream_position()?;
    let name = NullString::read_be(reader)?;
    unpack_ascii(&name.0).map_err(|err| name_error(pos, err))
}

#[binrw::writer(writer)]
fn write_name(name: &String) -> BinResult<()> {
    let pos = writer.stream_position()?;
    let packed = pack_null_terminated_ascii(name).map_err(|err| name_error(pos, err))?;
    writer.write_all(&packed)?;
    Ok(())
}

/// A decoded HINT asset.
///
/// The hint count is derived from the hint list when written.
#[binrw]
#[brw(big)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Hint {
    pub magic: u32,
    pub version: u32,

    #[br(temp)]
    #[bw(try_calc = hints.len().try_into())]
    hint_count: u32,

    #[br(count = hint_count)]
    hints: Vec<HintEntry>,
}

impl Hint {
    pub const ASSET_TYPE: FourCC = FourCC::new(*b"HINT");
    pub const MAGIC: u32 = 0x00BA_DBAD;

    pub fn new(version: u32, hints: impl IntoIterator<Item = HintEntry>) -> Self {
        Self {
            magic: Self::MAGIC,
            version,
            hints: hints.into_iter().collect(),
        }
    }

    #[instrument(skip_all, err)]
    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(packed);
        let result = Self::read(&mut reader)?;
        expect_consumed(&reader, "hint asset")?;
        debug!("{} hints", result.hints.len());
        Ok(result)
    }

    pub fn hints(&self) -> &[HintEntry] {
        &self.hints
    }

    pub fn hint_count(&self) -> usize {
        self.hints.len()
    }

    /// Return a copy of this asset with a new hint list
    pub fn with_hints_replaced(&self, hints: impl IntoIterator<Item = HintEntry>) -> Self {
        Self {
            magic: self.magic,
            version: self.version,
            hints: hints.into_iter().collect(),
        }
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}
