//! Concrete schemas projecting named fields out of property structs.
//!
//! A schema never stores state of its own: each record here is built from a [`PropertyStruct`]
//! and is rebuilt whenever that struct is replaced.

use binrw::{BinRead, BinWrite};
use echoes_common::Vector;

use crate::decode::{exact, unpack_ascii, unpack_bool, unpack_bool_from_int, unpack_float, unpack_int};
use crate::error::Result;
use crate::property::{PropertyStruct, StructId, StructKind};

impl StructKind {
    /// Check that every field of the schema can be projected from `properties`
    pub(crate) fn validate(self, properties: &PropertyStruct) -> Result<()> {
        match self {
            StructKind::Generic => Ok(()),
            StructKind::EditorProperties => EditorProperties::try_from(properties).map(drop),
            StructKind::ScannableParameters => ScannableParameters::try_from(properties).map(drop),
            StructKind::ScanInfoSecondaryModel => {
                ScanInfoSecondaryModel::try_from(properties).map(drop)
            }
        }
    }
}

/// The position, orientation and size of an object in the editor
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(big)]
pub struct Transform {
    pub translation: Vector,
    pub rotation: Vector,
    pub scale: Vector,
}

/// Properties every scan tree object carries for the level editor
#[derive(Debug, Clone, PartialEq)]
pub struct EditorProperties {
    pub name: String,
    pub translation: Vector,
    pub rotation: Vector,
    pub scale: Vector,
    pub active: bool,
}

impl EditorProperties {
    pub const NAME: u32 = 0x494E_414D;
    pub const TRANSFORM: u32 = 0x5846_524D;
    pub const ACTIVE: u32 = 0x4143_5456;
}

impl TryFrom<&PropertyStruct> for EditorProperties {
    type Error = crate::error::Error;

    fn try_from(properties: &PropertyStruct) -> Result<Self> {
        let transform: Transform = properties.project(Self::TRANSFORM, exact)?;
        Ok(Self {
            name: properties.project(Self::NAME, unpack_ascii)?,
            translation: transform.translation,
            rotation: transform.rotation,
            scale: transform.scale,
            active: properties.project(Self::ACTIVE, unpack_bool)?,
        })
    }
}

/// Links a scannable scan tree entry to its SCAN asset
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScannableParameters {
    pub scan_asset_id: u32,
}

impl ScannableParameters {
    pub const SCAN_ASSET_ID: u32 = 0xB94E_9BE7;
}

impl TryFrom<&PropertyStruct> for ScannableParameters {
    type Error = crate::error::Error;

    fn try_from(properties: &PropertyStruct) -> Result<Self> {
        Ok(Self {
            scan_asset_id: properties.project(Self::SCAN_ASSET_ID, unpack_int)?,
        })
    }
}

/// An animation selection: the ANCS asset, a character inside it and the animation to start with
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct AnimationParameters {
    pub ancs_asset_id: u32,
    pub character_index: u32,
    pub initial_animation: u32,
}

/// An extra model shown next to the logbook model of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInfoSecondaryModel {
    pub model_asset_id: u32,
    pub animation_set: AnimationParameters,
    pub attach_bone_name: String,
}

impl ScanInfoSecondaryModel {
    pub const MODEL_ASSET_ID: u32 = 0x1F79_21BC;
    pub const ANIMATION_SET: u32 = 0xCDD2_02D1;
    pub const ATTACH_BONE_NAME: u32 = 0x3EA2_BED8;
}

impl TryFrom<&PropertyStruct> for ScanInfoSecondaryModel {
    type Error = crate::error::Error;

    fn try_from(properties: &PropertyStruct) -> Result<Self> {
        Ok(Self {
            model_asset_id: properties.project(Self::MODEL_ASSET_ID, unpack_int)?,
            animation_set: properties.project(Self::ANIMATION_SET, exact)?,
            attach_bone_name: properties.project(Self::ATTACH_BONE_NAME, unpack_ascii)?,
        })
    }
}

/// Logbook metadata of a SCAN asset
#[derive(Debug, Clone, PartialEq)]
pub struct ScannableObjectInfo {
    pub scan_text_asset_id: u32,
    pub slow: bool,
    pub use_logbook_model_after_scan: bool,
    pub post_scan_override_texture_asset_id: u32,
    pub logbook_default_x_rotation: f32,
    pub logbook_default_z_rotation: f32,
    pub logbook_scale: f32,
    pub logbook_model_asset_id: u32,
    pub logbook_animation_set: AnimationParameters,
    pub secondary_models: Vec<ScanInfoSecondaryModel>,
}

impl ScannableObjectInfo {
    pub const SCAN_TEXT_ASSET_ID: u32 = 0x2F5B_6423;
    pub const SLOW: u32 = 0xC308_A322;
    pub const USE_LOGBOOK_MODEL_AFTER_SCAN: u32 = 0x1733_B1EC;
    pub const POST_SCAN_OVERRIDE_TEXTURE_ASSET_ID: u32 = 0x5333_6141;
    pub const LOGBOOK_DEFAULT_X_ROTATION: u32 = 0x3DE0_BA64;
    pub const LOGBOOK_DEFAULT_Z_ROTATION: u32 = 0x2ADD_6628;
    pub const LOGBOOK_SCALE: u32 = 0xD0C1_5066;
    pub const LOGBOOK_MODEL_ASSET_ID: u32 = 0xB7AD_C418;
    pub const LOGBOOK_ANIMATION_SET: u32 = 0x1569_4EE1;
}

impl TryFrom<&PropertyStruct> for ScannableObjectInfo {
    type Error = crate::error::Error;

    fn try_from(properties: &PropertyStruct) -> Result<Self> {
        let secondary_models = StructId::SECONDARY_MODELS
            .into_iter()
            .map(|id| -> Result<_> { ScanInfoSecondaryModel::try_from(properties.get_struct(id)?) })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            scan_text_asset_id: properties.project(Self::SCAN_TEXT_ASSET_ID, unpack_int)?,
            slow: properties.project(Self::SLOW, unpack_bool_from_int)?,
            use_logbook_model_after_scan: properties
                .project(Self::USE_LOGBOOK_MODEL_AFTER_SCAN, unpack_bool)?,
            post_scan_override_texture_asset_id: properties
                .project(Self::POST_SCAN_OVERRIDE_TEXTURE_ASSET_ID, unpack_int)?,
            logbook_default_x_rotation: properties
                .project(Self::LOGBOOK_DEFAULT_X_ROTATION, unpack_float)?,
            logbook_default_z_rotation: properties
                .project(Self::LOGBOOK_DEFAULT_Z_ROTATION, unpack_float)?,
            logbook_scale: properties.project(Self::LOGBOOK_SCALE, unpack_float)?,
            logbook_model_asset_id: properties.project(Self::LOGBOOK_MODEL_ASSET_ID, unpack_int)?,
            logbook_animation_set: properties.project(Self::LOGBOOK_ANIMATION_SET, exact)?,
            secondary_models,
        })
    }
}

/// Items the player can collect, as referenced by inventory scan tree entries
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[brw(repr = u32)]
pub enum InventorySlot {
    PowerBeam = 0,
    DarkBeam = 1,
    LightBeam = 2,
    AnnihilatorBeam = 3,
    SuperMissile = 4,
    Darkburst = 5,
    Sunburst = 6,
    SonicBoom = 7,
    CombatVisor = 8,
    ScanVisor = 9,
    DarkVisor = 10,
    EchoVisor = 11,
    VariaSuit = 12,
    DarkSuit = 13,
    LightSuit = 14,
    MorphBall = 15,
    BoostBall = 16,
    SpiderBall = 17,
    MorphBallBomb = 18,
    ChargeBeam = 22,
    GrappleBeam = 23,
    SpaceJumpBoots = 24,
    GravityBoost = 25,
    SeekerLauncher = 26,
    ScrewAttack = 27,
    PowerBomb = 28,
    MissileLauncher = 29,
    BeamAmmoExpansion = 30,
    EnergyTank = 32,
    SkyTempleKey1 = 33,
    SkyTempleKey2 = 34,
    SkyTempleKey3 = 35,
    SkyTempleKey4 = 36,
    SkyTempleKey5 = 37,
    SkyTempleKey6 = 38,
    SkyTempleKey7 = 39,
    SkyTempleKey8 = 40,
    SkyTempleKey9 = 41,
    DarkAgonKey1 = 42,
    DarkAgonKey2 = 43,
    DarkAgonKey3 = 44,
    DarkTorvusKey1 = 45,
    DarkTorvusKey2 = 46,
    DarkTorvusKey3 = 47,
    IngHiveKey1 = 48,
    IngHiveKey2 = 49,
    IngHiveKey3 = 50,
    EnergyTransferModule = 51,
    ChargeCombo = 52,
}

/// Fields shared by every scan tree object
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTreeFields {
    pub editor_properties: EditorProperties,
    pub name_string_strg_asset_id: u32,
    pub name_string_name: String,
}

impl ScanTreeFields {
    pub const NAME_STRING_STRG_ASSET_ID: u32 = 0x4621_9BAC;
    pub const NAME_STRING_NAME: u32 = 0x3269_8BD6;
}

impl TryFrom<&PropertyStruct> for ScanTreeFields {
    type Error = crate::error::Error;

    fn try_from(properties: &PropertyStruct) -> Result<Self> {
        Ok(Self {
            editor_properties: EditorProperties::try_from(
                properties.get_struct(StructId::EditorProperties)?,
            )?,
            name_string_strg_asset_id: properties
                .project(Self::NAME_STRING_STRG_ASSET_ID, unpack_int)?,
            name_string_name: properties.project(Self::NAME_STRING_NAME, unpack_ascii)?,
        })
    }
}

/// The options offered by a scan tree menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOptions {
    pub menu_options_strg_asset_id: u32,
    pub option_string_names: [String; 4],
}

impl MenuOptions {
    pub const MENU_OPTIONS_STRG_ASSET_ID: u32 = 0xA6A8_74E9;
    pub const OPTION_STRING_NAMES: [u32; 4] = [0x3053_1924, 0x01BB_03B9, 0xA7CC_080D, 0x626B_3683];
}

impl TryFrom<&PropertyStruct> for MenuOptions {
    type Error = crate::error::Error;

    fn try_from(properties: &PropertyStruct) -> Result<Self> {
        let [first, second, third, fourth] = Self::OPTION_STRING_NAMES;
        Ok(Self {
            menu_options_strg_asset_id: properties
                .project(Self::MENU_OPTIONS_STRG_ASSET_ID, unpack_int)?,
            option_string_names: [
                properties.project(first, unpack_ascii)?,
                properties.project(second, unpack_ascii)?,
                properties.project(third, unpack_ascii)?,
                properties.project(fourth, unpack_ascii)?,
            ],
        })
    }
}

/// Named fields of a script object, one variant per supported object type
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectFields {
    ScannableObjectInfo(ScannableObjectInfo),
    Scnd(ScanTreeFields),
    Scsn {
        node: ScanTreeFields,
        scannable_parameters: ScannableParameters,
    },
    Scin {
        node: ScanTreeFields,
        inventory_slot: InventorySlot,
        scannable_parameters: ScannableParameters,
    },
    Scsl {
        node: ScanTreeFields,
        unknown: u32,
    },
    Scmn {
        node: ScanTreeFields,
        menu: MenuOptions,
    },
}

impl ObjectFields {
    pub const INVENTORY_SLOT: u32 = 0x3D32_6F90;
    pub const SCSL_UNKNOWN: u32 = 0x0261_A4E0;

    /// The fields shared by every scan tree object, if this is one
    pub fn scan_tree_fields(&self) -> Option<&ScanTreeFields> {
        match self {
            ObjectFields::ScannableObjectInfo(_) => None,
            ObjectFields::Scnd(node)
            | ObjectFields::Scsn { node, .. }
            | ObjectFields::Scin { node, .. }
            | ObjectFields::Scsl { node, .. }
            | ObjectFields::Scmn { node, .. } => Some(node),
        }
    }

    pub fn scannable_parameters(&self) -> Option<&ScannableParameters> {
        match self {
            ObjectFields::Scsn {
                scannable_parameters,
                ..
            }
            | ObjectFields::Scin {
                scannable_parameters,
                ..
            } => Some(scannable_parameters),
            _ => None,
        }
    }
}

pub(crate) fn scannable_parameters(properties: &PropertyStruct) -> Result<ScannableParameters> {
    ScannableParameters::try_from(properties.get_struct(StructId::ScannableParameters)?)
}

pub(crate) fn inventory_slot(properties: &PropertyStruct) -> Result<InventorySlot> {
    properties.project(ObjectFields::INVENTORY_SLOT, exact)
}

pub(crate) fn scsl_unknown(properties: &PropertyStruct) -> Result<u32> {
    properties.project(ObjectFields::SCSL_UNKNOWN, unpack_int)
}
