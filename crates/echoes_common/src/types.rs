//! Fixed-width records shared by every format.

use binrw::{BinRead, BinWrite};
use derive_more::derive::{AsRef, Deref, From};
use std::fmt;

/// A four character code, used for asset types, language IDs, script object types and connection
/// states/messages.
#[derive(BinRead, BinWrite, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deref, From, AsRef)]
#[brw(big)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Create a code from its raw bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The raw bytes of the code
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether every byte of the code is printable ASCII
    pub fn is_ascii(&self) -> bool {
        self.0.iter().all(|c| c.is_ascii_graphic() || *c == b' ')
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(value: &[u8; 4]) -> Self {
        Self(*value)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ascii() {
            self.0.iter().try_for_each(|c| write!(f, "{}", *c as char))
        } else {
            write!(f, "{:#010X}", u32::from_be_bytes(self.0))
        }
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC(\"{self}\")")
    }
}

/// Three big endian floats
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(big)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    /// Size of a packed vector in bytes
    pub const PACKED_SIZE: usize = 12;

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}
