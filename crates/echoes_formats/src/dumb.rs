//! Opaque data blobs.

use derive_more::derive::{AsRef, Deref, From};
use echoes_common::FourCC;

/// A DUMB asset: bytes without any structure of their own
#[derive(Debug, Default, Clone, PartialEq, Eq, Deref, From, AsRef)]
pub struct Dumb(Vec<u8>);

impl Dumb {
    pub const ASSET_TYPE: FourCC = FourCC::new(*b"DUMB");

    pub fn from_packed(packed: &[u8]) -> Self {
        Self(packed.to_vec())
    }

    pub fn data(&self) -> &[u8] {
        &self.0
    }

    pub fn packed(&self) -> Vec<u8> {
        self.0.clone()
    }

    pub fn packed_size(&self) -> usize {
        self.0.len()
    }
}
