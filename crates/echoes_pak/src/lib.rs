//! This library reads and edits the **PAK** archives used by *Metroid Prime 2: Echoes*.
//!
//! # PAK Format
//!
//! A PAK archive bundles resources, each identified by an asset type and a 32-bit asset ID. Some
//! resources are also given a name.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Major Version          | 2 bytes                                                 |
//! | 0x0002         | Minor Version          | 2 bytes                                                 |
//! | 0x0004         | Unused                 | 4 bytes                                                 |
//! | 0x0008         | Named Resource Count   | 4 bytes                                                 |
//! | 0x000C         | Named Resources        | Variable                                                |
//! | ...            | Resource Count         | 4 bytes                                                 |
//! | ...            | Resource Table         | 20 bytes per resource                                   |
//! | ...            | Padding                | Zeroes up to a multiple of 32 bytes                     |
//! | ...            | Resources              | Packed back to back in table order                      |
//!
//! ### Named Resource
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Asset Type             | 4 bytes: ASCII, e.g. `STRG`                             |
//! | 0x0004         | Asset ID               | 4 bytes                                                 |
//! | 0x0008         | Name Length            | 4 bytes                                                 |
//! | 0x000C         | Name                   | ASCII, no terminator                                    |
//!
//! ### Resource Table Entry
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Compressed             | 4 bytes: 0 or 1                                         |
//! | 0x0004         | Asset Type             | 4 bytes: ASCII                                          |
//! | 0x0008         | Asset ID               | 4 bytes                                                 |
//! | 0x000C         | Size                   | 4 bytes                                                 |
//! | 0x0010         | Offset                 | 4 bytes: Relative to the end of the padding             |
//!
//! ## Additional Information
//!
//! - **Endianness**: Big-endian for all multi-byte values
//! - **Decoding**: `DUMB` and `STRG` resources are decoded, and asset ID `0x95B61279` is always the
//!   scan tree. Every other resource, and every compressed one, is kept as opaque bytes
//! - **Compression**: never performed. Decoded resources are stored uncompressed, while bytes read
//!   from a compressed entry keep the flag when they are inserted again
//!

pub mod error;
pub mod pak;
pub mod resource;
pub mod types;

pub use pak::Pak;
pub use resource::{OpaqueResource, Resource};
pub use types::{NamedResource, PakHeader, ResourceTableEntry};
