//! Primitive codecs shared by the *Metroid Prime 2: Echoes* asset format crates.
//!
//! Every format in the resource archive is big endian and is assembled from a handful of building
//! blocks:
//!
//! | Primitive                 | Size        | Description                                          |
//! |---------------------------|-------------|------------------------------------------------------|
//! | Four character code       | 4 bytes     | Asset types, language IDs, script object types       |
//! | Integer                   | 1/2/4 bytes | Unsigned, big endian                                 |
//! | Float                     | 4 bytes     | IEEE-754 single precision, big endian                |
//! | Vector                    | 12 bytes    | Three floats                                         |
//! | Null-terminated ASCII     | variable    | Names, property strings                              |
//! | Null-terminated UTF-16BE  | variable    | Localized strings                                    |
//!

pub mod error;
pub mod reader;
pub mod string;
pub mod types;

pub use types::{FourCC, Vector};
