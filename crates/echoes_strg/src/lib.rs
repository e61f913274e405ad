//! This library reads and edits the **STRG** string tables used by *Metroid Prime 2: Echoes*.
//!
//! # STRG Format
//!
//! A STRG asset holds the same set of strings in several languages, plus an optional table naming
//! some of the string indices.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x87654321                                     |
//! | 0x0004         | Version                | 4 bytes                                                 |
//! | 0x0008         | Language Count         | 4 bytes: Number of language tables                      |
//! | 0x000C         | String Count           | 4 bytes: Number of strings in every language            |
//! | 0x0010         | Language Tables        | 12 bytes each                                           |
//! | ...            | Name Table             | Variable                                                |
//! | ...            | String Tables          | One per language, in language order                     |
//!
//! ### Language Table
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Language ID            | 4 bytes: ASCII, e.g. `ENGL`                             |
//! | 0x0004         | Strings Offset         | 4 bytes: Relative to the end of the name table          |
//! | 0x0008         | Strings Size           | 4 bytes: Size of the language's string table            |
//!
//! ### Name Table
//!
//! A 4-byte entry count and a 4-byte size, followed by `size` bytes: 8-byte entries (name offset,
//! string index) and then the null-terminated ASCII names. Name offsets are relative to the end of
//! the count and size fields.
//!
//! ### String Table
//!
//! One 4-byte offset per string, relative to the start of the table, followed by the
//! null-terminated UTF-16 strings in ascending offset order.
//!
//! ## Additional Information
//!
//! - **Endianness**: Big-endian for all multi-byte values
//! - **Serialization**: with the `serde` feature, string tables serialize as lists of strings and
//!   a [`Strg`] as a map from language ID to its strings
//!

pub mod error;
pub mod name_table;
#[cfg(feature = "serde")]
mod serde;
pub mod strg;
pub mod string_table;
pub mod types;

pub use name_table::NameTable;
pub use strg::Strg;
pub use string_table::StringTable;
pub use types::{LanguageTable, NameEntry};
