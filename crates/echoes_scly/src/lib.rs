//! This library reads and edits the **property structs** and **script objects** used by
//! *Metroid Prime 2: Echoes*.
//!
//! # Property Struct Format
//!
//! A property struct is a self-describing tree. Each node starts with a 4-byte ID and a 2-byte
//! size; whether the payload is a nested struct or an opaque leaf is decided by the ID alone (see
//! [`property::StructId`]).
//!
//! | Offset (bytes) | Field             | Description                                              |
//! |----------------|-------------------|----------------------------------------------------------|
//! | 0x0000         | ID                | 4 bytes: Struct ID                                       |
//! | 0x0004         | Size              | 2 bytes: Byte count following this field                 |
//! | 0x0006         | Subproperty Count | 2 bytes: Number of subproperties                         |
//! | 0x0008         | Subproperties     | Back to back, no padding                                 |
//!
//! A leaf subproperty is a 4-byte ID, a 2-byte payload size and the payload.
//!
//! # Script Object Format
//!
//! | Offset (bytes) | Field             | Description                                              |
//! |----------------|-------------------|----------------------------------------------------------|
//! | 0x0000         | Instance Type     | 4 bytes: ASCII object type, e.g. `SCND`                  |
//! | 0x0004         | Instance Size     | 2 bytes: Byte count following this field                 |
//! | 0x0006         | Instance ID       | 4 bytes                                                  |
//! | 0x000A         | Connection Count  | 2 bytes                                                  |
//! | 0x000C         | Connections       | 12 bytes each: state, message, target instance ID        |
//! | ...            | Properties        | One base property struct                                 |
//!
//! Only the scan related object types are supported; see [`object::ScriptObjectKind`].
//!
//! All multi-byte values are big endian.
//!

pub mod decode;
pub mod error;
pub mod object;
pub mod property;
pub mod schema;

pub use object::{Connection, ScriptObject, ScriptObjectKind};
pub use property::{PropertyLeaf, PropertyNode, PropertyStruct, SchemaRegistry, StructId, StructKind};
pub use schema::{InventorySlot, ObjectFields};
