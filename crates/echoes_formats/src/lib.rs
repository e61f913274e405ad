//! This library reads and edits the smaller asset formats of *Metroid Prime 2: Echoes*: dependency
//! groups (**DGRP**), opaque blobs (**DUMB**), hint tables (**HINT**), logbook entries (**SCAN**) and
//! the logbook's scan tree.
//!
//! All multi-byte values are big-endian.
//!
//! # DGRP
//!
//! | Offset (bytes) | Field            | Description                                              |
//! |----------------|------------------|----------------------------------------------------------|
//! | 0x0000         | Dependency Count | 4 bytes                                                  |
//! | 0x0004         | Dependencies     | 8 bytes each: asset type and asset ID                    |
//!
//! Some revisions store the asset ID before the asset type, see [`DependencyOrder`].
//!
//! # HINT
//!
//! | Offset (bytes) | Field            | Description                                              |
//! |----------------|------------------|----------------------------------------------------------|
//! | 0x0000         | Magic number     | 4 bytes: 0x00BADBAD                                      |
//! | 0x0004         | Version          | 4 bytes                                                  |
//! | 0x0008         | Hint Count       | 4 bytes                                                  |
//! | 0x000C         | Hints            | Variable                                                 |
//!
//! Each hint is a null-terminated name, the immediate and normal times, the text STRG asset ID, the
//! text time and a counted list of 16-byte locations.
//!
//! # SCAN
//!
//! | Offset (bytes) | Field            | Description                                              |
//! |----------------|------------------|----------------------------------------------------------|
//! | 0x0000         | Magic number     | 4 bytes: `SCAN`                                          |
//! | 0x0004         | Unknown          | 4 bytes                                                  |
//! | 0x0008         | Unknown          | 1 byte                                                   |
//! | 0x0009         | Object Count     | 4 bytes: always 1                                        |
//! | 0x000D         | Object           | Scannable object info script object                      |
//! | ...            | Dependencies     | A DGRP body                                              |
//!
//! # Scan Tree
//!
//! | Offset (bytes) | Field            | Description                                              |
//! |----------------|------------------|----------------------------------------------------------|
//! | 0x0000         | Magic number     | 4 bytes: `TREE`                                          |
//! | 0x0004         | Root Instance ID | 4 bytes                                                  |
//! | 0x0008         | Unknown          | 1 byte                                                   |
//! | 0x0009         | Object Count     | 4 bytes                                                  |
//! | 0x000D         | Objects          | SCND, SCSN, SCIN, SCSL and SCMN script objects           |
//! | ...            | Padding          | `0xFF` up to a multiple of 32 bytes                      |
//!

pub mod dgrp;
pub mod dumb;
pub mod error;
pub mod hint;
pub mod scan;
pub mod tree;

pub use dgrp::{Dependency, DependencyOrder, Dgrp};
pub use dumb::Dumb;
pub use hint::{Hint, HintEntry, HintLocation};
pub use scan::Scan;
pub use tree::ScanTree;
