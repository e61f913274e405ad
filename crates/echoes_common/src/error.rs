//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// string is missing its null terminator
    #[error("string is missing its null terminator")]
    MissingTerminator,

    /// string contains non-ascii data
    #[error("string contains non-ascii data")]
    NonAscii,

    /// string contains an interior null
    #[error("string contains an interior null")]
    InteriorNull,

    /// span of {length} bytes at offset {offset} exceeds the {available} available bytes
    #[error("span of {length} bytes at offset {offset} exceeds the {available} available bytes")]
    OutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// {count} unexpected bytes after {context}
    #[error("{count} unexpected bytes after {context}")]
    TrailingBytes { context: &'static str, count: usize },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
