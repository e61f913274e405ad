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

    /// Transparent warpper for [`echoes_common::error::Error`]
    #[error(transparent)]
    CommonError(#[from] echoes_common::error::Error),

    /// Transparent warpper for [`echoes_strg::error::Error`]
    #[error(transparent)]
    StrgError(#[from] echoes_strg::error::Error),

    /// Transparent warpper for [`echoes_formats::error::Error`]
    #[error(transparent)]
    FormatsError(#[from] echoes_formats::error::Error),

    /// buffer does not hold a valid archive
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// a size or offset no longer fits in its field
    #[error("{0} does not fit in its size field")]
    SizeOverflow(&'static str),

    /// unable to find requested resource
    #[error("unable to find requested resource")]
    NotFound(#[from] NotFoundError),
}

/// Error type to provide further information when a lookup fails
#[derive(Error, Diagnostic, Debug)]
pub enum NotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by asset id {0:#010X}
    #[error("by asset id {0:#010X}")]
    AssetId(u32),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
