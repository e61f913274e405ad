//! Helpers for the string encodings used across the formats.
//!
//! Property leaves and HINT/STRG names use null-terminated ASCII, STRG strings use null-terminated
//! UTF-16 in big endian.

use std::io::{Read, Seek, Write};

use binrw::{BinRead, BinWrite, NullString, NullWideString};
use widestring::{U16Str, U16String};

use crate::error::{Error, Result};

/// Decode ASCII bytes that carry no terminator (PAK names, four character codes)
pub fn unpack_ascii(packed: &[u8]) -> Result<String> {
    if !packed.is_ascii() {
        return Err(Error::NonAscii);
    }
    Ok(packed.iter().map(|c| *c as char).collect())
}

/// Encode a string as ASCII bytes without a terminator
pub fn pack_ascii(string: &str) -> Result<Vec<u8>> {
    if !string.is_ascii() {
        return Err(Error::NonAscii);
    }
    Ok(string.as_bytes().to_vec())
}

/// Decode a payload which holds exactly one null-terminated ASCII string
pub fn unpack_null_terminated_ascii(packed: &[u8]) -> Result<String> {
    match packed.split_last() {
        Some((0, string)) if !string.contains(&0) => unpack_ascii(string),
        Some((0, _)) => Err(Error::InteriorNull),
        _ => Err(Error::MissingTerminator),
    }
}

/// Encode a string as null-terminated ASCII
pub fn pack_null_terminated_ascii(string: &str) -> Result<Vec<u8>> {
    if string.contains('\0') {
        return Err(Error::InteriorNull);
    }
    let mut packed = pack_ascii(string)?;
    packed.push(0);
    Ok(packed)
}

/// Read a null-terminated ASCII string from the current position
pub fn read_null_terminated_ascii<R: Read + Seek>(reader: &mut R) -> Result<String> {
    let string = NullString::read_be(reader)?;
    unpack_ascii(&string.0)
}

/// Write a null-terminated ASCII string
pub fn write_null_terminated_ascii<W: Write + Seek>(writer: &mut W, string: &str) -> Result<()> {
    if string.contains('\0') {
        return Err(Error::InteriorNull);
    }
    NullString(pack_ascii(string)?).write_be(writer)?;
    Ok(())
}

/// Read a null-terminated big endian UTF-16 string from the current position
pub fn read_null_terminated_utf16<R: Read + Seek>(reader: &mut R) -> Result<U16String> {
    let string = NullWideString::read_be(reader)?;
    Ok(U16String::from_vec(string.0))
}

/// Write a null-terminated big endian UTF-16 string
pub fn write_null_terminated_utf16<W: Write + Seek>(writer: &mut W, string: &U16Str) -> Result<()> {
    if string.as_slice().contains(&0) {
        return Err(Error::InteriorNull);
    }
    NullWideString(string.as_slice().to_vec()).write_be(writer)?;
    Ok(())
}

/// Encoded length of a null-terminated UTF-16 string, terminator included
pub fn null_terminated_utf16_len(string: &U16Str) -> usize {
    2 * (string.len() + 1)
}
