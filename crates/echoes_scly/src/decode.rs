//! Leaf decoding functions used to project named fields out of property payloads.
//!
//! Every function expects the payload to be consumed exactly.

use std::io::Cursor;

use binrw::{BinRead, Endian};
use byteorder::{BigEndian, ReadBytesExt};
use echoes_common::reader::expect_consumed;
use echoes_common::string::unpack_null_terminated_ascii;

use crate::error::Result;

/// Decode any big endian binrw type that takes no arguments
pub fn exact<T>(packed: &[u8]) -> Result<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let mut reader = Cursor::new(packed);
    let value = T::read_options(&mut reader, Endian::Big, ())?;
    expect_consumed(&reader, "property value")?;
    Ok(value)
}

pub fn unpack_int(packed: &[u8]) -> Result<u32> {
    exact(packed)
}

pub fn unpack_float(packed: &[u8]) -> Result<f32> {
    exact(packed)
}

/// A single byte, any non-zero value is true
pub fn unpack_bool(packed: &[u8]) -> Result<bool> {
    let mut reader = Cursor::new(packed);
    let value = reader.read_u8()?;
    expect_consumed(&reader, "property value")?;
    Ok(value != 0)
}

/// A four byte integer, any non-zero value is true
pub fn unpack_bool_from_int(packed: &[u8]) -> Result<bool> {
    let mut reader = Cursor::new(packed);
    let value = reader.read_u32::<BigEndian>()?;
    expect_consumed(&reader, "property value")?;
    Ok(value != 0)
}

pub fn unpack_ascii(packed: &[u8]) -> Result<String> {
    Ok(unpack_null_terminated_ascii(packed)?)
}
