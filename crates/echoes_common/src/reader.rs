//! Slicing helpers for decoding offset-addressed spans out of an in-memory buffer.

use std::io::Cursor;

use crate::error::{Error, Result};

/// Take the next `length` bytes from the reader without copying them, advancing its position.
pub fn take<'a>(reader: &mut Cursor<&'a [u8]>, length: usize) -> Result<&'a [u8]> {
    let data: &'a [u8] = reader.get_ref();
    let offset = reader.position() as usize;
    let end = offset
        .checked_add(length)
        .filter(|end| *end <= data.len())
        .ok_or(Error::OutOfBounds {
            offset,
            length,
            available: data.len(),
        })?;

    reader.set_position(end as u64);
    Ok(&data[offset..end])
}

/// Borrow `length` bytes at an absolute `offset` of `data`
pub fn span(data: &[u8], offset: usize, length: usize) -> Result<&[u8]> {
    offset
        .checked_add(length)
        .filter(|end| *end <= data.len())
        .map(|end| &data[offset..end])
        .ok_or(Error::OutOfBounds {
            offset,
            length,
            available: data.len(),
        })
}

/// Fail when the reader has not consumed its whole buffer
pub fn expect_consumed(reader: &Cursor<&[u8]>, context: &'static str) -> Result<()> {
    let remaining = reader
        .get_ref()
        .len()
        .saturating_sub(reader.position() as usize);
    if remaining != 0 {
        return Err(Error::TrailingBytes {
            context,
            count: remaining,
        });
    }
    Ok(())
}
