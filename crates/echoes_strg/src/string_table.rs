//! The strings of one language.

use std::io::{Cursor, Seek, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::reader::span;
use echoes_common::string::{
    null_terminated_utf16_len, read_null_terminated_utf16, write_null_terminated_utf16,
};
use tracing::trace;
use widestring::{U16Str, U16String};

use crate::error::{Error, NotFoundError, Result};

/// One language's strings together with the offsets they are stored at.
///
/// Offsets are relative to the start of the table. The first string follows the offset list and
/// each later string starts where the previous one (terminator included) ends. Strings are always
/// written in ascending offset order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<String>", into = "Vec<String>")
)]
pub struct StringTable {
    offsets: Vec<u32>,
    strings: Vec<U16String>,
}

impl StringTable {
    /// Build a table laying the strings out back to back in the given order
    pub fn from_strings<S: Into<U16String>>(strings: impl IntoIterator<Item = S>) -> Result<Self> {
        let strings = strings.into_iter().map(Into::into).collect::<Vec<U16String>>();

        let mut offsets = Vec::with_capacity(strings.len());
        let mut offset = 4 * strings.len();
        for string in &strings {
            if string.as_slice().contains(&0) {
                return Err(echoes_common::error::Error::InteriorNull.into());
            }
            offsets.push(u32::try_from(offset).map_err(|_| Error::SizeOverflow("string offset"))?);
            offset += null_terminated_utf16_len(string);
        }

        Ok(Self { offsets, strings })
    }

    /// Decode a table holding `string_count` strings which occupies the whole buffer
    pub fn from_packed(packed: &[u8], string_count: usize) -> Result<Self> {
        let offsets_size = string_count
            .checked_mul(4)
            .ok_or(Error::SizeOverflow("string offset list"))?;
        let mut reader = Cursor::new(span(packed, 0, offsets_size)?);
        let offsets = (0..string_count)
            .map(|_| reader.read_u32::<BigEndian>())
            .collect::<std::io::Result<Vec<_>>>()?;

        let mut strings = Vec::with_capacity(string_count);
        for offset in &offsets {
            let offset = *offset as usize;
            let rest = span(packed, offset, packed.len().saturating_sub(offset))?;
            let string = read_null_terminated_utf16(&mut Cursor::new(rest))?;
            trace!("string at {offset:#X}: {}", string.display());
            strings.push(string);
        }

        let result = Self { offsets, strings };
        if result.packed()? != packed {
            return Err(Error::MalformedInput(
                "string offsets do not match the stored strings".into(),
            ));
        }
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// The strings in index order
    pub fn strings(&self) -> &[U16String] {
        &self.strings
    }

    pub fn get(&self, index: usize) -> Result<&U16Str> {
        self.strings
            .get(index)
            .map(U16String::as_ustr)
            .ok_or(Error::NotFound(NotFoundError::Index(index)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &U16Str> {
        self.strings.iter().map(U16String::as_ustr)
    }

    /// Return a copy of this table with the string at `index` replaced.
    ///
    /// Strings stored after the replaced one move by the change in its encoded length; the
    /// replaced string keeps its offset.
    ///
    /// "After" means a greater offset, not a greater index. The two coincide when offsets ascend
    /// with the index, as in every table built by [`StringTable::from_strings`]. For a table read
    /// with permuted offsets, shifting by index would leave strings overlapping once written.
    pub fn with_string_replaced(&self, index: usize, string: impl Into<U16String>) -> Result<Self> {
        let string = string.into();
        if string.as_slice().contains(&0) {
            return Err(echoes_common::error::Error::InteriorNull.into());
        }

        let old = self.get(index)?;
        let size_diff =
            null_terminated_utf16_len(&string) as i64 - null_terminated_utf16_len(old) as i64;
        let replaced_offset = self.offsets[index];

        let offsets = self
            .offsets
            .iter()
            .map(|offset| {
                if *offset <= replaced_offset {
                    return Ok(*offset);
                }
                u32::try_from(*offset as i64 + size_diff)
                    .map_err(|_| Error::SizeOverflow("string offset"))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut strings = self.strings.clone();
        strings[index] = string;

        Ok(Self { offsets, strings })
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        for offset in &self.offsets {
            writer.write_u32::<BigEndian>(*offset)?;
        }

        let mut ordered = self.offsets.iter().zip(&self.strings).collect::<Vec<_>>();
        ordered.sort_by_key(|(offset, _)| **offset);
        for (_, string) in ordered {
            write_null_terminated_utf16(writer, string)?;
        }
        Ok(())
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        self.write_packed(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Size of the table once packed, measured by packing it
    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}

impl TryFrom<Vec<String>> for StringTable {
    type Error = Error;

    fn try_from(value: Vec<String>) -> Result<Self> {
        Self::from_strings(value.iter().map(|s| U16String::from_str(s)))
    }
}

impl From<StringTable> for Vec<String> {
    fn from(value: StringTable) -> Self {
        value.strings.iter().map(|s| s.to_string_lossy()).collect()
    }
}
