//! Optional names for string indices.

use std::io::{Cursor, Seek, Write};

use binrw::{BinRead, BinWrite};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::reader::{expect_consumed, span, take};
use echoes_common::string::{
    pack_null_terminated_ascii, read_null_terminated_ascii, write_null_terminated_ascii,
};

use crate::error::{Error, NotFoundError, Result};
use crate::types::NameEntry;

/// Entries mapping names to string indices, followed by the names themselves.
///
/// The count and size fields of the wire format are derived from the entries when written.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameTable {
    entries: Vec<NameEntry>,
    names: Vec<String>,
}

impl NameTable {
    /// Build a table from `(name, string index)` pairs, storing the names in the given order
    pub fn new(names: impl IntoIterator<Item = (String, u32)>) -> Result<Self> {
        let (names, indices): (Vec<_>, Vec<_>) = names.into_iter().unzip();

        let mut entries = Vec::with_capacity(names.len());
        let mut offset = NameEntry::PACKED_SIZE * names.len();
        for (name, string_index) in names.iter().zip(indices) {
            entries.push(NameEntry {
                offset: u32::try_from(offset).map_err(|_| Error::SizeOverflow("name offset"))?,
                string_index,
            });
            offset += pack_null_terminated_ascii(name)?.len();
        }

        Ok(Self { entries, names })
    }

    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(packed);
        let result = Self::read(&mut reader)?;
        expect_consumed(&reader, "name table")?;
        Ok(result)
    }

    pub(crate) fn read(reader: &mut Cursor<&[u8]>) -> Result<Self> {
        let count = reader.read_u32::<BigEndian>()?;
        let size = reader.read_u32::<BigEndian>()?;
        let body = take(reader, size as usize)?;

        let mut body_reader = Cursor::new(body);
        let entries = (0..count)
            .map(|_| NameEntry::read(&mut body_reader))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let names = entries
            .iter()
            .map(|entry| -> Result<String> {
                let offset = entry.offset as usize;
                let rest = span(body, offset, body.len().saturating_sub(offset))?;
                Ok(read_null_terminated_ascii(&mut Cursor::new(rest))?)
            })
            .collect::<Result<Vec<_>>>()?;

        let result = Self { entries, names };
        if result.body()? != body {
            return Err(Error::MalformedInput(
                "name offsets do not match the stored names".into(),
            ));
        }
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    /// Names in entry order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over `(name, string index)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.names
            .iter()
            .zip(&self.entries)
            .map(|(name, entry)| (name.as_str(), entry.string_index))
    }

    pub fn string_index_for_name(&self, name: &str) -> Result<u32> {
        self.iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, index)| index)
            .ok_or_else(|| Error::NotFound(NotFoundError::Name(name.to_string())))
    }

    /// Entries followed by the names, each name written once in ascending offset order
    fn body(&self) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        for entry in &self.entries {
            entry.write(&mut writer)?;
        }

        let mut ordered = self.entries.iter().zip(&self.names).collect::<Vec<_>>();
        ordered.sort_by_key(|(entry, _)| entry.offset);
        ordered.dedup_by_key(|(entry, _)| entry.offset);
        for (_, name) in ordered {
            write_null_terminated_ascii(&mut writer, name)?;
        }
        Ok(writer.into_inner())
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        let body = self.body()?;
        let size = u32::try_from(body.len()).map_err(|_| Error::SizeOverflow("name table size"))?;

        writer.write_u32::<BigEndian>(self.entries.len() as u32)?;
        writer.write_u32::<BigEndian>(size)?;
        writer.write_all(&body)?;
        Ok(())
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        self.write_packed(&mut writer)?;
        Ok(writer.into_inner())
    }

    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}
