//! The STRG container: language tables, a name table and one string table per language.

use std::collections::HashMap;
use std::io::{Cursor, Seek, Write};

use binrw::{BinRead, BinWrite};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use echoes_common::reader::span;
use echoes_common::FourCC;
use tracing::{debug, instrument};
use widestring::{U16Str, U16String};

use crate::error::{Error, NotFoundError, Result};
use crate::name_table::NameTable;
use crate::string_table::StringTable;
use crate::types::LanguageTable;

/// A decoded STRG asset.
///
/// Each language table locates its string table relative to the end of the name table. String
/// tables are stored back to back in language order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strg {
    version: u32,
    string_count: usize,
    language_tables: Vec<LanguageTable>,
    name_table: NameTable,
    string_tables: Vec<StringTable>,
    language_index: HashMap<FourCC, usize>,
}

impl Strg {
    pub const ASSET_TYPE: FourCC = FourCC::new(*b"STRG");
    pub const MAGIC: u32 = 0x8765_4321;
    pub const VERSION: u32 = 1;

    /// Build an asset from one string table per language, laying the tables out in the given order
    pub fn new(
        languages: impl IntoIterator<Item = (FourCC, StringTable)>,
        name_table: NameTable,
    ) -> Result<Self> {
        let (language_ids, string_tables): (Vec<_>, Vec<_>) = languages.into_iter().unzip();
        let string_count = string_tables.first().map_or(0, StringTable::len);

        let mut language_tables = Vec::with_capacity(language_ids.len());
        let mut strings_offset = 0u32;
        for (language_id, table) in language_ids.into_iter().zip(&string_tables) {
            if table.len() != string_count {
                return Err(Error::StringCountMismatch {
                    expected: string_count,
                    found: table.len(),
                });
            }

            let strings_size = u32::try_from(table.packed_size()?)
                .map_err(|_| Error::SizeOverflow("string table size"))?;
            language_tables.push(LanguageTable {
                language_id,
                strings_offset,
                strings_size,
            });
            strings_offset = strings_offset
                .checked_add(strings_size)
                .ok_or(Error::SizeOverflow("string table offset"))?;
        }

        Ok(Self::from_parts(
            Self::VERSION,
            string_count,
            language_tables,
            name_table,
            string_tables,
        ))
    }

    fn from_parts(
        version: u32,
        string_count: usize,
        language_tables: Vec<LanguageTable>,
        name_table: NameTable,
        string_tables: Vec<StringTable>,
    ) -> Self {
        let language_index = language_tables
            .iter()
            .enumerate()
            .map(|(index, table)| (table.language_id, index))
            .collect();

        Self {
            version,
            string_count,
            language_tables,
            name_table,
            string_tables,
            language_index,
        }
    }

    #[instrument(skip_all, err)]
    pub fn from_packed(packed: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(packed);

        let magic = reader.read_u32::<BigEndian>()?;
        if magic != Self::MAGIC {
            return Err(Error::MalformedInput(format!(
                "expected STRG magic {:#010X}, found {magic:#010X}",
                Self::MAGIC
            )));
        }
        let version = reader.read_u32::<BigEndian>()?;
        let language_count = reader.read_u32::<BigEndian>()?;
        let string_count = reader.read_u32::<BigEndian>()? as usize;
        debug!("STRG version {version}: {language_count} languages, {string_count} strings");

        let language_tables = (0..language_count)
            .map(|_| LanguageTable::read(&mut reader))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let name_table = NameTable::read(&mut reader)?;
        let strings_start = reader.position() as usize;

        let mut expected_offset = 0usize;
        let mut string_tables = Vec::with_capacity(language_tables.len());
        for language in &language_tables {
            if language.strings_offset as usize != expected_offset {
                return Err(Error::MalformedInput(format!(
                    "strings of {} start at {:#X}, expected {expected_offset:#X}",
                    language.language_id, language.strings_offset
                )));
            }

            let data = span(
                packed,
                strings_start + expected_offset,
                language.strings_size as usize,
            )?;
            debug!(
                "{} strings at {:#X} ({} bytes)",
                language.language_id, language.strings_offset, language.strings_size
            );
            string_tables.push(StringTable::from_packed(data, string_count)?);
            expected_offset += language.strings_size as usize;
        }

        let end = strings_start + expected_offset;
        if end != packed.len() {
            return Err(Error::MalformedInput(format!(
                "{} unexpected bytes after the last string table",
                packed.len().saturating_sub(end)
            )));
        }

        Ok(Self::from_parts(
            version,
            string_count,
            language_tables,
            name_table,
            string_tables,
        ))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn language_count(&self) -> usize {
        self.language_tables.len()
    }

    /// Number of strings in every language
    pub fn string_count(&self) -> usize {
        self.string_count
    }

    pub fn language_tables(&self) -> &[LanguageTable] {
        &self.language_tables
    }

    pub fn name_table(&self) -> &NameTable {
        &self.name_table
    }

    pub fn string_tables(&self) -> &[StringTable] {
        &self.string_tables
    }

    pub fn get_string_table(&self, index: usize) -> Result<&StringTable> {
        self.string_tables
            .get(index)
            .ok_or(Error::NotFound(NotFoundError::Index(index)))
    }

    fn language_index(&self, language_id: FourCC) -> Result<usize> {
        self.language_index
            .get(&language_id)
            .copied()
            .ok_or(Error::NotFound(NotFoundError::Language(language_id)))
    }

    pub fn get_string_table_by_language_id(&self, language_id: impl Into<FourCC>) -> Result<&StringTable> {
        self.get_string_table(self.language_index(language_id.into())?)
    }

    /// Look up a string of `language_id` through the name table
    pub fn string_by_name(&self, language_id: impl Into<FourCC>, name: &str) -> Result<&U16Str> {
        let index = self.name_table.string_index_for_name(name)?;
        self.get_string_table_by_language_id(language_id)?
            .get(index as usize)
    }

    /// Return a copy of this asset with the string table at `index` replaced.
    ///
    /// The owning language table takes the new table's size and every later language table moves
    /// by the change in size.
    pub fn with_string_table_replaced(&self, index: usize, string_table: StringTable) -> Result<Self> {
        if string_table.len() != self.string_count {
            return Err(Error::StringCountMismatch {
                expected: self.string_count,
                found: string_table.len(),
            });
        }

        let old = self
            .language_tables
            .get(index)
            .ok_or(Error::NotFound(NotFoundError::Index(index)))?;
        let strings_size = u32::try_from(string_table.packed_size()?)
            .map_err(|_| Error::SizeOverflow("string table size"))?;
        let size_diff = strings_size as i64 - old.strings_size as i64;

        let mut language_tables = self.language_tables.clone();
        language_tables[index].strings_size = strings_size;
        for language in &mut language_tables[index + 1..] {
            language.strings_offset = u32::try_from(language.strings_offset as i64 + size_diff)
                .map_err(|_| Error::SizeOverflow("string table offset"))?;
        }

        let mut string_tables = self.string_tables.clone();
        string_tables[index] = string_table;

        Ok(Self::from_parts(
            self.version,
            self.string_count,
            language_tables,
            self.name_table.clone(),
            string_tables,
        ))
    }

    pub fn with_string_table_replaced_by_language_id(
        &self,
        language_id: impl Into<FourCC>,
        string_table: StringTable,
    ) -> Result<Self> {
        self.with_string_table_replaced(self.language_index(language_id.into())?, string_table)
    }

    /// Return a copy of this asset with one string of one language replaced
    pub fn with_string_replaced(
        &self,
        language_id: impl Into<FourCC>,
        index: usize,
        string: impl Into<U16String>,
    ) -> Result<Self> {
        let language = self.language_index(language_id.into())?;
        let table = self.string_tables[language].with_string_replaced(index, string)?;
        self.with_string_table_replaced(language, table)
    }

    pub fn write_packed<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(Self::MAGIC)?;
        writer.write_u32::<BigEndian>(self.version)?;
        writer.write_u32::<BigEndian>(self.language_tables.len() as u32)?;
        writer.write_u32::<BigEndian>(
            u32::try_from(self.string_count).map_err(|_| Error::SizeOverflow("string count"))?,
        )?;
        for language in &self.language_tables {
            language.write(writer)?;
        }
        self.name_table.write_packed(writer)?;
        for table in &self.string_tables {
            table.write_packed(writer)?;
        }
        Ok(())
    }

    pub fn packed(&self) -> Result<Vec<u8>> {
        let mut writer = Cursor::new(Vec::new());
        self.write_packed(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Size of the asset once packed, measured by packing it
    pub fn packed_size(&self) -> Result<usize> {
        Ok(self.packed()?.len())
    }
}

#[cfg(test)]
mod test {
    use echoes_common::FourCC;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;
    use widestring::{u16str, U16String};

    use crate::error::{Error, NotFoundError, Result};
    use crate::name_table::NameTable;
    use crate::strg::Strg;
    use crate::string_table::StringTable;

    #[rustfmt::skip]
    fn strg() -> Vec<u8> {
        vec![
            0x87, 0x65, 0x43, 0x21, // Magic
            0x00, 0x00, 0x00, 0x01, // Version
            0x00, 0x00, 0x00, 0x02, // Languages
            0x00, 0x00, 0x00, 0x01, // Strings
            b'E', b'N', b'G', b'L', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A,
            b'G', b'E', b'R', b'M', 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x08,
            // Name table
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x0B,
            0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00,
            b'N', b'a', 0x00,
            // ENGL
            0x00, 0x00, 0x00, 0x04,
            0x00, b'H', 0x00, b'i', 0x00, 0x00,
            // GERM
            0x00, 0x00, 0x00, 0x04,
            0x00, b'J', 0x00, 0x00,
        ]
    }

    #[traced_test]
    #[test]
    fn read_strg() -> Result<()> {
        let input = strg();
        let result = Strg::from_packed(&input)?;

        assert_eq!(result.version(), 1);
        assert_eq!(result.language_count(), 2);
        assert_eq!(result.string_count(), 1);
        assert_eq!(result.string_by_name(b"ENGL", "Na")?, u16str!("Hi"));
        assert_eq!(result.string_by_name(b"GERM", "Na")?, u16str!("J"));
        assert!(matches!(
            result.get_string_table_by_language_id(b"FREN"),
            Err(Error::NotFound(NotFoundError::Language(_)))
        ));

        assert_eq!(result.packed()?, input);

        Ok(())
    }

    #[test]
    fn bad_magic_is_malformed() {
        let mut input = strg();
        input[0] = 0x00;

        assert!(matches!(
            Strg::from_packed(&input),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn gap_between_string_tables_is_malformed() {
        let mut input = strg();
        input[35] = 0x0C;

        assert!(matches!(
            Strg::from_packed(&input),
            Err(Error::MalformedInput(_))
        ));
    }

    #[traced_test]
    #[test]
    fn replace_table_moves_later_languages() -> Result<()> {
        let result = Strg::from_packed(&strg())?;
        let replaced = result.with_string_replaced(b"ENGL", 0, U16String::from_str("Hello"))?;

        let engl = replaced.language_tables()[0];
        let germ = replaced.language_tables()[1];
        assert_eq!(engl.strings_offset, 0);
        assert_eq!(engl.strings_size, 16);
        assert_eq!(germ.strings_offset, 16);
        assert_eq!(germ.strings_size, 8);

        assert_eq!(Strg::from_packed(&replaced.packed()?)?, replaced);

        Ok(())
    }

    #[test]
    fn replacement_must_keep_string_count() -> Result<()> {
        let result = Strg::from_packed(&strg())?;
        let table = StringTable::from_strings(["A", "B"].map(U16String::from_str))?;

        assert!(matches!(
            result.with_string_table_replaced(0, table),
            Err(Error::StringCountMismatch {
                expected: 1,
                found: 2
            })
        ));

        Ok(())
    }

    #[test]
    fn new_lays_out_languages() -> Result<()> {
        let built = Strg::new(
            [
                (FourCC::from(b"ENGL"), StringTable::from_strings(["Hi"].map(U16String::from_str))?),
                (FourCC::from(b"GERM"), StringTable::from_strings(["J"].map(U16String::from_str))?),
            ],
            NameTable::new([("Na".to_string(), 0)])?,
        )?;

        assert_eq!(built, Strg::from_packed(&strg())?);

        Ok(())
    }
}
