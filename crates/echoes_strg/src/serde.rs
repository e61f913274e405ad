use serde::{ser::SerializeMap, Serialize};

use crate::strg::Strg;

/// Serializes as a map from language ID to that language's strings
impl Serialize for Strg {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.language_count()))?;
        for (language, table) in self.language_tables().iter().zip(self.string_tables()) {
            map.serialize_entry(&language.language_id.to_string(), table)?;
        }
        map.end()
    }
}
