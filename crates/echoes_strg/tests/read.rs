use echoes_common::FourCC;
use echoes_strg::error::Result;
use echoes_strg::{NameTable, Strg, StringTable};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;
use widestring::{u16str, U16String};

fn table(strings: [&str; 3]) -> Result<StringTable> {
    StringTable::from_strings(strings.map(U16String::from_str))
}

fn strg() -> Result<Strg> {
    Strg::new(
        [
            (FourCC::from(b"ENGL"), table(["Power Beam", "Dark Beam", "Light Beam"])?),
            (FourCC::from(b"FREN"), table(["Rayon", "Rayon Noir", "Rayon Blanc"])?),
        ],
        NameTable::new([
            ("PowerBeam".to_string(), 0),
            ("DarkBeam".to_string(), 1),
            ("LightBeam".to_string(), 2),
        ])?,
    )
}

#[traced_test]
#[test]
fn replace_string_shifts_successors() -> Result<()> {
    let original = Strg::from_packed(&strg()?.packed()?)?;
    let engl = original.get_string_table_by_language_id(b"ENGL")?;

    let old = engl.get(1)?.to_ustring();
    let new = U16String::from_str("Dark Beam Upgraded");
    let replaced = original.with_string_replaced(b"ENGL", 1, new.clone())?;
    let new_engl = replaced.get_string_table_by_language_id(b"ENGL")?;

    // Offsets up to the replaced index are untouched, later ones move by the change in length
    assert_eq!(&new_engl.offsets()[..2], &engl.offsets()[..2]);
    assert_eq!(
        new_engl.offsets()[2] as usize,
        engl.offsets()[2] as usize + 2 * (new.len() - old.len())
    );

    // Consecutive strings stay back to back
    for k in 1..3 {
        let previous = new_engl.get(k - 1)?.len();
        assert_eq!(
            new_engl.offsets()[k] as usize,
            new_engl.offsets()[k - 1] as usize + 2 * (previous + 1)
        );
    }

    assert_eq!(new_engl.get(0)?, engl.get(0)?);
    assert_eq!(new_engl.get(1)?, new.as_ustr());
    assert_eq!(new_engl.get(2)?, u16str!("Light Beam"));

    // The other language is untouched but moved
    let fren_before = original.language_tables()[1];
    let fren_after = replaced.language_tables()[1];
    assert_eq!(fren_after.strings_size, fren_before.strings_size);
    assert_eq!(
        fren_after.strings_offset as usize,
        fren_before.strings_offset as usize + 2 * (new.len() - old.len())
    );
    assert_eq!(
        replaced.string_by_name(b"FREN", "DarkBeam")?,
        u16str!("Rayon Noir")
    );

    let reread = Strg::from_packed(&replaced.packed()?)?;
    assert_eq!(reread, replaced);
    assert_eq!(reread.string_by_name(b"ENGL", "DarkBeam")?, new.as_ustr());

    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn serialize_strings() -> Result<()> {
    let json = serde_json::to_value(strg()?).map_err(std::io::Error::other)?;

    assert_eq!(
        json,
        serde_json::json!({
            "ENGL": ["Power Beam", "Dark Beam", "Light Beam"],
            "FREN": ["Rayon", "Rayon Noir", "Rayon Blanc"],
        })
    );

    let table: StringTable =
        serde_json::from_value(json["FREN"].clone()).map_err(std::io::Error::other)?;
    assert_eq!(table, strg()?.get_string_table(1)?.clone());

    Ok(())
}
