//! Human- and machine-readable catalog listings (§4.10).

use crate::error::Result;
use crate::hash::to_hex;
use crate::header::Header;
use crate::metadata::{Metadata, Resolution};
use serde::Serialize;

#[derive(Serialize)]
struct PictureList {
    #[serde(rename = "Pictures")]
    pictures: Vec<String>,
}

/// Prints header fields, then every valid slot's fields. If the catalog is empty,
/// prints a single "empty database" line instead of an empty slot list.
pub fn human(header: &Header, table: &[Metadata]) -> String {
    let mut out = String::new();
    out.push_str(&format!("DB NAME: {}\n", header.db_name));
    out.push_str(&format!("DB VERSION: {}\n", header.db_version));
    out.push_str(&format!("IMAGE COUNT: {}\n", header.num_files));
    out.push_str(&format!("MAX IMAGES: {}\n", header.max_files));
    out.push_str(&format!(
        "THUMBNAIL: {}x{}\n",
        header.res_resized[Resolution::Thumb.index()].0,
        header.res_resized[Resolution::Thumb.index()].1
    ));
    out.push_str(&format!(
        "SMALL: {}x{}\n",
        header.res_resized[Resolution::Small.index()].0,
        header.res_resized[Resolution::Small.index()].1
    ));

    let valid: Vec<(usize, &Metadata)> = table
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_valid())
        .collect();

    if valid.is_empty() {
        out.push_str("<< empty database >>\n");
        return out;
    }

    for (i, slot) in valid {
        out.push_str(&format!("picture {i}: {}\n", slot.pict_id));
        out.push_str(&format!("\tsha: {}\n", to_hex(&slot.sha)));
        out.push_str(&format!(
            "\tvalidity: {}\n",
            if slot.is_valid() { "NON_EMPTY" } else { "EMPTY" }
        ));
        out.push_str(&format!(
            "\toriginal: {}x{}\n",
            slot.res_orig.0, slot.res_orig.1
        ));
        for res in Resolution::ALL {
            out.push_str(&format!(
                "\t{}: offset={} size={}\n",
                res.as_str(),
                slot.offset_of(res),
                slot.size_of(res)
            ));
        }
    }
    out
}

/// `{ "Pictures": [id, id, ...] }`, in slot order.
pub fn json(table: &[Metadata]) -> Result<String> {
    let pictures = table
        .iter()
        .filter(|s| s.is_valid())
        .map(|s| s.pict_id.clone())
        .collect();
    let list = PictureList { pictures };
    Ok(serde_json::to_string(&list)?)
}

impl From<serde_json::Error> for crate::error::Error {
    fn from(e: serde_json::Error) -> Self {
        crate::error::Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;

    #[test]
    fn empty_database_prints_marker() {
        let header = Header::new(10, (64, 64), (256, 256));
        let table: Vec<Metadata> = (0..10).map(|_| Metadata::empty()).collect();
        let out = human(&header, &table);
        assert!(out.contains("IMAGE COUNT: 0"));
        assert!(out.contains("<< empty database >>"));
    }

    #[test]
    fn json_lists_valid_ids_in_slot_order() {
        let mut table: Vec<Metadata> = (0..3).map(|_| Metadata::empty()).collect();
        table[0].pict_id = "a".into();
        table[0].is_valid = crate::metadata::Validity::NonEmpty;
        table[2].pict_id = "b".into();
        table[2].is_valid = crate::metadata::Validity::NonEmpty;

        let out = json(&table).unwrap();
        assert_eq!(out, r#"{"Pictures":["a","b"]}"#);
    }
}
