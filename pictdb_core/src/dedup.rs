//! Content-based deduplication, run once per `insert` after the new slot has been
//! tentatively populated.

use crate::error::{Error, Result};
use crate::hash::SHA_LEN;
use log::debug;
use std::collections::HashMap;

/// What the dedup pass decided for the freshly-populated slot.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No existing slot shares this content; the original payload still needs writing.
    WritePayload,
    /// Slot `share_from` already holds this content; adopt its offsets/sizes.
    Share { share_from: u32 },
}

/// Looks up `new_pict_id` (defensive duplicate check) and `new_sha` (dedup match)
/// against the catalog's `id -> slot` and `sha -> slot` indexes rather than scanning
/// the metadata table, since both are already maintained on every insert/delete.
/// `sha_index` always points at the lowest slot index holding a given digest, so a hit
/// already satisfies the "lowest index wins on tie" rule.
///
/// The bounds guard rejects `new_index` when it is out of range for `max_files` — this
/// implementation rejects on the upper-bound check alone (slot indices are unsigned, so
/// there is no lower-bound case), matching the stricter of the two readings the source's
/// ambiguous `&&` admits.
pub fn scan(
    id_index: &HashMap<String, u32>,
    sha_index: &HashMap<[u8; SHA_LEN], u32>,
    new_index: u32,
    new_pict_id: &str,
    new_sha: &[u8; SHA_LEN],
    max_files: u32,
) -> Result<Outcome> {
    if new_index >= max_files {
        return Err(Error::InvalidArgument);
    }

    if let Some(&j) = id_index.get(new_pict_id) {
        if j != new_index {
            // Should not happen: insert() already rejected duplicate ids before
            // populating the new slot. Defensive per the original design.
            return Err(Error::DuplicateId);
        }
    }

    if let Some(&j) = sha_index.get(new_sha) {
        if j != new_index {
            debug!("dedup match: slot {new_index} shares content with slot {j}");
            return Ok(Outcome::Share { share_from: j });
        }
    }

    Ok(Outcome::WritePayload)
}
