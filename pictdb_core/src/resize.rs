//! Lazy derivative production: the first `read` of a SMALL or THUMB resolution that
//! has no materialised payload generates it, appends it, and records it in the slot.

use crate::codec;
use crate::error::Result;
use crate::header::Header;
use crate::layout;
use crate::metadata::{Metadata, Resolution};
use log::info;
use std::fs::File;

/// Ensures `slot` has a materialised payload for `res`, generating it from the ORIG
/// payload if necessary. No-op for `Resolution::Orig` (always present) and for an
/// already-materialised derivative.
///
/// On generation, bumps `header.db_version` (the standardised "bump on any mutation"
/// rule, see the design notes) and flushes both the slot and the header.
pub fn ensure_materialised(
    file: &mut File,
    header: &mut Header,
    slot: &mut Metadata,
    slot_index: u32,
    res: Resolution,
) -> Result<()> {
    if res == Resolution::Orig || slot.is_materialised(res) {
        return Ok(());
    }

    let orig = layout::read_payload(file, slot.offset_of(Resolution::Orig), slot.size_of(Resolution::Orig))?;
    let (max_w, max_h) = header.bounds_for(res);
    let resized = codec::resize_fit(&orig, max_w, max_h)?;

    let offset = layout::append_payload(file, &resized)?;
    slot.set(res, offset, resized.len() as u32);

    header.bump_version();
    layout::write_slot(file, slot_index, slot)?;
    layout::write_header(file, header)?;

    info!(
        "materialised {} derivative for slot {slot_index} ({} bytes at offset {offset})",
        res.as_str(),
        resized.len()
    );
    Ok(())
}
