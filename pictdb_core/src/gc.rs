//! Offline compaction: copy every live entry into a fresh file, then atomically swap
//! it in for the source (§4.11).

use crate::catalog::{OpenMode, PictDb};
use crate::error::Result;
use crate::metadata::Resolution;
use log::info;
use std::fs;
use std::path::Path;

/// Compacts the database at `source_path` using `scratch_path` as working space.
/// `scratch_path` must be distinct from `source_path`. On success the source path
/// holds the compacted file and `scratch_path` no longer exists. On failure the
/// scratch file is removed and the source file is left untouched.
pub fn collect(source_path: &Path, scratch_path: &Path) -> Result<()> {
    match run(source_path, scratch_path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(scratch_path);
            Err(e)
        }
    }
}

fn run(source_path: &Path, scratch_path: &Path) -> Result<()> {
    let mut source = PictDb::open(source_path, OpenMode::ReadOnly)?;
    let header = source.header().clone();

    let mut scratch = PictDb::create(
        scratch_path,
        header.max_files,
        header.res_resized[Resolution::Thumb.index()],
        header.res_resized[Resolution::Small.index()],
    )?;

    // Snapshot the entries to copy before mutating `scratch`, since `source` is
    // borrowed immutably by `valid_slots()`.
    struct Entry {
        index: u32,
        pict_id: String,
        has_small: bool,
        has_thumb: bool,
    }
    let entries: Vec<Entry> = source
        .valid_slots()
        .map(|(index, slot)| Entry {
            index,
            pict_id: slot.pict_id.clone(),
            has_small: slot.is_materialised(Resolution::Small),
            has_thumb: slot.is_materialised(Resolution::Thumb),
        })
        .collect();

    for entry in &entries {
        let orig = source.read_raw(entry.index, Resolution::Orig)?;
        scratch.insert(&orig, &entry.pict_id)?;
        let new_index = scratch
            .slot_index_for(&entry.pict_id)
            .expect("just inserted");

        if entry.has_small {
            let bytes = source.read_raw(entry.index, Resolution::Small)?;
            scratch.adopt_raw_derivative(new_index, Resolution::Small, &bytes)?;
        }
        if entry.has_thumb {
            let bytes = source.read_raw(entry.index, Resolution::Thumb)?;
            scratch.adopt_raw_derivative(new_index, Resolution::Thumb, &bytes)?;
        }
    }

    info!(
        "gc: copied {} live entries from {} into {}",
        entries.len(),
        source_path.display(),
        scratch_path.display()
    );

    scratch.close();
    source.close();

    let backup_path = {
        let mut name = source_path.as_os_str().to_os_string();
        name.push(".gc_bak");
        std::path::PathBuf::from(name)
    };
    fs::rename(source_path, &backup_path)?;
    fs::rename(scratch_path, source_path)?;
    fs::remove_file(&backup_path)?;

    info!("gc: swapped compacted file into {}", source_path.display());
    Ok(())
}
