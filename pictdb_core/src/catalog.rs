//! Catalog operations: create, open, close, insert, read, delete, list. Sequences the
//! lower-level file I/O, dedup, and lazy-resize modules and enforces the invariants in
//! §3 of the specification.

use crate::dedup::{self, Outcome};
use crate::error::{Error, Result};
use crate::hash::{self, SHA_LEN};
use crate::header::{Header, MAX_MAX_FILES};
use crate::layout;
use crate::metadata::{Metadata, Resolution, Validity, PICT_ID_MAX_LEN};
use crate::resize;
use crate::{codec, list};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// How a database is opened: exclusively read-only, or read-write for mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

/// An open handle onto one pictDB file: the file descriptor, the in-memory header, the
/// full metadata table, and the auxiliary lookup indexes described in §3.
pub struct PictDb {
    path: PathBuf,
    file: Option<File>,
    header: Header,
    table: Vec<Metadata>,
    id_index: HashMap<String, u32>,
    /// Content-hash -> lowest-index valid slot with that digest. Only ever read for
    /// dedup lookups; authoritative content always lives in `table`.
    sha_index: HashMap<[u8; SHA_LEN], u32>,
    mode: OpenMode,
}

fn validate_pict_id(pict_id: &str) -> Result<()> {
    if pict_id.is_empty() || pict_id.len() > PICT_ID_MAX_LEN {
        return Err(Error::InvalidPictId);
    }
    Ok(())
}

/// Projects `Option<File>` to `&mut File`, as a free function rather than a method on
/// `PictDb` so call sites can still borrow other fields of `self` in the same
/// expression (a method taking `&mut self` would borrow the whole struct).
fn require_file(file: &mut Option<File>) -> Result<&mut File> {
    file.as_mut().ok_or(Error::InvalidCommand)
}

fn rebuild_indexes(table: &[Metadata]) -> (HashMap<String, u32>, HashMap<[u8; SHA_LEN], u32>) {
    let mut id_index = HashMap::new();
    let mut sha_index: HashMap<[u8; SHA_LEN], u32> = HashMap::new();
    for (i, slot) in table.iter().enumerate() {
        if !slot.is_valid() {
            continue;
        }
        let i = i as u32;
        id_index.insert(slot.pict_id.clone(), i);
        sha_index.entry(slot.sha).or_insert(i);
    }
    (id_index, sha_index)
}

impl PictDb {
    /// Creates a new database at `path`, overwriting anything already there.
    pub fn create(
        path: impl AsRef<Path>,
        max_files: u32,
        thumb_res: (u16, u16),
        small_res: (u16, u16),
    ) -> Result<Self> {
        if max_files == 0 || max_files > MAX_MAX_FILES {
            return Err(Error::MaxFilesOutOfRange);
        }
        if thumb_res.0 == 0 || thumb_res.1 == 0 || small_res.0 == 0 || small_res.1 == 0 {
            return Err(Error::ResolutionsOutOfRange);
        }

        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        let header = Header::new(max_files, thumb_res, small_res);
        layout::write_header(&mut file, &header)?;
        layout::write_empty_table(&mut file, max_files)?;

        let table: Vec<Metadata> = (0..max_files).map(|_| Metadata::empty()).collect();
        info!(
            "created database {} (max_files={max_files}, thumb={thumb_res:?}, small={small_res:?})",
            path.display()
        );

        Ok(PictDb {
            path,
            file: Some(file),
            header,
            table,
            id_index: HashMap::new(),
            sha_index: HashMap::new(),
            mode: OpenMode::ReadWrite,
        })
    }

    /// Opens an existing database, reading the header and the full metadata table and
    /// rebuilding the in-memory auxiliary indexes.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::ReadWrite)
            .open(&path)?;

        let header = layout::read_header(&mut file)?;
        if header.max_files > MAX_MAX_FILES {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "max_files exceeds hard ceiling",
            )));
        }

        let mut table = Vec::with_capacity(header.max_files as usize);
        for i in 0..header.max_files {
            table.push(layout::read_slot(&mut file, i)?);
        }
        let (id_index, sha_index) = rebuild_indexes(&table);

        debug!(
            "opened database {} (version={}, num_files={}/{})",
            path.display(),
            header.db_version,
            header.num_files,
            header.max_files
        );

        Ok(PictDb {
            path,
            file: Some(file),
            header,
            table,
            id_index,
            sha_index,
            mode,
        })
    }

    /// Releases the file descriptor and metadata table. Idempotent.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            info!(
                "closed database {} (version={}, num_files={})",
                self.path.display(),
                self.header.db_version,
                self.header.num_files
            );
        }
        self.table.clear();
        self.id_index.clear();
        self.sha_index.clear();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn num_files(&self) -> u32 {
        self.header.num_files
    }

    pub fn max_files(&self) -> u32 {
        self.header.max_files
    }

    fn require_writable(&self) -> Result<()> {
        if self.mode != OpenMode::ReadWrite {
            return Err(Error::InvalidCommand);
        }
        Ok(())
    }

    fn first_empty_slot(&self) -> Option<u32> {
        self.table
            .iter()
            .position(|s| !s.is_valid())
            .map(|i| i as u32)
    }

    /// Inserts `img_bytes` under `pict_id`. See §4.5 for the full algorithm.
    pub fn insert(&mut self, img_bytes: &[u8], pict_id: &str) -> Result<()> {
        self.require_writable()?;
        validate_pict_id(pict_id)?;

        if self.header.num_files >= self.header.max_files {
            return Err(Error::FullDatabase);
        }
        if self.id_index.contains_key(pict_id) {
            return Err(Error::DuplicateId);
        }

        let index = self.first_empty_slot().ok_or(Error::FullDatabase)?;
        let sha = hash::sha256(img_bytes);

        let mut slot = Metadata::empty();
        slot.pict_id = pict_id.to_string();
        slot.sha = sha;
        slot.is_valid = Validity::NonEmpty;

        let outcome = dedup::scan(
            &self.id_index,
            &self.sha_index,
            index,
            pict_id,
            &sha,
            self.header.max_files,
        )?;
        match &outcome {
            Outcome::Share { share_from } => {
                let source = &self.table[*share_from as usize];
                slot.res_orig = source.res_orig;
                for res in Resolution::ALL {
                    slot.set(res, source.offset_of(res), source.size_of(res));
                }
            }
            Outcome::WritePayload => {
                let (w, h) = codec::probe(img_bytes)?;
                slot.res_orig = (w, h);
                let file = require_file(&mut self.file)?;
                let offset = layout::append_payload(file, img_bytes)?;
                slot.set(Resolution::Orig, offset, img_bytes.len() as u32);
            }
        }

        self.header.num_files += 1;
        self.header.bump_version();

        let file = require_file(&mut self.file)?;
        layout::write_header(file, &self.header)?;
        layout::write_slot(file, index, &slot)?;

        self.id_index.insert(pict_id.to_string(), index);
        self.sha_index.entry(sha).or_insert(index);
        self.table[index as usize] = slot;

        info!(
            "inserted '{pict_id}' into slot {index} ({:?})",
            outcome
        );
        Ok(())
    }

    /// Returns the bytes for `pict_id` at resolution `res`, materialising the
    /// derivative first if necessary.
    pub fn read(&mut self, pict_id: &str, res: Resolution) -> Result<Vec<u8>> {
        let index = *self.id_index.get(pict_id).ok_or(Error::FileNotFound)?;

        if res != Resolution::Orig && !self.table[index as usize].is_materialised(res) {
            let file = require_file(&mut self.file)?;
            let mut slot = self.table[index as usize].clone();
            resize::ensure_materialised(file, &mut self.header, &mut slot, index, res)?;
            self.table[index as usize] = slot;
        }

        let slot = &self.table[index as usize];
        let (offset, size) = (slot.offset_of(res), slot.size_of(res));
        let file = require_file(&mut self.file)?;
        layout::read_payload(file, offset, size)
    }

    /// Tombstones the slot holding `pict_id`. Payload bytes are left orphaned until GC.
    pub fn delete(&mut self, pict_id: &str) -> Result<()> {
        self.require_writable()?;
        if self.header.num_files == 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "database is empty",
            )));
        }
        let index = *self.id_index.get(pict_id).ok_or(Error::FileNotFound)?;

        let deleted_sha = self.table[index as usize].sha;
        self.table[index as usize] = Metadata::empty();

        let file = require_file(&mut self.file)?;
        layout::write_slot(file, index, &self.table[index as usize])?;

        self.header.num_files -= 1;
        self.header.bump_version();
        let file = require_file(&mut self.file)?;
        layout::write_header(file, &self.header)?;

        self.id_index.remove(pict_id);
        // Re-point (or drop) the sha index entry for the deleted slot's digest: another
        // valid slot sharing that digest via dedup must remain discoverable.
        if self.sha_index.get(&deleted_sha) == Some(&index) {
            self.sha_index.remove(&deleted_sha);
            if let Some(next) = self
                .table
                .iter()
                .enumerate()
                .find(|(_, s)| s.is_valid() && s.sha == deleted_sha)
                .map(|(i, _)| i as u32)
            {
                self.sha_index.insert(deleted_sha, next);
            }
        }

        warn!("deleted '{pict_id}' (slot {index} tombstoned, payload orphaned until gc)");
        Ok(())
    }

    /// Human-readable listing: header fields followed by every valid slot.
    pub fn list_human(&self) -> String {
        list::human(&self.header, &self.table)
    }

    /// Machine-readable listing: `{ "Pictures": [id, id, ...] }`.
    pub fn list_json(&self) -> Result<String> {
        list::json(&self.table)
    }

    /// Looks up the slot index currently holding `pict_id`, if any. Used by the
    /// garbage collector to locate a just-inserted entry before adopting its
    /// derivatives.
    pub fn slot_index_for(&self, pict_id: &str) -> Option<u32> {
        self.id_index.get(pict_id).copied()
    }

    /// Iterates valid slots in index order, yielding `(index, &Metadata)`. Used by the
    /// garbage collector.
    pub fn valid_slots(&self) -> impl Iterator<Item = (u32, &Metadata)> {
        self.table
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_valid())
            .map(|(i, s)| (i as u32, s))
    }

    /// Reads the raw payload bytes for `res` at an already-known slot index, without
    /// going through `read`'s lazy-materialise path. Used by the garbage collector to
    /// copy derivatives byte-for-byte from the source file.
    pub fn read_raw(&mut self, index: u32, res: Resolution) -> Result<Vec<u8>> {
        let slot = &self.table[index as usize];
        let (offset, size) = (slot.offset_of(res), slot.size_of(res));
        let file = require_file(&mut self.file)?;
        layout::read_payload(file, offset, size)
    }

    /// Injects an already-encoded derivative directly into `slot_index`'s metadata and
    /// appends its bytes, without re-deriving via the codec. Used by the garbage
    /// collector to preserve byte identity when copying derivatives (§9).
    pub fn adopt_raw_derivative(&mut self, slot_index: u32, res: Resolution, bytes: &[u8]) -> Result<()> {
        self.require_writable()?;
        let file = require_file(&mut self.file)?;
        let offset = layout::append_payload(file, bytes)?;
        self.table[slot_index as usize].set(res, offset, bytes.len() as u32);
        self.header.bump_version();
        let file = require_file(&mut self.file)?;
        layout::write_slot(file, slot_index, &self.table[slot_index as usize])?;
        layout::write_header(file, &self.header)?;
        Ok(())
    }
}

impl Drop for PictDb {
    fn drop(&mut self) {
        self.close();
    }
}
