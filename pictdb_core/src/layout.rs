//! Byte-exact on-disk layout: header at offset 0, `max_files` metadata slots
//! immediately after, payload bytes appended past the end of the table.
//!
//! Little-endian, fixed-width integers, `\0`-terminated fixed-length strings — see
//! §6.1 of the specification for field widths.

use crate::error::{Error, Result};
use crate::hash::SHA_LEN;
use crate::header::{Header, DB_NAME_FIELD_LEN};
use crate::metadata::{Metadata, Resolution, Validity, PICT_ID_FIELD_LEN};
use log::trace;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

const RESERVED_HEADER_PADDING: usize = 16;
const RESERVED_SLOT_PADDING: usize = 6;

/// `sizeof(header)` in the on-disk format.
pub const HEADER_LEN: usize =
    DB_NAME_FIELD_LEN + 4 + 4 + 4 + (2 * 2 * 2) + RESERVED_HEADER_PADDING;

/// `sizeof(metadata)` in the on-disk format.
pub const METADATA_LEN: usize =
    PICT_ID_FIELD_LEN + SHA_LEN + 4 + 4 + (4 * 3) + (8 * 3) + 2 + RESERVED_SLOT_PADDING;

/// Absolute offset of metadata slot `index`, given `max_files` is not needed here since
/// slots are simply back-to-back after the header.
pub fn slot_offset(index: u32) -> u64 {
    HEADER_LEN as u64 + (index as u64) * (METADATA_LEN as u64)
}

/// First byte past the metadata table — where the payload region begins.
pub fn payload_region_start(max_files: u32) -> u64 {
    slot_offset(max_files)
}

fn write_fixed_str(buf: &mut Vec<u8>, s: &str, field_len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    if bytes.len() >= field_len {
        return Err(Error::InvalidArgument);
    }
    buf.extend_from_slice(bytes);
    buf.resize(buf.len() + (field_len - bytes.len()), 0u8);
    Ok(())
}

fn read_fixed_str(bytes: &[u8]) -> String {
    let nul = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..nul]).into_owned()
}

/// Serializes a `Header` to its fixed-width on-disk representation.
fn encode_header(header: &Header) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    write_fixed_str(&mut buf, &header.db_name, DB_NAME_FIELD_LEN)?;
    buf.extend_from_slice(&header.db_version.to_le_bytes());
    buf.extend_from_slice(&header.num_files.to_le_bytes());
    buf.extend_from_slice(&header.max_files.to_le_bytes());
    let (tw, th) = header.res_resized[Resolution::Thumb.index()];
    let (sw, sh) = header.res_resized[Resolution::Small.index()];
    buf.extend_from_slice(&tw.to_le_bytes());
    buf.extend_from_slice(&th.to_le_bytes());
    buf.extend_from_slice(&sw.to_le_bytes());
    buf.extend_from_slice(&sh.to_le_bytes());
    buf.resize(HEADER_LEN, 0u8);
    Ok(buf)
}

fn decode_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "short header read",
        )));
    }
    let mut pos = 0usize;
    let db_name = read_fixed_str(&bytes[pos..pos + DB_NAME_FIELD_LEN]);
    pos += DB_NAME_FIELD_LEN;
    let db_version = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
    pos += 4;
    let num_files = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
    pos += 4;
    let max_files = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
    pos += 4;
    let tw = u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap());
    pos += 2;
    let th = u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap());
    pos += 2;
    let sw = u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap());
    pos += 2;
    let sh = u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap());

    let mut res_resized = [(0u16, 0u16); 3];
    res_resized[Resolution::Thumb.index()] = (tw, th);
    res_resized[Resolution::Small.index()] = (sw, sh);

    Ok(Header {
        db_name,
        db_version,
        num_files,
        max_files,
        res_resized,
    })
}

fn encode_metadata(slot: &Metadata) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(METADATA_LEN);
    write_fixed_str(&mut buf, &slot.pict_id, PICT_ID_FIELD_LEN)?;
    buf.extend_from_slice(&slot.sha);
    buf.extend_from_slice(&slot.res_orig.0.to_le_bytes());
    buf.extend_from_slice(&slot.res_orig.1.to_le_bytes());
    for s in slot.size {
        buf.extend_from_slice(&s.to_le_bytes());
    }
    for o in slot.offset {
        buf.extend_from_slice(&o.to_le_bytes());
    }
    buf.extend_from_slice(&slot.is_valid.as_u16().to_le_bytes());
    buf.resize(METADATA_LEN, 0u8);
    Ok(buf)
}

fn decode_metadata(bytes: &[u8]) -> Result<Metadata> {
    if bytes.len() < METADATA_LEN {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "short metadata read",
        )));
    }
    let mut pos = 0usize;
    let pict_id = read_fixed_str(&bytes[pos..pos + PICT_ID_FIELD_LEN]);
    pos += PICT_ID_FIELD_LEN;
    let mut sha = [0u8; SHA_LEN];
    sha.copy_from_slice(&bytes[pos..pos + SHA_LEN]);
    pos += SHA_LEN;
    let rw = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
    pos += 4;
    let rh = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
    pos += 4;
    let mut size = [0u32; 3];
    for s in size.iter_mut() {
        *s = u32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
        pos += 4;
    }
    let mut offset = [0u64; 3];
    for o in offset.iter_mut() {
        *o = u64::from_le_bytes(bytes[pos..pos + 8].try_into().unwrap());
        pos += 8;
    }
    let is_valid = Validity::from_u16(u16::from_le_bytes(bytes[pos..pos + 2].try_into().unwrap()));

    Ok(Metadata {
        pict_id,
        sha,
        res_orig: (rw, rh),
        size,
        offset,
        is_valid,
    })
}

/// Writes the header at offset 0 and syncs it to disk.
pub fn write_header(file: &mut File, header: &Header) -> Result<()> {
    let buf = encode_header(header)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&buf)?;
    file.sync_data()?;
    trace!("flushed header ({} bytes at offset 0)", buf.len());
    Ok(())
}

/// Reads the header from offset 0.
pub fn read_header(file: &mut File) -> Result<Header> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = vec![0u8; HEADER_LEN];
    file.read_exact(&mut buf)?;
    decode_header(&buf)
}

/// Writes metadata slot `index` and syncs it to disk.
pub fn write_slot(file: &mut File, index: u32, slot: &Metadata) -> Result<()> {
    let buf = encode_metadata(slot)?;
    let offset = slot_offset(index);
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(&buf)?;
    file.sync_data()?;
    trace!("flushed slot {index} ({} bytes at offset {offset})", buf.len());
    Ok(())
}

/// Reads metadata slot `index`.
pub fn read_slot(file: &mut File, index: u32) -> Result<Metadata> {
    let offset = slot_offset(index);
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; METADATA_LEN];
    file.read_exact(&mut buf)?;
    decode_metadata(&buf)
}

/// Writes the full metadata table (`max_files` consecutive empty slots), used by
/// `create`.
pub fn write_empty_table(file: &mut File, max_files: u32) -> Result<()> {
    let empty = Metadata::empty();
    let buf = encode_metadata(&empty)?;
    file.seek(SeekFrom::Start(HEADER_LEN as u64))?;
    for _ in 0..max_files {
        file.write_all(&buf)?;
    }
    file.sync_data()?;
    Ok(())
}

/// Appends `bytes` at the current end of file and returns the offset it was written at.
pub fn append_payload(file: &mut File, bytes: &[u8]) -> Result<u64> {
    let offset = file.seek(SeekFrom::End(0))?;
    file.write_all(bytes)?;
    file.sync_data()?;
    trace!("appended payload ({} bytes at offset {offset})", bytes.len());
    Ok(offset)
}

/// Reads exactly `size` bytes starting at `offset`.
pub fn read_payload(file: &mut File, offset: u64, size: u32) -> Result<Vec<u8>> {
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; size as usize];
    file.read_exact(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Resolution;

    #[test]
    fn header_round_trips() {
        let header = Header::new(10, (64, 64), (256, 256));
        let buf = encode_header(&header).unwrap();
        assert_eq!(buf.len(), HEADER_LEN);
        let decoded = decode_header(&buf).unwrap();
        assert_eq!(decoded.db_name, header.db_name);
        assert_eq!(decoded.max_files, 10);
        assert_eq!(decoded.bounds_for(Resolution::Thumb), (64, 64));
        assert_eq!(decoded.bounds_for(Resolution::Small), (256, 256));
    }

    #[test]
    fn metadata_round_trips() {
        let mut slot = Metadata::empty();
        slot.pict_id = "pic1".to_string();
        slot.sha = [7u8; SHA_LEN];
        slot.res_orig = (800, 600);
        slot.set(Resolution::Orig, 1234, 5678);
        slot.is_valid = Validity::NonEmpty;

        let buf = encode_metadata(&slot).unwrap();
        assert_eq!(buf.len(), METADATA_LEN);
        let decoded = decode_metadata(&buf).unwrap();
        assert_eq!(decoded.pict_id, "pic1");
        assert_eq!(decoded.sha, [7u8; SHA_LEN]);
        assert_eq!(decoded.res_orig, (800, 600));
        assert_eq!(decoded.offset_of(Resolution::Orig), 1234);
        assert_eq!(decoded.size_of(Resolution::Orig), 5678);
        assert!(decoded.is_valid());
    }

    #[test]
    fn slot_offsets_are_back_to_back() {
        assert_eq!(slot_offset(0), HEADER_LEN as u64);
        assert_eq!(slot_offset(1), HEADER_LEN as u64 + METADATA_LEN as u64);
        assert_eq!(payload_region_start(3), HEADER_LEN as u64 + 3 * METADATA_LEN as u64);
    }
}
