//! Handlers for every synchronous subcommand. `serve` is dispatched separately from
//! `main` since it needs an async runtime; everything here runs to completion and
//! returns control immediately.

use crate::cli::{CreateArgs, DeleteArgs, GcArgs, InsertArgs, ListArgs, ReadArgs};
use pictdb_core::catalog::OpenMode;
use pictdb_core::error::{Error, Result};
use pictdb_core::metadata::Resolution;
use pictdb_core::PictDb;
use std::str::FromStr;

/// Bounding-box ceilings enforced on top of the catalog's own nonzero check, per the
/// resolution limits a thumbnail and a small derivative are expected to stay under.
const THUMB_MAX: u16 = 128;
const SMALL_MAX: u16 = 512;

fn check_bounds(thumb: (u16, u16), small: (u16, u16)) -> Result<()> {
    let in_range = |v: u16, max: u16| v > 0 && v <= max;
    if !in_range(thumb.0, THUMB_MAX) || !in_range(thumb.1, THUMB_MAX) {
        return Err(Error::ResolutionsOutOfRange);
    }
    if !in_range(small.0, SMALL_MAX) || !in_range(small.1, SMALL_MAX) {
        return Err(Error::ResolutionsOutOfRange);
    }
    Ok(())
}

pub fn list(args: &ListArgs) -> Result<()> {
    let db = PictDb::open(&args.db, OpenMode::ReadOnly)?;
    if args.json {
        println!("{}", db.list_json()?);
    } else {
        print!("{}", db.list_human());
    }
    Ok(())
}

pub fn create(args: &CreateArgs) -> Result<()> {
    let thumb = (args.thumb_res[0], args.thumb_res[1]);
    let small = (args.small_res[0], args.small_res[1]);
    check_bounds(thumb, small)?;

    PictDb::create(&args.db, args.max_files, thumb, small)?;
    println!("new pictDB database {} created", args.db.display());
    Ok(())
}

pub fn read(args: &ReadArgs) -> Result<()> {
    let res = Resolution::from_str(&args.resolution)?;
    let mut db = PictDb::open(&args.db, OpenMode::ReadWrite)?;
    let bytes = db.read(&args.id, res)?;

    let out_path = format!("{}.jpg", args.id);
    std::fs::write(&out_path, &bytes)?;
    println!("wrote {} ({} bytes) to {out_path}", args.id, bytes.len());
    Ok(())
}

pub fn insert(args: &InsertArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)?;
    let mut db = PictDb::open(&args.db, OpenMode::ReadWrite)?;
    db.insert(&bytes, &args.id)?;
    println!("inserted {} into {}", args.id, args.db.display());
    Ok(())
}

pub fn delete(args: &DeleteArgs) -> Result<()> {
    let mut db = PictDb::open(&args.db, OpenMode::ReadWrite)?;
    db.delete(&args.id)?;
    println!("deleted {} from {}", args.id, args.db.display());
    Ok(())
}

pub fn gc(args: &GcArgs) -> Result<()> {
    pictdb_core::gc::collect(&args.db, &args.tmp)?;
    println!("compacted {}", args.db.display());
    Ok(())
}
