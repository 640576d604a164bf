//! Subcommand dispatch: a tagged-variant command enum, one validated argument record
//! per variant, per the design note preferring this over raw string arrays.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pictdbm",
    author,
    version,
    about = "pictDB: an embedded, single-file JPEG image database"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every entry in a database.
    List(ListArgs),
    /// Create a new, empty database.
    Create(CreateArgs),
    /// Read one picture at a given resolution, writing it to `<id>.jpg`.
    Read(ReadArgs),
    /// Insert a JPEG file under a new id.
    Insert(InsertArgs),
    /// Delete an entry by id.
    Delete(DeleteArgs),
    /// Compact a database, reclaiming space orphaned by deletions.
    Gc(GcArgs),
    /// Serve a database over HTTP.
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Path to the database file.
    pub db: PathBuf,
    /// Emit `{ "Pictures": [...] }` instead of the human-readable listing.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Path to the database file to create.
    pub db: PathBuf,
    /// Capacity: how many pictures the database can hold. Must be in (0, 100000].
    #[arg(long = "max-files", default_value_t = 10)]
    pub max_files: u32,
    /// Thumbnail bounding box, each component in (0, 128].
    #[arg(long = "thumb-res", num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [64, 64])]
    pub thumb_res: Vec<u16>,
    /// Small-derivative bounding box, each component in (0, 512].
    #[arg(long = "small-res", num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [256, 256])]
    pub small_res: Vec<u16>,
}

#[derive(clap::Args, Debug)]
pub struct ReadArgs {
    pub db: PathBuf,
    pub id: String,
    /// Which resolution to read: orig, small, or thumb.
    #[arg(default_value = "orig")]
    pub resolution: String,
}

#[derive(clap::Args, Debug)]
pub struct InsertArgs {
    pub db: PathBuf,
    pub id: String,
    /// Path to the JPEG file to insert.
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    pub db: PathBuf,
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct GcArgs {
    pub db: PathBuf,
    /// Scratch path used while compacting; must differ from `db`.
    pub tmp: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    pub db: PathBuf,
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}
