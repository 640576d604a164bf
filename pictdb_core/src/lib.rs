//! Core of pictDB: an embedded, single-file JPEG image database.
//!
//! A database holds a fixed-capacity catalog of JPEG images, each identified by a
//! user-chosen textual key, stored in three resolutions (original, small, thumbnail)
//! with derivatives produced lazily on first read. Identical payloads share on-disk
//! storage; deletions tombstone slots until a garbage-collection pass compacts the
//! file.
//!
//! This crate is single-threaded and synchronous by design (see the specification's
//! concurrency non-goals) — callers that need concurrent access must serialize it
//! externally, which is exactly what `pictdb_cli`'s HTTP front end does.

pub mod catalog;
pub mod codec;
pub mod dedup;
pub mod error;
pub mod hash;
pub mod header;
pub mod layout;
pub mod list;
pub mod gc;
pub mod metadata;
pub mod resize;

pub use catalog::{OpenMode, PictDb};
pub use error::{Error, Result};
pub use header::{Header, MAX_MAX_FILES};
pub use metadata::{Metadata, Resolution};
