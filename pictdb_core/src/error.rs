//! The error taxonomy shared by every layer of pictDB.
//!
//! Each variant corresponds to one "kind" a caller can act on (retry, report to the
//! user, map to an HTTP status); the `Display` text is the stable, user-visible message
//! for that kind.

use std::fmt;

/// A single error kind, covering every failure mode a catalog operation can produce.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid argument")]
    InvalidArgument,

    #[error("not enough arguments")]
    NotEnoughArguments,

    #[error("invalid command")]
    InvalidCommand,

    #[error("file not found")]
    FileNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("out of memory")]
    OutOfMemory,

    #[error("full database")]
    FullDatabase,

    #[error("duplicate ID")]
    DuplicateId,

    #[error("codec error: {0}")]
    Codec(String),

    #[error("invalid pictID")]
    InvalidPictId,

    #[error("max_files is out of range")]
    MaxFilesOutOfRange,

    #[error("resolutions are out of range")]
    ResolutionsOutOfRange,
}

impl Error {
    /// A short discriminant, stable across releases, suitable as a process exit code
    /// or a log field — mirrors the taxonomy's kind list in declaration order.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidArgument => 1,
            Error::NotEnoughArguments => 2,
            Error::InvalidCommand => 3,
            Error::FileNotFound => 4,
            Error::Io(_) => 5,
            Error::OutOfMemory => 6,
            Error::FullDatabase => 7,
            Error::DuplicateId => 8,
            Error::Codec(_) => 9,
            Error::InvalidPictId => 10,
            Error::MaxFilesOutOfRange => 11,
            Error::ResolutionsOutOfRange => 12,
        }
    }
}

/// Wraps a short label together with the underlying error for logging call sites that
/// want to add context without losing the original `Error` variant for matching.
pub struct Context<'a>(pub &'a str, pub &'a Error);

impl fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
