//! The fixed, process-wide header persisted at file offset 0.

/// The fixed on-disk identifier every database created by this implementation carries,
/// for format compatibility with the reference database.
pub const DB_NAME: &str = "EPFL PictDB binary";
/// Maximum length of `db_name`, not counting the terminator.
pub const DB_NAME_MAX_LEN: usize = 31;
/// On-disk width of the `db_name` field, including the `\0` terminator.
pub const DB_NAME_FIELD_LEN: usize = DB_NAME_MAX_LEN + 1;

/// Hard ceiling on `max_files`, independent of available memory or disk space.
pub const MAX_MAX_FILES: u32 = 100_000;

#[derive(Debug, Clone)]
pub struct Header {
    pub db_name: String,
    pub db_version: u32,
    pub num_files: u32,
    pub max_files: u32,
    /// Bounding box `(width, height)` used when materialising THUMB and SMALL
    /// derivatives. Indexed by `Resolution::index()`; the ORIG slot is unused.
    pub res_resized: [(u16, u16); 3],
}

impl Header {
    pub fn new(max_files: u32, thumb_res: (u16, u16), small_res: (u16, u16)) -> Self {
        let mut res_resized = [(0u16, 0u16); 3];
        res_resized[crate::metadata::Resolution::Thumb.index()] = thumb_res;
        res_resized[crate::metadata::Resolution::Small.index()] = small_res;
        Header {
            db_name: DB_NAME.to_string(),
            db_version: 0,
            num_files: 0,
            max_files,
            res_resized,
        }
    }

    pub fn bounds_for(&self, res: crate::metadata::Resolution) -> (u32, u32) {
        let (w, h) = self.res_resized[res.index()];
        (w as u32, h as u32)
    }

    /// Every successful mutation bumps the version, per the standardised
    /// "bump on any on-disk mutation" rule.
    pub fn bump_version(&mut self) {
        self.db_version = self.db_version.wrapping_add(1);
    }
}
