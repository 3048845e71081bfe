//! Input/output helpers.
//!
//! - readings ingest with per-file error capture (`ingest`)
//! - exported artifacts: cleaned table, summary CSV, text report (`export`)

use std::path::Path;

use crate::error::AppError;

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;

/// Idempotent "make sure this directory exists".
///
/// The only fatal filesystem error in the ingest path; stages otherwise
/// assume their directories are present.
pub fn ensure_dir(path: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create directory '{}': {e}", path.display()),
        )
    })
}
