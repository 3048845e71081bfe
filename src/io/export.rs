//! Exported artifacts.
//!
//! The exports are meant to be easy to consume in spreadsheets or
//! downstream scripts: two plain CSVs plus a short text report.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{BuildingSummary, Reading, TIMESTAMP_FMT};
use crate::error::AppError;
use crate::report::format_summary_report;

/// Write the unified table: `timestamp,kwh,building`, no index column.
pub fn write_cleaned_csv(path: &Path, readings: &[Reading]) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "timestamp,kwh,building").map_err(|e| write_err(path, e))?;
    for r in readings {
        writeln!(
            file,
            "{},{},{}",
            r.timestamp.format(TIMESTAMP_FMT),
            r.kwh,
            r.building
        )
        .map_err(|e| write_err(path, e))?;
    }

    Ok(())
}

/// Write the per-building summary, one row per building identifier.
pub fn write_building_summary_csv(path: &Path, summary: &BuildingSummary) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "building,mean,min,max,sum").map_err(|e| write_err(path, e))?;
    for (building, stats) in summary {
        writeln!(
            file,
            "{building},{:.3},{:.3},{:.3},{:.3}",
            stats.mean, stats.min, stats.max, stats.sum
        )
        .map_err(|e| write_err(path, e))?;
    }

    Ok(())
}

/// Write the plain-text summary report.
pub fn write_text_report(
    path: &Path,
    readings: &[Reading],
    summary: &BuildingSummary,
) -> Result<(), AppError> {
    std::fs::write(path, format_summary_report(readings, summary)).map_err(|e| write_err(path, e))
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write '{}': {e}", path.display()))
}
