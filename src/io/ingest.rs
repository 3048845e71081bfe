//! Readings ingest.
//!
//! Turns a directory of per-building CSVs into one time-sorted table.
//!
//! Design goals:
//! - **Per-file isolation**: a file either contributes all of its rows or
//!   none; any parse failure skips the whole file.
//! - **Failures are data**: skipped files become `FileError` records; the
//!   loader itself only fails if the data directory cannot be created.
//! - **Deterministic behavior**: files are visited in sorted name order.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;

use crate::domain::{FileError, Reading};
use crate::error::AppError;
use crate::io::ensure_dir;

/// Loader output: the unified table plus everything worth reporting.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    /// All surviving readings, ascending by timestamp (stable for ties).
    pub readings: Vec<Reading>,
    /// One record per skipped file.
    pub file_errors: Vec<FileError>,
    /// Number of candidate `.csv` files examined.
    pub files_scanned: usize,
}

impl LoadedData {
    pub fn rows_loaded(&self) -> usize {
        self.readings.len()
    }
}

/// Load every readings CSV under `data_dir` into one unified table.
///
/// The directory is created if missing. An empty or missing directory is
/// not an error: the result is simply empty.
pub fn load_all_readings(data_dir: &Path) -> Result<LoadedData, AppError> {
    ensure_dir(data_dir)?;

    let mut files: Vec<PathBuf> = std::fs::read_dir(data_dir)
        .map_err(|e| {
            AppError::new(
                2,
                format!("Failed to read data directory '{}': {e}", data_dir.display()),
            )
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_csv(p))
        .collect();
    // Sorted name order keeps the tie-breaking of the final stable sort
    // reproducible across platforms.
    files.sort();

    let mut loaded = LoadedData::default();
    for path in files {
        loaded.files_scanned += 1;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let Some(building) = building_from_filename(&path) else {
            loaded.file_errors.push(FileError {
                file: file_name,
                reason: "unrecognized file name".to_string(),
            });
            continue;
        };

        match parse_readings_file(&path) {
            Ok(rows) => loaded
                .readings
                .extend(rows.into_iter().map(|(timestamp, kwh)| Reading {
                    timestamp,
                    kwh,
                    building: building.clone(),
                })),
            Err(reason) => loaded.file_errors.push(FileError {
                file: file_name,
                reason,
            }),
        }
    }

    // Stable sort: rows with equal timestamps keep per-file order.
    loaded.readings.sort_by_key(|r| r.timestamp);

    Ok(loaded)
}

/// Building identifier for a readings file: the file stem, verbatim.
///
/// The identifier comes from the file name, never from file content, so
/// the mapping stays auditable in isolation from parsing.
pub fn building_from_filename(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Parse one readings file; any failure rejects the whole file.
fn parse_readings_file(path: &Path) -> Result<Vec<(NaiveDateTime, f64)>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open: {e}"))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| format!("failed to read headers: {e}"))?
        .clone();
    let header_map = build_header_map(&headers);

    let Some(&kwh_idx) = header_map.get("kwh") else {
        return Err("missing kwh column".to_string());
    };
    let Some(&ts_idx) = header_map.get("timestamp") else {
        return Err("missing timestamp column".to_string());
    };

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header line and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| format!("line {line}: {e}"))?;
        let row = parse_row(&record, ts_idx, kwh_idx).map_err(|e| format!("line {line}: {e}"))?;
        rows.push(row);
    }

    Ok(rows)
}

fn parse_row(
    record: &StringRecord,
    ts_idx: usize,
    kwh_idx: usize,
) -> Result<(NaiveDateTime, f64), String> {
    let ts_raw = record
        .get(ts_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing timestamp value".to_string())?;
    let kwh_raw = record
        .get(kwh_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing kwh value".to_string())?;

    let timestamp = parse_timestamp(ts_raw)?;
    let kwh = kwh_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid kwh value '{kwh_raw}'"))?;

    Ok((timestamp, kwh))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿timestamp"). If we don't strip it, the
    // required-column check incorrectly reports a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    // Generated files use the first format; the rest cover common
    // spreadsheet and ISO exports. `%.f` also matches fractional seconds.
    const FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    for fmt in FMTS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    // Bare dates (e.g. daily exports) are read as midnight.
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(format!("invalid timestamp '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn loads_and_tags_rows_by_file_stem() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "library.csv",
            &[
                "timestamp,kwh",
                "2026-07-01 10:00:00,4.2",
                "2026-07-01 11:00:00,5.0",
            ],
        );
        write_csv(
            dir.path(),
            "hostel_A.csv",
            &["timestamp,kwh", "2026-07-01 09:00:00,3.1"],
        );

        let loaded = load_all_readings(dir.path()).unwrap();
        assert_eq!(loaded.rows_loaded(), 3);
        assert!(loaded.file_errors.is_empty());
        assert_eq!(loaded.files_scanned, 2);

        // Sorted across files by timestamp.
        assert_eq!(loaded.readings[0].building, "hostel_A");
        assert_eq!(loaded.readings[1].building, "library");
        for w in loaded.readings.windows(2) {
            assert!(w[0].timestamp <= w[1].timestamp);
        }
    }

    #[test]
    fn missing_kwh_column_skips_file_with_one_error() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "broken.csv",
            &["timestamp,energy", "2026-07-01 10:00:00,4.2"],
        );
        write_csv(
            dir.path(),
            "ok.csv",
            &["timestamp,kwh", "2026-07-01 10:00:00,4.2"],
        );

        let loaded = load_all_readings(dir.path()).unwrap();
        assert_eq!(loaded.rows_loaded(), 1);
        assert_eq!(loaded.file_errors.len(), 1);
        assert_eq!(loaded.file_errors[0].file, "broken.csv");
        assert_eq!(loaded.file_errors[0].reason, "missing kwh column");
    }

    #[test]
    fn bad_row_rejects_whole_file() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "partial.csv",
            &[
                "timestamp,kwh",
                "2026-07-01 10:00:00,4.2",
                "2026-07-01 11:00:00,not-a-number",
            ],
        );

        let loaded = load_all_readings(dir.path()).unwrap();
        assert_eq!(loaded.rows_loaded(), 0, "no partial inclusion");
        assert_eq!(loaded.file_errors.len(), 1);
        assert!(loaded.file_errors[0].reason.contains("line 3"));
    }

    #[test]
    fn non_csv_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "notes.txt", &["not a csv"]);
        write_csv(
            dir.path(),
            "library.csv",
            &["timestamp,kwh", "2026-07-01 10:00:00,4.2"],
        );

        let loaded = load_all_readings(dir.path()).unwrap();
        assert_eq!(loaded.files_scanned, 1);
        assert_eq!(loaded.rows_loaded(), 1);
    }

    #[test]
    fn missing_dir_is_created_and_empty() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");

        let loaded = load_all_readings(&data_dir).unwrap();
        assert!(data_dir.is_dir());
        assert!(loaded.readings.is_empty());
        assert!(loaded.file_errors.is_empty());
    }

    #[test]
    fn equal_timestamps_keep_file_name_order() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "b_block.csv",
            &["timestamp,kwh", "2026-07-01 10:00:00,2.0"],
        );
        write_csv(
            dir.path(),
            "a_block.csv",
            &["timestamp,kwh", "2026-07-01 10:00:00,1.0"],
        );

        let loaded = load_all_readings(dir.path()).unwrap();
        assert_eq!(loaded.readings[0].building, "a_block");
        assert_eq!(loaded.readings[1].building, "b_block");
    }

    #[test]
    fn extra_columns_and_bom_headers_are_tolerated() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "annex.csv",
            &[
                "\u{feff}Timestamp,kwh,comment",
                "2026-07-01T10:00:00,4.25,meter swapped",
            ],
        );

        let loaded = load_all_readings(dir.path()).unwrap();
        assert_eq!(loaded.rows_loaded(), 1);
        assert!((loaded.readings[0].kwh - 4.25).abs() < 1e-12);
    }

    #[test]
    fn parse_timestamp_accepts_known_formats() {
        assert!(parse_timestamp("2026-07-01 10:00:00").is_ok());
        assert!(parse_timestamp("2026-07-01T10:00:00").is_ok());
        assert!(parse_timestamp("2026-07-01 10:00:00.250").is_ok());
        let midnight = parse_timestamp("2026-07-01").unwrap();
        assert_eq!(midnight.time(), NaiveTime::MIN);
        assert!(parse_timestamp("01/07/2026 10:00").is_err());
    }
}
