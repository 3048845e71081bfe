//! Shared domain types.
//!
//! The whole pipeline is one linear pass over an in-memory table, so
//! everything here is plain data handed by reference between stages.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Canonical timestamp format for generated and exported files.
///
/// The loader accepts a few more formats; see `io::ingest`.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// One hourly observation for a single building.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub kwh: f64,
    /// Building identifier, derived from the source file name (stem), never
    /// from file content.
    pub building: String,
}

/// ISO-week key, displayed as `2026-W32`.
///
/// `Ord` follows `(year, week)`, so a `BTreeMap<WeekKey, _>` iterates in
/// week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub year: i32,
    pub week: u32,
}

impl WeekKey {
    pub fn of(ts: NaiveDateTime) -> Self {
        let iso = ts.date().iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

/// Summed kWh per calendar date, across all buildings, in date order.
pub type DailyTotals = BTreeMap<NaiveDate, f64>;

/// Summed kWh per ISO week, across all buildings, in week order.
pub type WeeklyTotals = BTreeMap<WeekKey, f64>;

/// Per-building descriptive statistics, in alphabetical building order.
pub type BuildingSummary = BTreeMap<String, BuildingStats>;

/// Descriptive statistics of one building's readings, each rounded to 3
/// decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// A skipped source file plus the reason it was skipped.
///
/// Ingest failures are data, not errors: the loader records them and the
/// pipeline keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub file: String,
    pub reason: String,
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file, self.reason)
    }
}

/// Run-wide configuration, built once by the driver and passed down.
///
/// All filesystem locations live here so that directory side effects are
/// not scattered across the stages.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory the generator writes to and the loader reads from.
    pub data_dir: PathBuf,
    /// Directory that receives the dashboard and the exported artifacts.
    pub output_dir: PathBuf,
    /// Building names the generator synthesizes readings for.
    pub buildings: Vec<String>,
    /// Length of the generated window, in days (24 readings per day).
    pub sample_days: u32,
    /// Fixed RNG seed for the generator; `None` seeds from entropy.
    pub sample_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            buildings: vec![
                "engineering_block".to_string(),
                "library".to_string(),
                "hostel_A".to_string(),
            ],
            sample_days: 30,
            sample_seed: None,
        }
    }
}

impl PipelineConfig {
    pub fn cleaned_data_path(&self) -> PathBuf {
        self.output_dir.join("cleaned_data.csv")
    }

    pub fn building_summary_path(&self) -> PathBuf {
        self.output_dir.join("building_summary.csv")
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join("dashboard.png")
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("summary.txt")
    }
}

/// Round to 3 decimal places (generator output and summary stats).
pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_key_orders_by_year_then_week() {
        let a = WeekKey { year: 2025, week: 52 };
        let b = WeekKey { year: 2026, week: 1 };
        let c = WeekKey { year: 2026, week: 2 };
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn week_key_display_pads_week() {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        // 2026-01-05 is a Monday, ISO week 2.
        assert_eq!(WeekKey::of(ts).to_string(), "2026-W02");
    }

    #[test]
    fn round3_keeps_three_decimals() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(0.1), 0.1);
        assert_eq!(round3(7.2994), 7.299);
    }
}
