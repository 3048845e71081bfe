//! Synthetic per-building sample readings.
//!
//! Each run regenerates its own inputs: for every configured building we
//! synthesize one hourly reading per hour over the trailing window and
//! write them as `<data_dir>/<building>.csv`, overwriting the previous
//! run's file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{PipelineConfig, TIMESTAMP_FMT, round3};
use crate::error::AppError;
use crate::io::ensure_dir;

const HOURS_PER_DAY: u32 = 24;

/// Gaussian noise spread around the base curve, in kWh.
const NOISE_STD: f64 = 0.8;

/// Readings never drop below this floor, in kWh.
const KWH_FLOOR: f64 = 0.1;

/// Generate one readings CSV per configured building.
///
/// The series starts `sample_days` days before invocation time, so the
/// last reading falls one hour before "now". Returns the written paths in
/// building order.
pub fn generate_sample_data(config: &PipelineConfig) -> Result<Vec<PathBuf>, AppError> {
    ensure_dir(&config.data_dir)?;

    let mut rng = match config.sample_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let noise = Normal::new(0.0, NOISE_STD)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let hours = config.sample_days * HOURS_PER_DAY;
    let start = Local::now().naive_local() - Duration::days(i64::from(config.sample_days));

    let mut paths = Vec::with_capacity(config.buildings.len());
    for building in &config.buildings {
        // One scalar offset per building shifts its whole series, keeping
        // the buildings distinguishable in the scatter panel.
        let offset = rng.gen_range(0.0..2.0);
        let series = generate_series(start, hours, offset, noise, &mut rng);

        let path = config.data_dir.join(format!("{building}.csv"));
        write_readings_csv(&path, &series)?;
        paths.push(path);
    }

    Ok(paths)
}

/// Synthesize `hours` hourly readings starting at `start`.
///
/// value = diurnal base + Gaussian noise + per-building offset, floored at
/// `KWH_FLOOR` and rounded to 3 decimals.
pub fn generate_series(
    start: NaiveDateTime,
    hours: u32,
    offset: f64,
    noise: Normal<f64>,
    rng: &mut StdRng,
) -> Vec<(NaiveDateTime, f64)> {
    let mut out = Vec::with_capacity(hours as usize);
    for h in 0..hours {
        let ts = start + Duration::hours(i64::from(h));
        let kwh = diurnal_base(ts.hour()) + noise.sample(rng) + offset;
        out.push((ts, round3(kwh.max(KWH_FLOOR))));
    }
    out
}

/// Diurnal base curve: a 24-hour sinusoid between 5 and 11 kWh.
fn diurnal_base(hour: u32) -> f64 {
    let phase = f64::from(hour) / 24.0 * std::f64::consts::TAU;
    5.0 + (phase.sin() + 1.0) * 3.0
}

fn write_readings_csv(path: &Path, series: &[(NaiveDateTime, f64)]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create sample CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "timestamp,kwh")
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;
    for (ts, kwh) in series {
        writeln!(file, "{},{kwh:.3}", ts.format(TIMESTAMP_FMT))
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }

    Ok(())
}
