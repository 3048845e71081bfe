//! Three-panel dashboard rendering.
//!
//! Why Plotters?
//! - one backend call renders the whole stacked layout into a single PNG
//! - axis/tick handling comes for free via `ChartBuilder`
//! - the bitmap backend writes the file and releases itself on `present()`
//!
//! The panels are data-driven: all series and bounds are computed from the
//! aggregates before any drawing happens, so the math stays testable
//! without a backend.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use plotters::coord::Shift;
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::domain::{DailyTotals, Reading, WeeklyTotals};
use crate::error::AppError;

/// Dashboard image size in pixels (three stacked panels).
const DASHBOARD_SIZE: (u32, u32) = (1000, 1300);

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

/// Render the dashboard PNG: daily trend, weekly bars, hourly scatter.
///
/// Empty input is an error here; the driver decides whether the stage can
/// be skipped.
pub fn render_dashboard(
    daily: &DailyTotals,
    weekly: &WeeklyTotals,
    readings: &[Reading],
    path: &Path,
) -> Result<(), AppError> {
    if readings.is_empty() || daily.is_empty() || weekly.is_empty() {
        return Err(AppError::new(
            3,
            "No readings available to render the dashboard.",
        ));
    }

    let root = BitMapBackend::new(path, DASHBOARD_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AppError::new(4, format!("Dashboard rendering failed: {e}")))?;

    let panels = root.split_evenly((3, 1));
    draw_daily_panel(&panels[0], daily)
        .map_err(|e| AppError::new(4, format!("Daily panel rendering failed: {e}")))?;
    draw_weekly_panel(&panels[1], weekly)
        .map_err(|e| AppError::new(4, format!("Weekly panel rendering failed: {e}")))?;
    draw_scatter_panel(&panels[2], readings)
        .map_err(|e| AppError::new(4, format!("Hourly panel rendering failed: {e}")))?;

    // Flush the bitmap to disk; the backend is released before returning.
    root.present().map_err(|e| {
        AppError::new(
            4,
            format!("Failed to write dashboard '{}': {e}", path.display()),
        )
    })?;

    Ok(())
}

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Line plot of daily totals over time.
fn draw_daily_panel(area: &Panel<'_>, daily: &DailyTotals) -> DrawResult {
    let dates: Vec<_> = daily.keys().copied().collect();
    let values: Vec<f64> = daily.values().copied().collect();
    let x_max = (dates.len() as f64 - 1.0).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption("Daily Energy Consumption", CAPTION_FONT)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max, 0.0..padded_max(&values))?;

    chart
        .configure_mesh()
        .y_desc("kWh")
        .x_labels(8)
        .x_label_formatter(&|x| {
            // Ticks land on fractional positions; only label whole days.
            let i = x.round() as usize;
            if (x - i as f64).abs() > 0.25 {
                return String::new();
            }
            dates
                .get(i)
                .map(|d| d.format("%m-%d").to_string())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(LineSeries::new(
        values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
        &BLUE,
    ))?;

    Ok(())
}

/// Bar chart of weekly totals with rotated week labels.
fn draw_weekly_panel(area: &Panel<'_>, weekly: &WeeklyTotals) -> DrawResult {
    let labels: Vec<String> = weekly.keys().map(|w| w.to_string()).collect();
    let values: Vec<f64> = weekly.values().copied().collect();
    let n = labels.len() as u32;

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption("Weekly Consumption", CAPTION_FONT)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 70)
        .build_cartesian_2d((0u32..n).into_segmented(), 0.0..padded_max(&values))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("kWh")
        .x_labels(labels.len())
        // Rotated labels keep adjacent week keys from colliding.
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        let i = i as u32;
        Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), *v),
            ],
            BLUE.mix(0.6).filled(),
        )
    }))?;

    Ok(())
}

/// Scatter of every raw hourly reading, one colored series per building.
fn draw_scatter_panel(area: &Panel<'_>, readings: &[Reading]) -> DrawResult {
    // Guarded by the caller; nothing to draw otherwise.
    let Some(first) = readings.first() else {
        return Ok(());
    };
    let t0 = first.timestamp;

    // x axis: days since the first reading (the table is time-sorted).
    let to_days = |ts: NaiveDateTime| (ts - t0).num_seconds() as f64 / 86_400.0;

    let mut by_building: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    let mut x_max = 0.0f64;
    let mut y_max = 0.0f64;
    for r in readings {
        let x = to_days(r.timestamp);
        x_max = x_max.max(x);
        y_max = y_max.max(r.kwh);
        by_building
            .entry(r.building.as_str())
            .or_default()
            .push((x, r.kwh));
    }

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption("Hourly Readings", CAPTION_FONT)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..x_max.max(1.0), 0.0..padded_max(&[y_max]))?;

    chart
        .configure_mesh()
        .y_desc("kWh")
        .x_labels(8)
        .x_label_formatter(&|x| {
            (t0 + Duration::seconds((x * 86_400.0) as i64))
                .format("%m-%d")
                .to_string()
        })
        .draw()?;

    for (idx, (building, points)) in by_building.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 2, color.filled())),
            )?
            .label(*building)
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

/// Upper y bound with a little headroom; degenerate inputs get a unit range.
fn padded_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_error_not_a_panic() {
        let err = render_dashboard(
            &DailyTotals::new(),
            &WeeklyTotals::new(),
            &[],
            Path::new("unused.png"),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn padded_max_adds_headroom() {
        assert!((padded_max(&[10.0]) - 11.0).abs() < 1e-12);
        assert_eq!(padded_max(&[]), 1.0);
        assert_eq!(padded_max(&[0.0]), 1.0);
    }
}
