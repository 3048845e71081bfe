//! The batch pipeline: generate → load → aggregate → render → export.
//!
//! Keeping the stage order and the progress output in one function means
//! `main` and tests only deal with `PipelineConfig` and `RunOutput`.

use crate::aggregate::{building_summary, daily_totals, weekly_totals};
use crate::data::generate_sample_data;
use crate::domain::{BuildingSummary, DailyTotals, PipelineConfig, WeeklyTotals};
use crate::error::AppError;
use crate::io::ensure_dir;
use crate::io::export::{write_building_summary_csv, write_cleaned_csv, write_text_report};
use crate::io::ingest::{LoadedData, load_all_readings};
use crate::plot::render_dashboard;

/// All computed outputs of a single pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub loaded: LoadedData,
    pub daily: DailyTotals,
    pub weekly: WeeklyTotals,
    pub summary: BuildingSummary,
}

/// Execute the full pipeline in fixed sequence, printing progress.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunOutput, AppError> {
    ensure_dir(&config.data_dir)?;
    ensure_dir(&config.output_dir)?;

    // 1) Regenerate the sample inputs.
    println!(">>> Generating sample data...");
    generate_sample_data(config)?;
    println!(
        "Sample data generated ({} buildings, {} days hourly).",
        config.buildings.len(),
        config.sample_days
    );

    // 2) Load every readings file into one time-sorted table.
    println!(">>> Loading readings...");
    let loaded = load_all_readings(&config.data_dir)?;
    println!("Rows loaded: {}", loaded.rows_loaded());
    for err in &loaded.file_errors {
        println!("Skipped {err}");
    }

    // 3) Derived views.
    println!(">>> Computing aggregates...");
    let daily = daily_totals(&loaded.readings);
    let weekly = weekly_totals(&loaded.readings);
    let summary = building_summary(&loaded.readings);

    // 4) Dashboard. Skipped when there is nothing to draw; the report
    //    covers the empty case.
    if loaded.readings.is_empty() {
        println!(">>> No readings loaded; skipping dashboard.");
    } else {
        println!(">>> Rendering dashboard...");
        render_dashboard(&daily, &weekly, &loaded.readings, &config.dashboard_path())?;
    }

    // 5) Exports.
    println!(">>> Exporting outputs...");
    write_cleaned_csv(&config.cleaned_data_path(), &loaded.readings)?;
    write_building_summary_csv(&config.building_summary_path(), &summary)?;
    write_text_report(&config.report_path(), &loaded.readings, &summary)?;

    println!(
        "Completed. Outputs written to '{}'.",
        config.output_dir.display()
    );

    Ok(RunOutput {
        loaded,
        daily,
        weekly,
        summary,
    })
}
