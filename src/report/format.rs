//! Plain-text summary report.

use crate::domain::{BuildingSummary, Reading};

/// Grand total kWh across the unified table.
pub fn grand_total(readings: &[Reading]) -> f64 {
    readings.iter().map(|r| r.kwh).sum()
}

/// The building with the largest summed consumption, with that sum.
///
/// `None` when the summary is empty.
pub fn highest_consumer(summary: &BuildingSummary) -> Option<(&str, f64)> {
    summary
        .iter()
        .max_by(|a, b| {
            a.1.sum
                .partial_cmp(&b.1.sum)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(building, stats)| (building.as_str(), stats.sum))
}

/// Format the campus summary report.
///
/// An empty table produces a `No data available.` body instead of failing,
/// so an empty run still finishes with a readable report.
pub fn format_summary_report(readings: &[Reading], summary: &BuildingSummary) -> String {
    let mut out = String::new();
    out.push_str("Campus Energy Report\n");
    out.push_str("====================\n\n");

    if readings.is_empty() || summary.is_empty() {
        out.push_str("No data available.\n");
        return out;
    }

    out.push_str(&format!(
        "Total Campus Consumption: {:.2} kWh\n",
        grand_total(readings)
    ));
    if let Some((building, sum)) = highest_consumer(summary) {
        out.push_str(&format!(
            "Highest Consuming Building: {building} ({sum:.2} kWh)\n"
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BuildingStats;
    use chrono::NaiveDate;

    fn reading(hour: u32, kwh: f64, building: &str) -> Reading {
        Reading {
            timestamp: NaiveDate::from_ymd_opt(2026, 7, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            kwh,
            building: building.to_string(),
        }
    }

    fn stats(sum: f64) -> BuildingStats {
        BuildingStats {
            mean: sum,
            min: sum,
            max: sum,
            sum,
        }
    }

    #[test]
    fn report_names_the_highest_consumer() {
        let readings = vec![reading(9, 10.0, "library"), reading(9, 2.5, "hostel_A")];
        let mut summary = BuildingSummary::new();
        summary.insert("library".to_string(), stats(10.0));
        summary.insert("hostel_A".to_string(), stats(2.5));

        let report = format_summary_report(&readings, &summary);
        assert!(report.starts_with("Campus Energy Report\n====================\n"));
        assert!(report.contains("Total Campus Consumption: 12.50 kWh"));
        assert!(report.contains("Highest Consuming Building: library (10.00 kWh)"));
    }

    #[test]
    fn empty_table_reports_no_data() {
        let report = format_summary_report(&[], &BuildingSummary::new());
        assert!(report.contains("No data available."));
        assert!(!report.contains("Total Campus Consumption"));
    }

    #[test]
    fn highest_consumer_is_none_on_empty_summary() {
        assert_eq!(highest_consumer(&BuildingSummary::new()), None);
    }
}
