//! Daily and weekly consumption totals.

use crate::domain::{DailyTotals, Reading, WeekKey, WeeklyTotals};

/// Sum kWh per calendar date, across all buildings, in date order.
///
/// Timezone-naive: each row is grouped by its own timestamp's date.
pub fn daily_totals(readings: &[Reading]) -> DailyTotals {
    let mut totals = DailyTotals::new();
    for r in readings {
        *totals.entry(r.timestamp.date()).or_insert(0.0) += r.kwh;
    }
    totals
}

/// Sum kWh per ISO week, across all buildings, in week order.
pub fn weekly_totals(readings: &[Reading]) -> WeeklyTotals {
    let mut totals = WeeklyTotals::new();
    for r in readings {
        *totals.entry(WeekKey::of(r.timestamp)).or_insert(0.0) += r.kwh;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reading(day: u32, hour: u32, kwh: f64, building: &str) -> Reading {
        Reading {
            timestamp: NaiveDate::from_ymd_opt(2026, 7, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            kwh,
            building: building.to_string(),
        }
    }

    #[test]
    fn daily_totals_group_across_buildings() {
        let readings = vec![
            reading(1, 9, 2.0, "library"),
            reading(1, 10, 3.0, "hostel_A"),
            reading(2, 9, 4.0, "library"),
        ];

        let daily = daily_totals(&readings);
        assert_eq!(daily.len(), 2);
        let d1 = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 7, 2).unwrap();
        assert!((daily[&d1] - 5.0).abs() < 1e-12);
        assert!((daily[&d2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn daily_totals_preserve_grand_total() {
        let readings: Vec<Reading> = (1..=28)
            .map(|day| reading(day, 12, 1.5 + f64::from(day) * 0.1, "library"))
            .collect();

        let grand: f64 = readings.iter().map(|r| r.kwh).sum();
        let daily_sum: f64 = daily_totals(&readings).values().sum();
        assert!((grand - daily_sum).abs() < 1e-9);
    }

    #[test]
    fn weekly_totals_split_on_iso_week_boundary() {
        // 2026-07-05 is a Sunday (week 27), 2026-07-06 a Monday (week 28).
        let readings = vec![
            reading(5, 23, 1.0, "library"),
            reading(6, 0, 2.0, "library"),
        ];

        let weekly = weekly_totals(&readings);
        assert_eq!(weekly.len(), 2);
        let keys: Vec<String> = weekly.keys().map(WeekKey::to_string).collect();
        assert_eq!(keys, vec!["2026-W27", "2026-W28"]);
    }

    #[test]
    fn empty_input_yields_empty_totals() {
        assert!(daily_totals(&[]).is_empty());
        assert!(weekly_totals(&[]).is_empty());
    }
}
