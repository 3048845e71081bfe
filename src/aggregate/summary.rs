//! Per-building descriptive statistics.

use std::collections::BTreeMap;

use crate::domain::{BuildingStats, BuildingSummary, Reading, round3};

/// Mean/min/max/sum of kWh per building, each rounded to 3 decimals.
///
/// Rows come out in alphabetical building order, which is stable across
/// runs regardless of input order.
pub fn building_summary(readings: &[Reading]) -> BuildingSummary {
    struct Acc {
        sum: f64,
        min: f64,
        max: f64,
        count: usize,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in readings {
        let acc = groups.entry(r.building.as_str()).or_insert(Acc {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        });
        acc.sum += r.kwh;
        acc.min = acc.min.min(r.kwh);
        acc.max = acc.max.max(r.kwh);
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|(building, acc)| {
            (
                building.to_string(),
                BuildingStats {
                    mean: round3(acc.sum / acc.count as f64),
                    min: round3(acc.min),
                    max: round3(acc.max),
                    sum: round3(acc.sum),
                },
            )
        })
        .collect()
}
