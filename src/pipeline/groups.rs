//! Group aggregation stage: rates and spreads per categorical group

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use super::dataset::{Gender, Placement};
use super::filter::FilteredView;
use crate::error::{InsightsError, Result};

/// Fraction placed within each gender group. Genders with no members in the
/// view are absent from the result.
pub fn placement_rate_by_gender(view: &FilteredView) -> Result<BTreeMap<Gender, f64>> {
    let genders = view.genders()?;
    let placements = view.placements()?;

    // (members, placed)
    let mut tallies: BTreeMap<Gender, (usize, usize)> = BTreeMap::new();
    for (gender, placement) in genders.into_iter().zip(placements) {
        if let (Some(gender), Some(placement)) = (gender, placement) {
            let entry = tallies.entry(gender).or_insert((0, 0));
            entry.0 += 1;
            if placement == Placement::Placed {
                entry.1 += 1;
            }
        }
    }

    let rates: BTreeMap<Gender, f64> = tallies
        .into_iter()
        .map(|(gender, (members, placed))| (gender, placed as f64 / members as f64))
        .collect();

    debug!("placement rate by gender: {:?}", rates);
    Ok(rates)
}

/// Five-number summary of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxSummary {
    /// Summarise finite values; `None` when there are none
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Spread of `column` per placement outcome. Outcomes with no values are
/// absent from the result.
pub fn box_summary_by_placement(
    view: &FilteredView,
    column: &str,
) -> Result<BTreeMap<Placement, BoxSummary>> {
    if !view.has_numeric_column(column) {
        return Err(InsightsError::SchemaMismatch {
            column: column.to_string(),
            detail: "column not found or not numeric".to_string(),
        });
    }

    let placements = view.placements()?;
    let values = view.measure(column)?;

    let mut groups: BTreeMap<Placement, Vec<f64>> = BTreeMap::new();
    for (placement, value) in placements.into_iter().zip(values) {
        if let (Some(placement), Some(value)) = (placement, value) {
            groups.entry(placement).or_default().push(value);
        }
    }

    Ok(groups
        .into_iter()
        .filter_map(|(placement, values)| {
            BoxSummary::from_values(&values).map(|summary| (placement, summary))
        })
        .collect())
}
