//! Distribution and binning stage
//!
//! `placement_distribution` always reports both outcomes, with explicit
//! zeros. `salary_by_cgpa_band` omits bands that have no members, so callers
//! must handle a missing band themselves. The two behave differently on
//! purpose; do not unify them.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use super::dataset::{Placement, CGPA, PREDICTED_SALARY};
use super::filter::FilteredView;
use super::metrics::mean;
use crate::error::{InsightsError, Result};

/// Labeled CGPA interval. Each band is lower-closed and upper-open,
/// except `NineToTen`, which is closed on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CgpaBand {
    #[serde(rename = "<6")]
    BelowSix,
    #[serde(rename = "6-7")]
    SixToSeven,
    #[serde(rename = "7-8")]
    SevenToEight,
    #[serde(rename = "8-9")]
    EightToNine,
    #[serde(rename = "9-10")]
    NineToTen,
}

impl CgpaBand {
    pub const ALL: [CgpaBand; 5] = [
        CgpaBand::BelowSix,
        CgpaBand::SixToSeven,
        CgpaBand::SevenToEight,
        CgpaBand::EightToNine,
        CgpaBand::NineToTen,
    ];

    /// Band for a CGPA value, or `None` outside [0, 10] (and for NaN)
    pub fn classify(cgpa: f64) -> Option<Self> {
        if !(0.0..=10.0).contains(&cgpa) {
            return None;
        }
        let band = if cgpa < 6.0 {
            CgpaBand::BelowSix
        } else if cgpa < 7.0 {
            CgpaBand::SixToSeven
        } else if cgpa < 8.0 {
            CgpaBand::SevenToEight
        } else if cgpa < 9.0 {
            CgpaBand::EightToNine
        } else {
            CgpaBand::NineToTen
        };
        Some(band)
    }

    pub fn label(self) -> &'static str {
        match self {
            CgpaBand::BelowSix => "<6",
            CgpaBand::SixToSeven => "6-7",
            CgpaBand::SevenToEight => "7-8",
            CgpaBand::EightToNine => "8-9",
            CgpaBand::NineToTen => "9-10",
        }
    }
}

impl fmt::Display for CgpaBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count of records per placement outcome. Both outcomes are always present.
pub fn placement_distribution(view: &FilteredView) -> Result<BTreeMap<Placement, usize>> {
    let mut counts: BTreeMap<Placement, usize> =
        Placement::ALL.iter().map(|p| (*p, 0)).collect();

    for placement in view.placements()?.into_iter().flatten() {
        *counts.entry(placement).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Percentage share of each placement outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementSplit {
    pub not_placed_pct: f64,
    pub placed_pct: f64,
}

/// Share of placed vs not placed, `None` for an empty view
pub fn placement_split(view: &FilteredView) -> Result<Option<PlacementSplit>> {
    if view.is_empty() {
        return Ok(None);
    }

    let counts = placement_distribution(view)?;
    let total = view.len() as f64;
    let pct = |p: Placement| counts.get(&p).copied().unwrap_or(0) as f64 / total * 100.0;

    Ok(Some(PlacementSplit {
        not_placed_pct: pct(Placement::NotPlaced),
        placed_pct: pct(Placement::Placed),
    }))
}

/// Mean predicted salary per CGPA band over the placed view.
///
/// Bands without members are omitted. Records with a CGPA outside [0, 10]
/// or a missing salary are skipped.
pub fn salary_by_cgpa_band(placed_view: &FilteredView) -> Result<BTreeMap<CgpaBand, f64>> {
    let cgpa = placed_view.measure(CGPA)?;
    let salary = placed_view.measure(PREDICTED_SALARY)?;

    let mut groups: BTreeMap<CgpaBand, Vec<f64>> = BTreeMap::new();
    let mut skipped = 0usize;

    for (cgpa, salary) in cgpa.into_iter().zip(salary) {
        match (cgpa.and_then(CgpaBand::classify), salary) {
            (Some(band), Some(salary)) => groups.entry(band).or_default().push(salary),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("salary by cgpa band: skipped {} record(s) without a band or salary", skipped);
    }

    let means: BTreeMap<CgpaBand, f64> = groups
        .into_iter()
        .filter_map(|(band, values)| mean(&values).map(|m| (band, m)))
        .collect();

    debug!("salary by cgpa band: {} populated band(s)", means.len());
    Ok(means)
}

/// A single equal-width histogram bin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Lower bound (inclusive)
    pub lower_bound: f64,
    /// Upper bound (exclusive, except for last bin)
    pub upper_bound: f64,
    pub count: usize,
}

/// Equal-width histogram of predicted salary over the placed view.
///
/// Returns an empty vec when there are no salaries, and a single bin when
/// every salary is identical.
pub fn salary_histogram(placed_view: &FilteredView, bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(InsightsError::InvalidParameter {
            name: "bins",
            detail: "histogram needs at least one bin".to_string(),
        });
    }

    let values: Vec<f64> = placed_view
        .measure(PREDICTED_SALARY)?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();

    Ok(histogram(&values, bins))
}

fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower_bound: min,
            upper_bound: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower_bound: min + width * i as f64,
            upper_bound: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_belong_to_upper_band() {
        assert_eq!(CgpaBand::classify(0.0), Some(CgpaBand::BelowSix));
        assert_eq!(CgpaBand::classify(5.99), Some(CgpaBand::BelowSix));
        assert_eq!(CgpaBand::classify(6.0), Some(CgpaBand::SixToSeven));
        assert_eq!(CgpaBand::classify(7.0), Some(CgpaBand::SevenToEight));
        assert_eq!(CgpaBand::classify(8.0), Some(CgpaBand::EightToNine));
        assert_eq!(CgpaBand::classify(9.0), Some(CgpaBand::NineToTen));
        assert_eq!(CgpaBand::classify(10.0), Some(CgpaBand::NineToTen));
    }

    #[test]
    fn test_band_rejects_out_of_range() {
        assert_eq!(CgpaBand::classify(-0.1), None);
        assert_eq!(CgpaBand::classify(10.01), None);
        assert_eq!(CgpaBand::classify(f64::NAN), None);
    }

    #[test]
    fn test_histogram_counts_every_value_once() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let bins = histogram(&values, 2);

        assert_eq!(bins.len(), 2);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].lower_bound, 1.0);
        assert_eq!(bins[1].upper_bound, 5.0);
        // max lands in the closed last bin
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[4.0, 4.0, 4.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }
}
