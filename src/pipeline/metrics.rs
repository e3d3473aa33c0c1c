//! Metrics stage: scalar KPIs over a filtered view

use log::debug;
use serde::Serialize;

use super::dataset::{Placement, PREDICTED_SALARY};
use super::filter::FilteredView;
use crate::error::Result;

/// Headline counts and average predicted salary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSet {
    pub total_count: usize,
    pub placed_count: usize,
    pub not_placed_count: usize,
    /// Mean salary (LPA) over the placed view, rounded to 2 decimals.
    /// `None` means not applicable: there is nobody placed to average over.
    pub avg_salary: Option<f64>,
}

/// Compute KPIs for `view`, averaging salary over `placed_view`
pub fn compute_kpis(view: &FilteredView, placed_view: &FilteredView) -> Result<KpiSet> {
    let total_count = view.len();
    let placed_count = view
        .placements()?
        .into_iter()
        .filter(|p| *p == Some(Placement::Placed))
        .count();

    let salaries: Vec<f64> = placed_view
        .measure(PREDICTED_SALARY)?
        .into_iter()
        .flatten()
        .collect();
    let avg_salary = mean(&salaries).map(round2);

    debug!(
        "kpis: total={} placed={} avg_salary={:?}",
        total_count, placed_count, avg_salary
    );

    Ok(KpiSet {
        total_count,
        placed_count,
        not_placed_count: total_count - placed_count,
        avg_salary,
    })
}

/// Arithmetic mean, `None` for an empty slice
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round half away from zero to 2 decimal digits
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
