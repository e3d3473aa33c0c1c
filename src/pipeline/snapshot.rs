//! Runs every stage for one FilterSpec
//!
//! A snapshot is recomputed from scratch on each filter change; nothing is
//! cached between calls.

use std::collections::BTreeMap;

use log::info;
use serde::Serialize;

use super::binning::{
    placement_distribution, placement_split, salary_by_cgpa_band, salary_histogram, CgpaBand,
    HistogramBin, PlacementSplit,
};
use super::correlation::{correlation_matrix, scatter_points, Correlation, DEFAULT_CORRELATION_COLUMNS};
use super::dataset::{
    Dataset, Gender, Placement, ATTENDANCE_PERCENTAGE, CGPA, PREDICTED_SALARY, SOFT_SKILL_SCORE,
    TECHNICAL_SKILL_SCORE, WORK_EXPERIENCE_MONTHS,
};
use super::filter::{apply, FilterSpec};
use super::groups::{box_summary_by_placement, placement_rate_by_gender, BoxSummary};
use super::metrics::{compute_kpis, KpiSet};
use crate::error::Result;

/// Default number of salary histogram bins
pub const DEFAULT_SALARY_BINS: usize = 10;

/// Tunables for a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    pub salary_bins: usize,
    pub correlation_columns: Vec<String>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            salary_bins: DEFAULT_SALARY_BINS,
            correlation_columns: DEFAULT_CORRELATION_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Every stage output for one FilterSpec
#[derive(Debug, Clone, Serialize)]
pub struct InsightSnapshot {
    pub filter: FilterSpec,
    pub kpis: KpiSet,
    pub placement_distribution: BTreeMap<Placement, usize>,
    pub placement_split: Option<PlacementSplit>,
    pub salary_histogram: Vec<HistogramBin>,
    pub salary_by_cgpa_band: BTreeMap<CgpaBand, f64>,
    pub placement_rate_by_gender: BTreeMap<Gender, f64>,
    pub cgpa_by_placement: BTreeMap<Placement, BoxSummary>,
    pub attendance_by_placement: BTreeMap<Placement, BoxSummary>,
    pub salary_vs_experience: Vec<(f64, f64)>,
    pub technical_vs_soft_skill: Vec<(f64, f64)>,
    pub correlation: Correlation,
}

impl InsightSnapshot {
    /// Filter the dataset and run every stage in sequence
    pub fn compute(dataset: &Dataset, spec: &FilterSpec, options: &SnapshotOptions) -> Result<Self> {
        let view = apply(dataset, spec)?;
        let placed = view.placed()?;

        let requested: Vec<&str> = options
            .correlation_columns
            .iter()
            .map(String::as_str)
            .collect();

        let snapshot = Self {
            filter: *spec,
            kpis: compute_kpis(&view, &placed)?,
            placement_distribution: placement_distribution(&view)?,
            placement_split: placement_split(&view)?,
            salary_histogram: salary_histogram(&placed, options.salary_bins)?,
            salary_by_cgpa_band: salary_by_cgpa_band(&placed)?,
            placement_rate_by_gender: placement_rate_by_gender(&view)?,
            cgpa_by_placement: box_summary_by_placement(&view, CGPA)?,
            attendance_by_placement: box_summary_by_placement(&view, ATTENDANCE_PERCENTAGE)?,
            salary_vs_experience: scatter_points(&placed, WORK_EXPERIENCE_MONTHS, PREDICTED_SALARY)?,
            technical_vs_soft_skill: scatter_points(&view, TECHNICAL_SKILL_SCORE, SOFT_SKILL_SCORE)?,
            correlation: correlation_matrix(&view, &requested)?,
        };

        info!(
            "snapshot for {:?}: {} record(s), {} placed",
            spec, snapshot.kpis.total_count, snapshot.kpis.placed_count
        );
        Ok(snapshot)
    }
}
