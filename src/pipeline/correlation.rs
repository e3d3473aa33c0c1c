//! Correlation stage: Pearson matrix over numeric columns

use faer::Mat;
use log::debug;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::dataset::{
    ATTENDANCE_PERCENTAGE, CGPA, PREDICTED_PLACEMENT, PREDICTED_SALARY, SOFT_SKILL_SCORE,
    TECHNICAL_SKILL_SCORE, WORK_EXPERIENCE_MONTHS,
};
use super::filter::FilteredView;
use crate::error::{InsightsError, Result};

/// Candidate columns for the correlation panel, in display order
pub const DEFAULT_CORRELATION_COLUMNS: [&str; 7] = [
    CGPA,
    ATTENDANCE_PERCENTAGE,
    TECHNICAL_SKILL_SCORE,
    SOFT_SKILL_SCORE,
    WORK_EXPERIENCE_MONTHS,
    PREDICTED_SALARY,
    PREDICTED_PLACEMENT,
];

/// Square, symmetric correlation matrix over named columns.
///
/// Cells are `NaN` where the correlation is undefined (zero variance or
/// fewer than two paired observations).
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Look up a cell by column names
    pub fn value(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.get(i, j))
    }

    /// Rows as nested vectors, in column order
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.size())
            .map(|i| (0..self.size()).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CorrelationMatrix", 2)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("values", &self.rows())?;
        state.end()
    }
}

/// Outcome of the correlation stage
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Correlation {
    Matrix(CorrelationMatrix),
    /// Fewer than two requested columns are present and numeric
    InsufficientData { available: Vec<String> },
}

impl Correlation {
    pub fn matrix(&self) -> Option<&CorrelationMatrix> {
        match self {
            Correlation::Matrix(m) => Some(m),
            Correlation::InsufficientData { .. } => None,
        }
    }
}

/// Pearson correlation matrix over the requested columns present in `view`.
///
/// The requested order is preserved. Nulls are skipped pairwise, and salary
/// is only read for placed records.
pub fn correlation_matrix(view: &FilteredView, requested_columns: &[&str]) -> Result<Correlation> {
    let mut available: Vec<String> = Vec::new();
    for name in requested_columns {
        if view.has_numeric_column(name) && !available.iter().any(|a| a == name) {
            available.push(name.to_string());
        }
    }

    if available.len() < 2 {
        debug!("correlation: insufficient columns {:?}", available);
        return Ok(Correlation::InsufficientData { available });
    }

    let data: Vec<Vec<Option<f64>>> = available
        .iter()
        .map(|name| view.measure(name))
        .collect::<Result<_>>()?;

    let n = available.len();
    let mut values = Mat::<f64>::zeros(n, n);

    for i in 0..n {
        values[(i, i)] = if has_variance(&data[i]) { 1.0 } else { f64::NAN };
        for j in (i + 1)..n {
            let corr = pearson_correlation(&data[i], &data[j]).unwrap_or(f64::NAN);
            values[(i, j)] = corr;
            values[(j, i)] = corr;
        }
    }

    debug!("correlation: {}x{} matrix over {} rows", n, n, view.len());
    Ok(Correlation::Matrix(CorrelationMatrix {
        columns: available,
        values,
    }))
}

/// Whether the finite values of a column spread at all
fn has_variance(values: &[Option<f64>]) -> bool {
    let mut present = values.iter().flatten().filter(|v| v.is_finite());
    match present.next() {
        Some(first) => present.any(|v| v != first),
        None => false,
    }
}

/// Pearson correlation over pairwise-complete observations using Welford's
/// single-pass update. Pairs with a null or non-finite side are skipped.
/// `None` when fewer than two pairs remain or either side has zero variance.
fn pearson_correlation(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov_xy / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Pairwise-complete (x, y) points for a scatter panel
pub fn scatter_points(view: &FilteredView, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
    for name in [x, y] {
        if !view.has_numeric_column(name) {
            return Err(InsightsError::SchemaMismatch {
                column: name.to_string(),
                detail: "column not found or not numeric".to_string(),
            });
        }
    }

    let xs = view.measure(x)?;
    let ys = view.measure(y)?;

    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect())
}
