//! Filter stage: narrow a dataset to the records matching a FilterSpec

use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::dataset::{
    code_values, measure_values, salary_values, Dataset, Gender, Placement, StudentRecord,
    ATTENDANCE_PERCENTAGE, CGPA, GENDER, PREDICTED_PLACEMENT, PREDICTED_SALARY, SOFT_SKILL_SCORE,
    TECHNICAL_SKILL_SCORE, WORK_EXPERIENCE_MONTHS,
};
use crate::error::Result;

/// Active categorical constraints. `None` means no constraint on that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSpec {
    pub gender: Option<Gender>,
    pub placement: Option<Placement>,
}

impl FilterSpec {
    /// No constraints
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_gender(self, gender: Option<Gender>) -> Self {
        Self { gender, ..self }
    }

    pub fn with_placement(self, placement: Option<Placement>) -> Self {
        Self { placement, ..self }
    }

    /// The same gender constraint with placement fixed to placed
    pub fn placed_only(self) -> Self {
        self.with_placement(Some(Placement::Placed))
    }

    /// Build the row predicate, or `None` when nothing is constrained
    fn predicate(&self) -> Option<Expr> {
        let gender = self
            .gender
            .map(|g| col(GENDER).eq(lit(g.code())));
        let placement = self
            .placement
            .map(|p| col(PREDICTED_PLACEMENT).eq(lit(p.code())));

        match (gender, placement) {
            (Some(g), Some(p)) => Some(g.and(p)),
            (Some(g), None) => Some(g),
            (None, Some(p)) => Some(p),
            (None, None) => None,
        }
    }
}

/// The subset of a dataset matching a FilterSpec. Never mutated; a new view
/// is derived for every filter change.
#[derive(Debug, Clone)]
pub struct FilteredView {
    frame: DataFrame,
    spec: FilterSpec,
}

impl FilteredView {
    pub fn spec(&self) -> FilterSpec {
        self.spec
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Column names present in this view, in frame order
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Whether `name` is present and numeric
    pub fn has_numeric_column(&self, name: &str) -> bool {
        self.frame
            .column(name)
            .map(|c| c.dtype().is_primitive_numeric())
            .unwrap_or(false)
    }

    /// Intersection of this view with `predicted_placement == 1`
    pub fn placed(&self) -> Result<FilteredView> {
        let spec = self.spec.placed_only();
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(col(PREDICTED_PLACEMENT).eq(lit(Placement::Placed.code())))
            .collect()?;

        debug!("placed view: {} of {} rows", frame.height(), self.frame.height());
        Ok(FilteredView { frame, spec })
    }

    pub fn genders(&self) -> Result<Vec<Option<Gender>>> {
        Ok(code_values(&self.frame, GENDER)?
            .into_iter()
            .map(Gender::from_code)
            .collect())
    }

    pub fn placements(&self) -> Result<Vec<Option<Placement>>> {
        Ok(code_values(&self.frame, PREDICTED_PLACEMENT)?
            .into_iter()
            .map(Placement::from_code)
            .collect())
    }

    /// Values of a numeric column. Salary is masked on non-placed rows.
    pub fn measure(&self, name: &str) -> Result<Vec<Option<f64>>> {
        if name == PREDICTED_SALARY {
            salary_values(&self.frame)
        } else {
            measure_values(&self.frame, name)
        }
    }

    /// Read the view back as typed records
    pub fn records(&self) -> Result<Vec<StudentRecord>> {
        let genders = self.genders()?;
        let placements = self.placements()?;
        let cgpa = self.measure(CGPA)?;
        let attendance = self.measure(ATTENDANCE_PERCENTAGE)?;
        let technical = self.measure(TECHNICAL_SKILL_SCORE)?;
        let soft = self.measure(SOFT_SKILL_SCORE)?;
        let experience = self.measure(WORK_EXPERIENCE_MONTHS)?;
        let salary = self.measure(PREDICTED_SALARY)?;

        let records = (0..self.len())
            .filter_map(|i| {
                Some(StudentRecord {
                    gender: genders[i]?,
                    cgpa: cgpa[i].unwrap_or(f64::NAN),
                    attendance_percentage: attendance[i].unwrap_or(f64::NAN),
                    technical_skill_score: technical[i].unwrap_or(f64::NAN),
                    soft_skill_score: soft[i].unwrap_or(f64::NAN),
                    work_experience_months: experience[i].unwrap_or(f64::NAN),
                    predicted_placement: placements[i]?,
                    predicted_salary: salary[i],
                })
            })
            .collect();

        Ok(records)
    }
}

/// Apply a FilterSpec to the full dataset. The dataset is left untouched and
/// an empty result is a valid view.
pub fn apply(dataset: &Dataset, spec: &FilterSpec) -> Result<FilteredView> {
    let frame = match spec.predicate() {
        Some(predicate) => dataset.frame().clone().lazy().filter(predicate).collect()?,
        None => dataset.frame().clone(),
    };

    debug!(
        "filter {:?}: {} of {} rows",
        spec,
        frame.height(),
        dataset.len()
    );

    Ok(FilteredView { frame, spec: *spec })
}
