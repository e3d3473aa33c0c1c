//! Student record schema, categorical codes and dataset validation
//!
//! A [`Dataset`] is only ever built from a frame that passed [`Dataset::new`],
//! so every stage downstream can assume the full column set exists, the code
//! columns are Int32 holding 0/1 and the measure columns are Float64.

use std::fmt;

use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{InsightsError, Result};

pub const GENDER: &str = "gender";
pub const CGPA: &str = "cgpa";
pub const ATTENDANCE_PERCENTAGE: &str = "attendance_percentage";
pub const TECHNICAL_SKILL_SCORE: &str = "technical_skill_score";
pub const SOFT_SKILL_SCORE: &str = "soft_skill_score";
pub const WORK_EXPERIENCE_MONTHS: &str = "work_experience_months";
pub const PREDICTED_PLACEMENT: &str = "predicted_placement";
pub const PREDICTED_SALARY: &str = "predicted_salary";

/// Columns holding 0/1 categorical codes
pub const CODE_COLUMNS: [&str; 2] = [GENDER, PREDICTED_PLACEMENT];

/// Columns holding continuous measures
pub const MEASURE_COLUMNS: [&str; 6] = [
    CGPA,
    ATTENDANCE_PERCENTAGE,
    TECHNICAL_SKILL_SCORE,
    SOFT_SKILL_SCORE,
    WORK_EXPERIENCE_MONTHS,
    PREDICTED_SALARY,
];

/// Every column a loaded dataset must provide
pub const REQUIRED_COLUMNS: [&str; 8] = [
    GENDER,
    CGPA,
    ATTENDANCE_PERCENTAGE,
    TECHNICAL_SKILL_SCORE,
    SOFT_SKILL_SCORE,
    WORK_EXPERIENCE_MONTHS,
    PREDICTED_PLACEMENT,
    PREDICTED_SALARY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn code(self) -> i32 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Gender::Female),
            1 => Some(Gender::Male),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    NotPlaced,
    Placed,
}

impl Placement {
    pub const ALL: [Placement; 2] = [Placement::NotPlaced, Placement::Placed];

    pub fn code(self) -> i32 {
        match self {
            Placement::NotPlaced => 0,
            Placement::Placed => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Placement::NotPlaced),
            1 => Some(Placement::Placed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Placement::NotPlaced => "Not Placed",
            Placement::Placed => "Placed",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the prediction dataset.
///
/// Missing measures read back as `NaN`. `predicted_salary` is only
/// meaningful when `predicted_placement` is [`Placement::Placed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub gender: Gender,
    pub cgpa: f64,
    pub attendance_percentage: f64,
    pub technical_skill_score: f64,
    pub soft_skill_score: f64,
    pub work_experience_months: f64,
    pub predicted_placement: Placement,
    pub predicted_salary: Option<f64>,
}

/// A schema-validated prediction dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Validate a raw frame and normalise its column types.
    ///
    /// Fails with `SchemaMismatch` when a required column is absent or not
    /// numeric, and with `InvalidCode` when a code column holds anything
    /// other than exactly 0 or 1. A measure column read as text (a CSV
    /// column whose inferred rows were all blank) is accepted when every
    /// non-null value parses as a number. Extra columns are kept untouched.
    pub fn new(mut frame: DataFrame) -> Result<Self> {
        let available: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for name in REQUIRED_COLUMNS {
            let column = frame.column(name).map_err(|_| InsightsError::SchemaMismatch {
                column: name.to_string(),
                detail: format!("column not found (available: {:?})", available),
            })?;
            let dtype = column.dtype().clone();

            if dtype.is_primitive_numeric() {
                continue;
            }

            let textual = matches!(dtype, DataType::String | DataType::Null);
            if textual && MEASURE_COLUMNS.contains(&name) {
                let parsed = column.strict_cast(&DataType::Float64).map_err(|_| {
                    InsightsError::SchemaMismatch {
                        column: name.to_string(),
                        detail: format!(
                            "expected a numeric column, found {} with non-numeric values",
                            dtype
                        ),
                    }
                })?;
                debug!("parsed text column '{}' as Float64", name);
                frame.with_column(parsed)?;
                continue;
            }

            return Err(InsightsError::SchemaMismatch {
                column: name.to_string(),
                detail: format!("expected a numeric column, found {}", dtype),
            });
        }

        for name in CODE_COLUMNS {
            validate_codes(&frame, name)?;
        }

        let mut casts: Vec<Expr> = CODE_COLUMNS
            .iter()
            .map(|name| col(*name).cast(DataType::Int32))
            .collect();
        casts.extend(
            MEASURE_COLUMNS
                .iter()
                .map(|name| col(*name).cast(DataType::Float64)),
        );

        let frame = frame.lazy().with_columns(casts).collect()?;
        debug!(
            "validated dataset with {} rows and {} columns",
            frame.height(),
            frame.width()
        );

        Ok(Self { frame })
    }

    /// Build a dataset from typed records
    pub fn from_records(records: &[StudentRecord]) -> Result<Self> {
        let frame = df! {
            GENDER => records.iter().map(|r| r.gender.code()).collect::<Vec<i32>>(),
            CGPA => records.iter().map(|r| r.cgpa).collect::<Vec<f64>>(),
            ATTENDANCE_PERCENTAGE => records.iter().map(|r| r.attendance_percentage).collect::<Vec<f64>>(),
            TECHNICAL_SKILL_SCORE => records.iter().map(|r| r.technical_skill_score).collect::<Vec<f64>>(),
            SOFT_SKILL_SCORE => records.iter().map(|r| r.soft_skill_score).collect::<Vec<f64>>(),
            WORK_EXPERIENCE_MONTHS => records.iter().map(|r| r.work_experience_months).collect::<Vec<f64>>(),
            PREDICTED_PLACEMENT => records.iter().map(|r| r.predicted_placement.code()).collect::<Vec<i32>>(),
            PREDICTED_SALARY => records.iter().map(|r| r.predicted_salary).collect::<Vec<Option<f64>>>(),
        }?;

        Self::new(frame)
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
}

/// Reject null or non-0/1 values in a code column. Codes must be exact:
/// the later Int32 cast truncates, so 0.9999 would silently become 0.
fn validate_codes(frame: &DataFrame, name: &str) -> Result<()> {
    let values = frame.column(name)?.cast(&DataType::Float64)?;

    for (row, value) in values.f64()?.into_iter().enumerate() {
        match value {
            Some(v) if v == 0.0 || v == 1.0 => {}
            Some(v) => {
                return Err(InsightsError::InvalidCode {
                    column: name.to_string(),
                    row,
                    value: v.to_string(),
                })
            }
            None => {
                return Err(InsightsError::InvalidCode {
                    column: name.to_string(),
                    row,
                    value: "null".to_string(),
                })
            }
        }
    }

    Ok(())
}

/// Read a validated code column
pub(crate) fn code_values(frame: &DataFrame, name: &str) -> Result<Vec<i32>> {
    let column = frame.column(name)?.cast(&DataType::Int32)?;
    Ok(column.i32()?.into_iter().map(|v| v.unwrap_or(-1)).collect())
}

/// Read any numeric column as nullable floats
pub(crate) fn measure_values(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = frame.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Read predicted salary, masked to `None` on every non-placed row
pub(crate) fn salary_values(frame: &DataFrame) -> Result<Vec<Option<f64>>> {
    let placements = code_values(frame, PREDICTED_PLACEMENT)?;
    let salaries = measure_values(frame, PREDICTED_SALARY)?;

    Ok(placements
        .into_iter()
        .zip(salaries)
        .map(|(placement, salary)| {
            if placement == Placement::Placed.code() {
                salary
            } else {
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_enums() {
        for gender in Gender::ALL {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
        }
        for placement in Placement::ALL {
            assert_eq!(Placement::from_code(placement.code()), Some(placement));
        }
        assert_eq!(Gender::from_code(2), None);
        assert_eq!(Placement::from_code(-1), None);
    }

    #[test]
    fn test_codes_follow_convention() {
        assert_eq!(Gender::Female.code(), 0);
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Placement::NotPlaced.code(), 0);
        assert_eq!(Placement::Placed.code(), 1);
    }

    #[test]
    fn test_salary_masked_for_not_placed_rows() {
        let frame = df! {
            PREDICTED_PLACEMENT => [1i32, 0, 1],
            PREDICTED_SALARY => [Some(5.0f64), Some(99.0), None],
        }
        .unwrap();

        let salaries = salary_values(&frame).unwrap();
        assert_eq!(salaries, vec![Some(5.0), None, None]);
    }
}
