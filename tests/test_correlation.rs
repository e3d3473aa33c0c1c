//! Unit tests for the correlation stage

use placement_insights::pipeline::{
    apply, correlation_matrix, scatter_points, Correlation, Dataset, FilterSpec,
    DEFAULT_CORRELATION_COLUMNS,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_default_columns_produce_full_matrix() {
    let dataset = common::varied_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &DEFAULT_CORRELATION_COLUMNS).unwrap();
    let matrix = correlation.matrix().expect("expected a matrix");

    assert_eq!(matrix.size(), 7);
    assert_eq!(
        matrix.columns(),
        DEFAULT_CORRELATION_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .as_slice()
    );
}

#[test]
fn test_matrix_is_symmetric_with_unit_diagonal() {
    let dataset = common::varied_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &DEFAULT_CORRELATION_COLUMNS).unwrap();
    let matrix = correlation.matrix().unwrap();

    for i in 0..matrix.size() {
        assert_eq!(matrix.get(i, i), 1.0, "diagonal at {}", i);
        for j in 0..matrix.size() {
            let (a, b) = (matrix.get(i, j), matrix.get(j, i));
            assert!(
                a == b || (a.is_nan() && b.is_nan()),
                "asymmetric at ({}, {}): {} vs {}",
                i,
                j,
                a,
                b
            );
        }
    }
}

#[test]
fn test_known_correlations() {
    let dataset = common::varied_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation =
        correlation_matrix(&view, &["cgpa", "technical_skill_score", "soft_skill_score"]).unwrap();
    let matrix = correlation.matrix().unwrap();

    let tech = matrix.value("cgpa", "technical_skill_score").unwrap();
    let soft = matrix.value("cgpa", "soft_skill_score").unwrap();
    assert!((tech - 1.0).abs() < 1e-9, "got {}", tech);
    assert!((soft + 1.0).abs() < 1e-9, "got {}", soft);
}

#[test]
fn test_salary_correlation_uses_placed_rows_only() {
    // not-placed rows carry a salary of 999.0, which would dominate if read
    let dataset = common::varied_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["cgpa", "predicted_salary"]).unwrap();
    let value = correlation
        .matrix()
        .unwrap()
        .value("cgpa", "predicted_salary")
        .unwrap();

    assert!(value > 0.9, "placed salaries rise with cgpa, got {}", value);
}

#[test]
fn test_zero_variance_is_undefined_not_zero() {
    // every scenario record shares the same attendance
    let dataset = common::scenario_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["cgpa", "attendance_percentage"]).unwrap();
    let matrix = correlation.matrix().unwrap();

    assert_eq!(matrix.get(0, 0), 1.0);
    assert!(matrix.get(1, 1).is_nan());
    assert!(matrix.get(0, 1).is_nan());
    assert!(matrix.get(1, 0).is_nan());
}

#[test]
fn test_requested_order_preserved_and_absent_columns_dropped() {
    let dataset = common::varied_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(
        &view,
        &["soft_skill_score", "shoe_size", "cgpa", "soft_skill_score"],
    )
    .unwrap();

    assert_eq!(
        correlation.matrix().unwrap().columns(),
        &["soft_skill_score".to_string(), "cgpa".to_string()]
    );
}

#[test]
fn test_insufficient_columns() {
    let dataset = common::varied_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["cgpa", "shoe_size"]).unwrap();
    match correlation {
        Correlation::InsufficientData { available } => assert_eq!(available, vec!["cgpa"]),
        Correlation::Matrix(_) => panic!("a single column must not produce a matrix"),
    }

    let none = correlation_matrix(&view, &[]).unwrap();
    assert!(none.matrix().is_none());
}

#[test]
fn test_non_numeric_column_not_usable() {
    let dataset = Dataset::new(common::create_raw_frame()).unwrap();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["student_id", "cgpa"]).unwrap();
    assert!(matches!(correlation, Correlation::InsufficientData { .. }));
}

#[test]
fn test_extra_numeric_column_is_used() {
    let mut frame = common::create_raw_frame();
    frame
        .with_column(polars::prelude::Column::new(
            "backlogs".into(),
            [3i64, 1, 0],
        ))
        .unwrap();
    let dataset = Dataset::new(frame).unwrap();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["cgpa", "backlogs"]).unwrap();
    let value = correlation.matrix().unwrap().value("cgpa", "backlogs").unwrap();
    assert!(value < 0.0);
}

#[test]
fn test_undefined_cells_export_as_null() {
    let dataset = common::scenario_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["cgpa", "attendance_percentage"]).unwrap();
    let json = serde_json::to_value(&correlation).unwrap();

    assert_eq!(json["status"], "matrix");
    assert_eq!(json["values"][0][0], 1.0);
    assert!(json["values"][1][1].is_null());
}

#[test]
fn test_scatter_points_skip_not_placed_salary() {
    let dataset = common::varied_dataset();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let points = scatter_points(&view, "work_experience_months", "predicted_salary").unwrap();

    assert_eq!(points.len(), 7);
    assert!(points.iter().all(|(_, salary)| *salary < 999.0));
}

#[test]
fn test_nan_measure_does_not_fake_variance() {
    // attendance is constant apart from one NaN reading
    let mut records = common::scenario_records();
    records[2].attendance_percentage = f64::NAN;
    let dataset = Dataset::from_records(&records).unwrap();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["cgpa", "attendance_percentage"]).unwrap();
    let matrix = correlation.matrix().unwrap();

    assert_eq!(matrix.get(0, 0), 1.0);
    assert!(matrix.get(1, 1).is_nan());
    assert!(matrix.get(0, 1).is_nan());
}

#[test]
fn test_nan_row_skipped_in_varying_column() {
    let mut records = common::create_varied_records();
    records[4].cgpa = f64::NAN;
    let dataset = Dataset::from_records(&records).unwrap();
    let view = apply(&dataset, &FilterSpec::all()).unwrap();

    let correlation = correlation_matrix(&view, &["cgpa", "attendance_percentage"]).unwrap();
    let matrix = correlation.matrix().unwrap();

    assert_eq!(matrix.get(0, 0), 1.0);
    assert!(matrix.get(0, 1).is_finite());
    assert!(matrix.get(0, 1) > 0.9);
}
