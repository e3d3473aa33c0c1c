//! Shared test utilities and fixture generators

#![allow(dead_code)]

use placement_insights::pipeline::{Dataset, Gender, Placement, StudentRecord};
use polars::prelude::*;
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// Build a record with neutral values for the measures a test doesn't care about
pub fn record(gender: Gender, cgpa: f64, placement: Placement, salary: Option<f64>) -> StudentRecord {
    StudentRecord {
        gender,
        cgpa,
        attendance_percentage: 80.0,
        technical_skill_score: 70.0,
        soft_skill_score: 65.0,
        work_experience_months: 6.0,
        predicted_placement: placement,
        predicted_salary: salary,
    }
}

/// The four-record reference scenario:
/// - (male, 5.5, not placed)
/// - (male, 7.2, placed, 6.0)
/// - (female, 9.5, placed, 12.0)
/// - (female, 6.0, not placed)
pub fn scenario_records() -> Vec<StudentRecord> {
    vec![
        record(Gender::Male, 5.5, Placement::NotPlaced, None),
        record(Gender::Male, 7.2, Placement::Placed, Some(6.0)),
        record(Gender::Female, 9.5, Placement::Placed, Some(12.0)),
        record(Gender::Female, 6.0, Placement::NotPlaced, None),
    ]
}

pub fn scenario_dataset() -> Dataset {
    Dataset::from_records(&scenario_records()).unwrap()
}

/// A ten-record dataset with varied measures and known correlations
///
/// - `technical_skill_score` rises with `cgpa`
/// - `soft_skill_score` falls as `cgpa` rises
/// - not-placed rows carry a bogus salary of 999.0 that must never be read
pub fn create_varied_records() -> Vec<StudentRecord> {
    let rows: [(Gender, f64, f64, f64, Placement, f64); 10] = [
        (Gender::Male, 5.0, 60.0, 0.0, Placement::NotPlaced, 999.0),
        (Gender::Female, 5.8, 65.0, 2.0, Placement::NotPlaced, 999.0),
        (Gender::Male, 6.0, 70.0, 3.0, Placement::Placed, 4.0),
        (Gender::Female, 6.5, 72.0, 6.0, Placement::Placed, 5.0),
        (Gender::Male, 7.0, 75.0, 8.0, Placement::Placed, 6.0),
        (Gender::Female, 7.9, 78.0, 12.0, Placement::NotPlaced, 999.0),
        (Gender::Male, 8.4, 85.0, 14.0, Placement::Placed, 9.0),
        (Gender::Female, 8.8, 88.0, 18.0, Placement::Placed, 10.0),
        (Gender::Male, 9.2, 92.0, 20.0, Placement::Placed, 12.0),
        (Gender::Female, 10.0, 97.0, 24.0, Placement::Placed, 14.0),
    ];

    rows.iter()
        .map(|&(gender, cgpa, attendance, experience, placement, salary)| StudentRecord {
            gender,
            cgpa,
            attendance_percentage: attendance,
            technical_skill_score: cgpa * 10.0,
            soft_skill_score: 100.0 - cgpa * 5.0,
            work_experience_months: experience,
            predicted_placement: placement,
            predicted_salary: Some(salary),
        })
        .collect()
}

pub fn varied_dataset() -> Dataset {
    Dataset::from_records(&create_varied_records()).unwrap()
}

/// Raw frame with every required column, codes stored as floats
pub fn create_raw_frame() -> DataFrame {
    df! {
        "student_id" => ["s1", "s2", "s3"],
        "gender" => [0.0f64, 1.0, 1.0],
        "cgpa" => [6.1f64, 7.4, 8.9],
        "attendance_percentage" => [70.0f64, 82.5, 91.0],
        "technical_skill_score" => [55i64, 68, 80],
        "soft_skill_score" => [60i64, 71, 77],
        "work_experience_months" => [0i64, 6, 12],
        "predicted_placement" => [0i64, 1, 1],
        "predicted_salary" => [None, Some(5.5f64), Some(8.25)],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("student_predictions.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("student_predictions.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Create a temporary SQLite database holding `records` in `table`
pub fn create_temp_sqlite(records: &[StudentRecord], table: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("placement.db");

    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE {} (
            id INTEGER PRIMARY KEY,
            gender INTEGER NOT NULL,
            cgpa REAL,
            attendance_percentage REAL,
            technical_skill_score REAL,
            soft_skill_score REAL,
            work_experience_months INTEGER,
            predicted_placement INTEGER NOT NULL,
            predicted_salary REAL
        );",
        table
    ))
    .unwrap();

    for r in records {
        conn.execute(
            &format!(
                "INSERT INTO {} (gender, cgpa, attendance_percentage, technical_skill_score,
                 soft_skill_score, work_experience_months, predicted_placement, predicted_salary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                table
            ),
            rusqlite::params![
                r.gender.code(),
                r.cgpa,
                r.attendance_percentage,
                r.technical_skill_score,
                r.soft_skill_score,
                r.work_experience_months as i64,
                r.predicted_placement.code(),
                r.predicted_salary,
            ],
        )
        .unwrap();
    }

    (temp_dir, db_path)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
