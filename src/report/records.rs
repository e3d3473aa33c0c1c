//! Raw record table and CSV export of a filtered view

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, Table};
use polars::prelude::*;

use super::summary::{header, print_indented};
use crate::pipeline::{FilteredView, Placement};
use crate::utils::{print_info, print_section_header};

/// Rows shown by the console table; the CSV export always writes every row
pub const RECORD_PREVIEW_ROWS: usize = 20;

/// Display text for a salary cell
pub fn format_salary(salary: Option<f64>) -> String {
    match salary {
        Some(value) => format!("{:.2}", value),
        None => "-".to_string(),
    }
}

/// Print the first [`RECORD_PREVIEW_ROWS`] records of a view
pub fn display_records(view: &FilteredView) -> Result<()> {
    print_section_header("RAW DATA");

    let records = view.records().context("Failed to read filtered records")?;
    if records.is_empty() {
        print_info("No records match the current filters");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&[
        "Gender",
        "CGPA",
        "Attendance %",
        "Technical",
        "Soft",
        "Experience (mo)",
        "Placement",
        "Salary (LPA)",
    ]));

    for record in records.iter().take(RECORD_PREVIEW_ROWS) {
        let placement_color = match record.predicted_placement {
            Placement::Placed => Color::Green,
            Placement::NotPlaced => Color::Red,
        };
        table.add_row(vec![
            Cell::new(record.gender.label()),
            Cell::new(format!("{:.2}", record.cgpa)),
            Cell::new(format!("{:.1}", record.attendance_percentage)),
            Cell::new(format!("{:.1}", record.technical_skill_score)),
            Cell::new(format!("{:.1}", record.soft_skill_score)),
            Cell::new(format!("{:.0}", record.work_experience_months)),
            Cell::new(record.predicted_placement.label()).fg(placement_color),
            Cell::new(format_salary(record.predicted_salary)),
        ]);
    }
    print_indented(&table);

    if records.len() > RECORD_PREVIEW_ROWS {
        print_info(&format!(
            "... and {} more record(s); use --export-records for the full table",
            records.len() - RECORD_PREVIEW_ROWS
        ));
    }

    Ok(())
}

/// Write every row of a view, extra columns included, to a CSV file
pub fn export_records(view: &FilteredView, output_path: &Path) -> Result<()> {
    let mut frame = view.frame().clone();

    let mut file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("Failed to write records to {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_salary() {
        assert_eq!(format_salary(Some(6.5)), "6.50");
        assert_eq!(format_salary(None), "-");
    }
}
