//! Console rendering of a snapshot

use std::collections::BTreeMap;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{BoxSummary, Correlation, InsightSnapshot, Placement};
use crate::utils::{print_info, print_section_header};

/// Display text for the average salary KPI
pub fn format_avg_salary(avg_salary: Option<f64>) -> String {
    match avg_salary {
        Some(value) => format!("{:.2}", value),
        None => "N/A".to_string(),
    }
}

/// Display text for a correlation cell
pub fn format_correlation(value: f64) -> String {
    if value.is_nan() {
        "undefined".to_string()
    } else {
        format!("{:.2}", value)
    }
}

pub(crate) fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|l| Cell::new(l).add_attribute(Attribute::Bold))
        .collect()
}

pub(crate) fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Print every panel of a snapshot
pub fn display_snapshot(snapshot: &InsightSnapshot) {
    display_kpis(snapshot);
    display_distribution(snapshot);
    display_gender_rates(snapshot);
    display_cgpa_bands(snapshot);
    display_salary_histogram(snapshot);
    display_spreads(snapshot);
    display_correlation(&snapshot.correlation);
}

fn display_kpis(snapshot: &InsightSnapshot) {
    print_section_header("KEY METRICS");

    let kpis = &snapshot.kpis;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Metric", "Value"]));
    table.add_row(vec![Cell::new("🎓 Total Students"), Cell::new(kpis.total_count)]);
    table.add_row(vec![
        Cell::new("✅ Placed"),
        Cell::new(kpis.placed_count).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("❌ Not Placed"),
        Cell::new(kpis.not_placed_count).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("💰 Avg Salary (LPA)"),
        Cell::new(format_avg_salary(kpis.avg_salary))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);
    print_indented(&table);
}

fn display_distribution(snapshot: &InsightSnapshot) {
    print_section_header("PLACEMENT DISTRIBUTION");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Placement", "Count", "Share"]));
    for (placement, count) in &snapshot.placement_distribution {
        let share = snapshot.placement_split.map(|split| match placement {
            Placement::Placed => split.placed_pct,
            Placement::NotPlaced => split.not_placed_pct,
        });
        table.add_row(vec![
            Cell::new(placement.label()),
            Cell::new(count),
            Cell::new(
                share
                    .map(|s| format!("{:.1}%", s))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    print_indented(&table);
}

fn display_gender_rates(snapshot: &InsightSnapshot) {
    print_section_header("PLACEMENT RATE BY GENDER");

    if snapshot.placement_rate_by_gender.is_empty() {
        print_info("No data available for gender placement rate");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Gender", "Placement Rate"]));
    for (gender, rate) in &snapshot.placement_rate_by_gender {
        table.add_row(vec![
            Cell::new(gender.label()),
            Cell::new(format!("{:.1}%", rate * 100.0)),
        ]);
    }
    print_indented(&table);
}

fn display_cgpa_bands(snapshot: &InsightSnapshot) {
    print_section_header("AVG SALARY BY CGPA BAND");

    if snapshot.salary_by_cgpa_band.is_empty() {
        print_info("No placed students to calculate salary by CGPA");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["CGPA Band", "Avg Salary (LPA)"]));
    for (band, salary) in &snapshot.salary_by_cgpa_band {
        table.add_row(vec![Cell::new(band.label()), Cell::new(format!("{:.2}", salary))]);
    }
    print_indented(&table);
}

fn display_salary_histogram(snapshot: &InsightSnapshot) {
    print_section_header("SALARY DISTRIBUTION (LPA)");

    if snapshot.salary_histogram.is_empty() {
        print_info("No placed students available");
        return;
    }

    let peak = snapshot
        .salary_histogram
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0)
        .max(1);

    for bin in &snapshot.salary_histogram {
        let bar = "█".repeat(bin.count * 30 / peak);
        println!(
            "    {:>8.2} - {:<8.2} {} {}",
            bin.lower_bound,
            bin.upper_bound,
            style(bar).cyan(),
            style(bin.count).dim()
        );
    }
}

fn display_spreads(snapshot: &InsightSnapshot) {
    print_section_header("CGPA / ATTENDANCE VS PLACEMENT");

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&[
        "Measure", "Placement", "Count", "Min", "Q1", "Median", "Q3", "Max",
    ]));
    add_spread_rows(&mut table, "CGPA", &snapshot.cgpa_by_placement);
    add_spread_rows(&mut table, "Attendance %", &snapshot.attendance_by_placement);
    print_indented(&table);

    println!(
        "    {} salary/experience point(s), {} technical/soft skill point(s)",
        style(snapshot.salary_vs_experience.len()).yellow(),
        style(snapshot.technical_vs_soft_skill.len()).yellow()
    );
}

fn add_spread_rows(table: &mut Table, measure: &str, spreads: &BTreeMap<Placement, BoxSummary>) {
    for (placement, summary) in spreads {
        table.add_row(vec![
            Cell::new(measure),
            Cell::new(placement.label()),
            Cell::new(summary.count),
            Cell::new(format!("{:.2}", summary.min)),
            Cell::new(format!("{:.2}", summary.q1)),
            Cell::new(format!("{:.2}", summary.median)),
            Cell::new(format!("{:.2}", summary.q3)),
            Cell::new(format!("{:.2}", summary.max)),
        ]);
    }
}

fn display_correlation(correlation: &Correlation) {
    print_section_header("FEATURE CORRELATION");

    let matrix = match correlation {
        Correlation::Matrix(matrix) => matrix,
        Correlation::InsufficientData { .. } => {
            print_info("Not enough numeric columns for correlation matrix");
            return;
        }
    };

    let mut labels: Vec<&str> = vec![""];
    labels.extend(matrix.columns().iter().map(String::as_str));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&labels));
    for (i, name) in matrix.columns().iter().enumerate() {
        let mut row = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        for j in 0..matrix.size() {
            let value = matrix.get(i, j);
            let color = if value.is_nan() {
                Color::DarkGrey
            } else if value.abs() >= 0.7 {
                Color::Red
            } else if value.abs() >= 0.4 {
                Color::Yellow
            } else {
                Color::White
            };
            row.push(Cell::new(format_correlation(value)).fg(color));
        }
        table.add_row(row);
    }
    print_indented(&table);
}
