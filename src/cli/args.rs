//! Command-line argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::{
    loader_for, DatasetLoader, FilterSpec, Gender, Placement, SnapshotOptions,
    DEFAULT_CORRELATION_COLUMNS,
};

/// Placement Insights - Filtered analytics over student placement predictions
#[derive(Parser, Debug)]
#[command(name = "placement-insights")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input dataset (CSV, Parquet, or a SQLite database: .db/.sqlite/.sqlite3)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Table to read when the input is a SQLite database (rejected for CSV/Parquet)
    #[arg(long)]
    pub table: Option<String>,

    /// Gender filter
    #[arg(short, long, value_enum, default_value_t = GenderChoice::All)]
    pub gender: GenderChoice,

    /// Placement status filter
    #[arg(short, long, value_enum, default_value_t = PlacementChoice::All)]
    pub placement: PlacementChoice,

    /// Number of bins for the salary histogram
    #[arg(long, default_value = "10", value_parser = validate_salary_bins)]
    pub salary_bins: usize,

    /// Columns for the correlation matrix (comma-separated).
    /// Defaults to every numeric prediction column.
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Write the computed snapshot to this JSON file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Print the filtered records as a table after the panels
    #[arg(long, default_value = "false")]
    pub show_records: bool,

    /// Write the filtered records to this CSV file
    #[arg(long)]
    pub export_records: Option<PathBuf>,

    /// Prompt for filters repeatedly, recomputing after each change
    #[arg(long, default_value = "false")]
    pub interactive: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

/// Gender filter states
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderChoice {
    All,
    Male,
    Female,
}

impl GenderChoice {
    pub const ALL: [GenderChoice; 3] = [GenderChoice::All, GenderChoice::Male, GenderChoice::Female];

    pub fn to_filter(self) -> Option<Gender> {
        match self {
            GenderChoice::All => None,
            GenderChoice::Male => Some(Gender::Male),
            GenderChoice::Female => Some(Gender::Female),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GenderChoice::All => "All",
            GenderChoice::Male => "Male",
            GenderChoice::Female => "Female",
        }
    }
}

/// Placement status filter states
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlacementChoice {
    All,
    Placed,
    NotPlaced,
}

impl PlacementChoice {
    pub const ALL: [PlacementChoice; 3] = [
        PlacementChoice::All,
        PlacementChoice::Placed,
        PlacementChoice::NotPlaced,
    ];

    pub fn to_filter(self) -> Option<Placement> {
        match self {
            PlacementChoice::All => None,
            PlacementChoice::Placed => Some(Placement::Placed),
            PlacementChoice::NotPlaced => Some(Placement::NotPlaced),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlacementChoice::All => "All",
            PlacementChoice::Placed => "Placed",
            PlacementChoice::NotPlaced => "Not Placed",
        }
    }
}

/// Build the filter for a pair of selections
pub fn filter_spec(gender: GenderChoice, placement: PlacementChoice) -> FilterSpec {
    FilterSpec::all()
        .with_gender(gender.to_filter())
        .with_placement(placement.to_filter())
}

impl Cli {
    pub fn filter_spec(&self) -> FilterSpec {
        filter_spec(self.gender, self.placement)
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        let correlation_columns = if self.columns.is_empty() {
            DEFAULT_CORRELATION_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect()
        } else {
            self.columns.clone()
        };

        SnapshotOptions {
            salary_bins: self.salary_bins,
            correlation_columns,
        }
    }

    /// Loader for the input path, honouring the table name and the CSV
    /// schema inference length
    pub fn loader(&self) -> crate::Result<Box<dyn DatasetLoader>> {
        loader_for(&self.input, self.table.as_deref(), self.infer_schema_length)
    }
}

/// Validator for salary_bins parameter
fn validate_salary_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if value == 0 {
        Err("salary_bins must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
