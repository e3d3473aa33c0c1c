//! Dataset loaders for flat files (CSV, Parquet) and SQLite databases

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use polars::prelude::*;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::dataset::{Dataset, REQUIRED_COLUMNS};
use crate::error::{InsightsError, Result};

/// Default table holding the prediction rows in a relational source
pub const DEFAULT_TABLE: &str = "student_predictions";

/// Supplies a validated dataset. Read failures surface as
/// `DataUnavailable`, missing columns as `SchemaMismatch`.
pub trait DatasetLoader {
    fn load(&self) -> Result<Dataset>;

    /// Human-readable description of the source
    fn describe(&self) -> String;
}

/// Rows used for CSV schema inference unless configured otherwise
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// Loads CSV or Parquet based on the file extension
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
    infer_schema_length: usize,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }

    /// Rows used for CSV schema inference; 0 scans the whole file
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    fn read_frame(&self) -> PolarsResult<DataFrame> {
        let extension = file_extension(&self.path);
        let lf = match extension.as_str() {
            "csv" => {
                let schema_length = if self.infer_schema_length == 0 {
                    None
                } else {
                    Some(self.infer_schema_length)
                };
                LazyCsvReader::new(&self.path)
                    .with_infer_schema_length(schema_length)
                    .finish()?
            }
            _ => LazyFrame::scan_parquet(&self.path, Default::default())?,
        };
        lf.collect()
    }
}

impl DatasetLoader for FileLoader {
    fn load(&self) -> Result<Dataset> {
        let source = self.describe();
        let extension = file_extension(&self.path);

        if !matches!(extension.as_str(), "csv" | "parquet") {
            return Err(InsightsError::unavailable(
                source,
                format!("unsupported file format '{}'. Supported formats: csv, parquet", extension),
            ));
        }
        if !self.path.is_file() {
            return Err(InsightsError::unavailable(source, "file not found"));
        }

        let frame = self
            .read_frame()
            .map_err(|e| InsightsError::unavailable(source.as_str(), e))?;
        info!("loaded {} rows from {}", frame.height(), source);

        Dataset::new(frame)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Loads the prediction table from a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteLoader {
    path: PathBuf,
    table: String,
}

impl SqliteLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn open(&self) -> Result<Connection> {
        if !self.path.is_file() {
            return Err(InsightsError::unavailable(self.describe(), "database file not found"));
        }
        Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| InsightsError::unavailable(self.describe(), e))
    }

    /// Declared columns of the table, in table order
    fn table_columns(&self, conn: &Connection) -> Result<Vec<TableColumn>> {
        let sql = format!("PRAGMA table_info(\"{}\")", self.table);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| InsightsError::unavailable(self.describe(), e))?;
        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let declared: String = row.get(2)?;
                Ok(TableColumn::new(name, &declared))
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<TableColumn>>>())
            .map_err(|e| InsightsError::unavailable(self.describe(), e))?;

        if columns.is_empty() {
            return Err(InsightsError::unavailable(
                self.describe(),
                format!("table '{}' does not exist", self.table),
            ));
        }
        Ok(columns)
    }
}

/// How a table column is materialised in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone)]
struct TableColumn {
    name: String,
    kind: ColumnKind,
    required: bool,
}

impl TableColumn {
    /// Required columns are always numeric. Other columns follow SQLite type
    /// affinity: TEXT/CHAR/CLOB, BLOB and untyped columns are read as text.
    fn new(name: String, declared: &str) -> Self {
        let required = REQUIRED_COLUMNS.contains(&name.as_str());
        let declared = declared.to_uppercase();
        let textual = ["CHAR", "CLOB", "TEXT", "BLOB"]
            .iter()
            .any(|t| declared.contains(t))
            || declared.trim().is_empty();
        let kind = if required || declared.contains("INT") || !textual {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };

        Self {
            name,
            kind,
            required,
        }
    }
}

enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    fn for_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Numeric => ColumnData::Numeric(Vec::new()),
            ColumnKind::Text => ColumnData::Text(Vec::new()),
        }
    }

    fn into_column(self, name: &str) -> Column {
        match self {
            ColumnData::Numeric(values) => Column::new(name.into(), values),
            ColumnData::Text(values) => Column::new(name.into(), values),
        }
    }
}

fn numeric_value(value: ValueRef<'_>) -> std::result::Result<Option<f64>, String> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i as f64)),
        ValueRef::Real(f) => Ok(Some(f)),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            text.trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("'{}' is not a number", text))
        }
        ValueRef::Blob(_) => Err("blob value".to_string()),
    }
}

fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

impl DatasetLoader for SqliteLoader {
    /// Reads every column of the table, like the flat-file loader keeps every
    /// column of the file. Required columns must hold numbers; a non-numeric
    /// value in an extra numeric column is read as null.
    fn load(&self) -> Result<Dataset> {
        if !is_valid_identifier(&self.table) {
            return Err(InsightsError::InvalidParameter {
                name: "table",
                detail: format!("'{}' is not a plain table name", self.table),
            });
        }

        let conn = self.open()?;
        let columns = self.table_columns(&conn)?;
        for name in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c.name == name) {
                return Err(InsightsError::SchemaMismatch {
                    column: name.to_string(),
                    detail: format!("column not found in table '{}'", self.table),
                });
            }
        }

        let select_list: Vec<String> = columns
            .iter()
            .map(|c| format!("\"{}\"", c.name.replace('"', "\"\"")))
            .collect();
        let sql = format!("SELECT {} FROM \"{}\"", select_list.join(", "), self.table);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| InsightsError::unavailable(self.describe(), e))?;

        let mut data: Vec<ColumnData> = columns
            .iter()
            .map(|c| ColumnData::for_kind(c.kind))
            .collect();
        let mut rows = stmt
            .query([])
            .map_err(|e| InsightsError::unavailable(self.describe(), e))?;
        let mut row_idx = 0usize;
        while let Some(row) = rows
            .next()
            .map_err(|e| InsightsError::unavailable(self.describe(), e))?
        {
            for (idx, (column, values)) in columns.iter().zip(data.iter_mut()).enumerate() {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| InsightsError::unavailable(self.describe(), e))?;
                match values {
                    ColumnData::Numeric(values) => match numeric_value(value) {
                        Ok(v) => values.push(v),
                        Err(detail) if column.required => {
                            return Err(InsightsError::SchemaMismatch {
                                column: column.name.clone(),
                                detail: format!("row {}: {}", row_idx, detail),
                            })
                        }
                        Err(detail) => {
                            warn!(
                                "column '{}' row {}: {}, reading as null",
                                column.name, row_idx, detail
                            );
                            values.push(None);
                        }
                    },
                    ColumnData::Text(values) => values.push(text_value(value)),
                }
            }
            row_idx += 1;
        }

        let frame_columns: Vec<Column> = columns
            .iter()
            .zip(data)
            .map(|(column, values)| values.into_column(&column.name))
            .collect();
        let frame = DataFrame::new(frame_columns)?;
        debug!(
            "read {} rows and {} columns from table '{}'",
            frame.height(),
            frame.width(),
            self.table
        );

        Dataset::new(frame)
    }

    fn describe(&self) -> String {
        format!("{} (table {})", self.path.display(), self.table)
    }
}

/// Pick a loader by extension: `.db`, `.sqlite` and `.sqlite3` read from
/// SQLite, everything else is treated as a flat file. A table name only
/// applies to SQLite and is rejected for flat files.
pub fn loader_for(
    path: &Path,
    table: Option<&str>,
    infer_schema_length: usize,
) -> Result<Box<dyn DatasetLoader>> {
    match file_extension(path).as_str() {
        "db" | "sqlite" | "sqlite3" => {
            let loader = SqliteLoader::new(path);
            let loader: Box<dyn DatasetLoader> = match table {
                Some(t) => Box::new(loader.with_table(t)),
                None => Box::new(loader),
            };
            Ok(loader)
        }
        _ => {
            if let Some(t) = table {
                return Err(InsightsError::InvalidParameter {
                    name: "table",
                    detail: format!(
                        "'{}' only applies to SQLite input, not {}",
                        t,
                        path.display()
                    ),
                });
            }
            Ok(Box::new(
                FileLoader::new(path).with_infer_schema_length(infer_schema_length),
            ))
        }
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
