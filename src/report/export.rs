//! Snapshot export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::InsightSnapshot;

/// Metadata about the export run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (ISO 8601 format)
    pub timestamp: String,
    pub version: String,
    /// Dataset source description
    pub source: String,
    pub record_count: usize,
}

/// Complete snapshot export with metadata
#[derive(Serialize)]
pub struct SnapshotExport<'a> {
    pub metadata: ExportMetadata,
    pub snapshot: &'a InsightSnapshot,
}

impl<'a> SnapshotExport<'a> {
    pub fn new(snapshot: &'a InsightSnapshot, source: &str, record_count: usize) -> Self {
        Self {
            metadata: ExportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                source: source.to_string(),
                record_count,
            },
            snapshot,
        }
    }
}

/// Export a snapshot to a pretty-printed JSON file.
///
/// Undefined correlation cells are written as `null`.
pub fn export_snapshot(
    snapshot: &InsightSnapshot,
    source: &str,
    record_count: usize,
    output_path: &Path,
) -> Result<()> {
    let export = SnapshotExport::new(snapshot, source, record_count);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize snapshot to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write snapshot to {}", output_path.display()))?;

    Ok(())
}
