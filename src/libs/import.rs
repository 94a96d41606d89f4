//! One-time bulk load of the legacy spreadsheet.
//!
//! The legacy catalog was kept in a spreadsheet with fixed column headers
//! (see [`PieceField::export_label`]). Saved as CSV, it can be loaded into an
//! empty store exactly once: after the first attempt a marker file is
//! written and later runs do nothing, whether or not rows were imported.
//!
//! Files saved by older spreadsheet tools are often Windows-1252 rather than
//! UTF-8, and use `;` as separator in French locales. Both are detected.

use crate::db::pieces::Pieces;
use crate::libs::piece::{PieceData, PieceField};
use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MARKER_FILE_NAME: &str = "migration_done.flag";

const MARKER_CONTENT: &str = "done";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    /// Rows were read and inserted.
    Imported,
    /// The store already held pieces; nothing was read.
    StoreNotEmpty,
    /// The marker exists from an earlier run; nothing was done.
    AlreadyDone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub status: ImportStatus,
    pub imported: usize,
    /// Rows without an Article.
    pub skipped: usize,
}

impl ImportReport {
    fn without_rows(status: ImportStatus) -> Self {
        Self {
            status,
            imported: 0,
            skipped: 0,
        }
    }
}

pub struct LegacyImporter {
    marker_path: PathBuf,
}

impl LegacyImporter {
    pub fn new(marker_path: impl Into<PathBuf>) -> Self {
        Self {
            marker_path: marker_path.into(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.marker_path.exists()
    }

    /// Imports `source` into `pieces` if this has not been done before and the
    /// store is empty. Rows go in as one transaction, so a failed import leaves
    /// the store empty. The marker is written on every path except a failure.
    pub fn run(&self, pieces: &mut Pieces, source: &Path) -> Result<ImportReport> {
        if self.is_done() {
            debug!("Legacy import marker found at {}", self.marker_path.display());
            return Ok(ImportReport::without_rows(ImportStatus::AlreadyDone));
        }

        if !pieces.is_empty()? {
            self.write_marker()?;
            return Ok(ImportReport::without_rows(ImportStatus::StoreNotEmpty));
        }

        let (rows, without_article): (Vec<PieceData>, Vec<PieceData>) =
            read_rows(source)?.into_iter().partition(PieceData::has_article);
        let report = ImportReport {
            status: ImportStatus::Imported,
            imported: pieces.insert_all(&rows)?,
            skipped: without_article.len(),
        };

        self.write_marker()?;
        info!(
            "Legacy import from {}: {} imported, {} skipped",
            source.display(),
            report.imported,
            report.skipped
        );
        Ok(report)
    }

    fn write_marker(&self) -> Result<()> {
        if let Some(parent) = self.marker_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.marker_path, MARKER_CONTENT)
            .with_context(|| format!("Failed to write import marker {}", self.marker_path.display()))?;
        Ok(())
    }
}

/// Reads every data row of a legacy CSV file. Unknown columns are ignored
/// and missing ones read as empty.
pub fn read_rows(source: &Path) -> Result<Vec<PieceData>> {
    let bytes = fs::read(source).with_context(|| format!("Failed to read {}", source.display()))?;
    let text = decode(&bytes);
    let delimiter = detect_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(text.as_bytes());

    let columns: Vec<Option<PieceField>> = reader.headers()?.iter().map(PieceField::from_export_label).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut data = PieceData::default();
        for (field, cell) in columns.iter().zip(record.iter()) {
            if let Some(field) = field {
                *field.value_mut(&mut data) = cell.to_string();
            }
        }
        rows.push(data);
    }
    Ok(rows)
}

/// UTF-8 (optional BOM) when valid, Windows-1252 otherwise.
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}
