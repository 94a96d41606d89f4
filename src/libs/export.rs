//! Spreadsheet export of the filtered catalog.
//!
//! The exporter writes whatever [`Pieces::export_projection`] returns: the
//! fixed export headers followed by one row per matching piece, ordered like
//! the search results. Excel output bolds the header row and auto-fits the
//! columns; CSV and JSON carry the same cells.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use piecekeeper::db::pieces::Pieces;
//! use piecekeeper::libs::export::{ExportFormat, Exporter};
//! use piecekeeper::libs::filter::PieceFilter;
//!
//! let pieces = Pieces::open(std::path::Path::new("ocp_pieces.db"))?;
//! let projection = pieces.export_projection(&PieceFilter::new().statut("Actif"))?;
//! let written = Exporter::new(ExportFormat::Excel, None).export(&projection)?;
//! println!("{} rows", written);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! [`Pieces::export_projection`]: crate::db::pieces::Pieces::export_projection

use crate::db::pieces::ExportProjection;
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported export output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,
    /// Array of objects keyed by export header.
    Json,
    /// `.xlsx` workbook with a single sheet.
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Creates an exporter writing to `output_path`, or to
    /// `pieces_export_<timestamp>.<ext>` in the current directory.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let default_name = format!("pieces_export_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(format!("{}.{}", default_name, format.extension())));

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes the projection and returns the number of data rows written.
    pub fn export(&self, projection: &ExportProjection) -> Result<usize> {
        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        match self.format {
            ExportFormat::Csv => self.export_csv(projection)?,
            ExportFormat::Json => self.export_json(projection)?,
            ExportFormat::Excel => self.export_excel(projection)?,
        }

        debug!("Exported {} rows to {}", projection.len(), self.output_path.display());
        Ok(projection.len())
    }

    fn export_csv(&self, projection: &ExportProjection) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(&projection.headers)?;
        for row in &projection.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn export_json(&self, projection: &ExportProjection) -> Result<()> {
        let objects: Vec<Value> = projection
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = projection
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| (header.to_string(), Value::String(cell.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect();

        let json = serde_json::to_string_pretty(&objects)?;
        File::create(&self.output_path)?.write_all(json.as_bytes())?;
        Ok(())
    }

    fn export_excel(&self, projection: &ExportProjection) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = Format::new().set_bold();

        for (col, header) in projection.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (index, row) in projection.rows.iter().enumerate() {
            let row_num = (index + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                worksheet.write_string(row_num, col as u16, cell)?;
            }
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}
