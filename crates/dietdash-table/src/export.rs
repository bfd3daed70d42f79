//! Bulk export of a table page to files.
//!
//! Three independent operations over the currently-loaded page slice (never
//! the full result set): a delimited text file, a row-major spreadsheet, and
//! a formatted document. Cells are rendered through the same column
//! accessors the table view uses, so exports always match what is on screen.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_xlsxwriter::Workbook;
use tracing::{debug, error};

use crate::{Cell, Column};

/// A4 page geometry for the document export, in millimetres.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PAGE_MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Errors from export operations.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Creating or flushing an output file failed.
    #[error("export io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The delimited-text writer failed.
    #[error("delimited export failed: {0}")]
    Delimited(#[from] csv::Error),

    /// The spreadsheet writer failed.
    #[error("spreadsheet export failed: {reason}")]
    Spreadsheet { reason: String },

    /// The document writer failed.
    #[error("document export failed: {reason}")]
    Document { reason: String },
}

/// The three export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-delimited text (`.csv`).
    Delimited,
    /// Row-major spreadsheet (`.xlsx`).
    Spreadsheet,
    /// Formatted document (`.pdf`).
    Document,
}

impl ExportFormat {
    /// File extension for the format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Delimited => "csv",
            Self::Spreadsheet => "xlsx",
            Self::Document => "pdf",
        }
    }
}

/// The result of one export operation within [`export_all`].
#[derive(Debug)]
pub struct ExportOutcome {
    pub format: ExportFormat,
    pub result: Result<PathBuf, ExportError>,
}

/// Run all three exports over `rows`, writing `<stem>.{csv,xlsx,pdf}` into
/// `dir`. Each export is independent; a failure in one does not abort the
/// others.
pub fn export_all<T>(
    columns: &[Column<T>],
    rows: &[T],
    dir: &Path,
    stem: &str,
) -> Vec<ExportOutcome> {
    let run = |format: ExportFormat| {
        let path = dir.join(format!("{stem}.{}", format.extension()));
        let result = match format {
            ExportFormat::Delimited => export_delimited(columns, rows, &path),
            ExportFormat::Spreadsheet => export_spreadsheet(columns, rows, &path),
            ExportFormat::Document => export_document(columns, rows, &path, stem),
        };
        match result {
            Ok(()) => {
                debug!(path = %path.display(), rows = rows.len(), "export written");
                ExportOutcome {
                    format,
                    result: Ok(path),
                }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "export failed");
                ExportOutcome {
                    format,
                    result: Err(e),
                }
            }
        }
    };

    vec![
        run(ExportFormat::Spreadsheet),
        run(ExportFormat::Document),
        run(ExportFormat::Delimited),
    ]
}

/// Write a comma-delimited file: one header record, one record per row.
///
/// # Errors
///
/// Returns [`ExportError::Delimited`] or [`ExportError::Io`] on write
/// failure.
pub fn export_delimited<T>(
    columns: &[Column<T>],
    rows: &[T],
    path: &Path,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(columns.iter().map(Column::header))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| c.cell(row).to_string()))?;
    }
    writer.flush().map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Write a row-major spreadsheet with typed cells.
///
/// # Errors
///
/// Returns [`ExportError::Spreadsheet`] on writer failure.
pub fn export_spreadsheet<T>(
    columns: &[Column<T>],
    rows: &[T],
    path: &Path,
) -> Result<(), ExportError> {
    let spreadsheet_err = |reason: String| ExportError::Spreadsheet { reason };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (ci, column) in columns.iter().enumerate() {
        let col = u16::try_from(ci).map_err(|_| spreadsheet_err("too many columns".to_owned()))?;
        worksheet
            .write_string(0, col, column.header())
            .map_err(|e| spreadsheet_err(e.to_string()))?;
    }

    for (ri, row) in rows.iter().enumerate() {
        let out_row = u32::try_from(ri.saturating_add(1))
            .map_err(|_| spreadsheet_err("too many rows".to_owned()))?;
        for (ci, column) in columns.iter().enumerate() {
            let col =
                u16::try_from(ci).map_err(|_| spreadsheet_err("too many columns".to_owned()))?;
            let write_result = match column.cell(row) {
                Cell::Text(s) => worksheet.write_string(out_row, col, s),
                #[allow(clippy::cast_precision_loss)]
                Cell::Int(v) => worksheet.write_number(out_row, col, v as f64),
                Cell::Float(v) => worksheet.write_number(out_row, col, v),
                Cell::Bool(v) => worksheet.write_boolean(out_row, col, v),
                Cell::Empty => continue,
            };
            write_result.map_err(|e| spreadsheet_err(e.to_string()))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| spreadsheet_err(e.to_string()))?;
    Ok(())
}

/// Write a formatted document: a title, a header line, and one line per row,
/// flowing onto additional pages as needed.
///
/// # Errors
///
/// Returns [`ExportError::Document`] or [`ExportError::Io`] on write
/// failure.
pub fn export_document<T>(
    columns: &[Column<T>],
    rows: &[T],
    path: &Path,
    title: &str,
) -> Result<(), ExportError> {
    let document_err = |reason: String| ExportError::Document { reason };

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "table");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| document_err(e.to_string()))?;
    let header_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| document_err(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM;

    layer.use_text(title, 14.0, Mm(PAGE_MARGIN_MM), Mm(y), &header_font);
    y -= LINE_HEIGHT_MM * 1.5;

    let header_line = columns
        .iter()
        .map(Column::header)
        .collect::<Vec<_>>()
        .join("  |  ");
    layer.use_text(header_line, 11.0, Mm(PAGE_MARGIN_MM), Mm(y), &header_font);
    y -= LINE_HEIGHT_MM;

    for row in rows {
        if y < PAGE_MARGIN_MM {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "table");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM;
        }
        let line = columns
            .iter()
            .map(|c| c.cell(row).to_string())
            .collect::<Vec<_>>()
            .join("  |  ");
        layer.use_text(line, 10.0, Mm(PAGE_MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| document_err(e.to_string()))
}
