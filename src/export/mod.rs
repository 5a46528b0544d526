//! Tabular export of the collected records.
//!
//! The default target is an `.xlsx` workbook; a path ending in `.csv` gets a
//! plain CSV file with the same header row instead.

use crate::models::{COLUMNS, PredictionRecord};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

pub const SHEET_NAME: &str = "Predictions";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `records` to `path`, picking the format from the extension.
/// Any existing file is replaced.
pub fn write_table(path: &Path, records: &[PredictionRecord]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let is_csv = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        write_csv(path, records)?;
    } else {
        write_xlsx(path, records)?;
    }

    info!("Wrote {} rows to {:?}", records.len(), path);
    Ok(())
}

pub fn write_xlsx(path: &Path, records: &[PredictionRecord]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, column) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, column.header, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in record.fields().into_iter().enumerate() {
            sheet.write_string(row, col as u16, value)?;
        }
    }

    sheet.autofit();
    workbook.save(path)?;
    Ok(())
}

pub fn write_csv(path: &Path, records: &[PredictionRecord]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS.iter().map(|c| c.header))?;
    for record in records {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;
    Ok(())
}
