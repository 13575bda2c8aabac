//! Spreadsheet phase of the two-phase record writes.

use std::sync::Arc;

use hornero_shared::{AppError, AppResult};
use tracing::error;

use super::sheet::{CellValue, ColumnFormat, SpreadsheetClient};

/// Wraps a [`SpreadsheetClient`] so that every non-success becomes `ExternalWriteFailure`.
#[derive(Clone)]
pub struct SheetMirror {
    client: Arc<dyn SpreadsheetClient>,
}

impl SheetMirror {
    /// Creates a mirror over `client`.
    pub fn new(client: Arc<dyn SpreadsheetClient>) -> Self {
        Self { client }
    }

    /// Appends a row and returns its index.
    pub async fn append(
        &self,
        sheet: &str,
        values: &[CellValue],
        formats: &[ColumnFormat],
    ) -> AppResult<u32> {
        match self.client.append_row(sheet, values, formats).await {
            Ok(Some(row)) if row > 0 => Ok(row),
            Ok(_) => Err(Self::failure(sheet, None, "append returned no row")),
            Err(e) => Err(Self::failure(sheet, None, &e.to_string())),
        }
    }

    /// Overwrites an existing row.
    pub async fn overwrite(&self, sheet: &str, row: u32, values: &[CellValue]) -> AppResult<()> {
        let result = self.client.overwrite_row(sheet, row, values).await;
        Self::acknowledge(sheet, row, "overwrite", result)
    }

    /// Patches one cell of an existing row.
    pub async fn patch(&self, sheet: &str, row: u32, column: char, value: CellValue) -> AppResult<()> {
        let result = self.client.patch_cell(sheet, row, column, value).await;
        Self::acknowledge(sheet, row, "patch", result)
    }

    /// Clears an existing row.
    pub async fn erase(&self, sheet: &str, row: u32) -> AppResult<()> {
        let result = self.client.erase_row(sheet, row).await;
        Self::acknowledge(sheet, row, "erase", result)
    }

    fn acknowledge(sheet: &str, row: u32, op: &str, result: AppResult<bool>) -> AppResult<()> {
        match result {
            Ok(true) => Ok(()),
            Ok(false) => Err(Self::failure(sheet, Some(row), &format!("{op} not acknowledged"))),
            Err(e) => Err(Self::failure(sheet, Some(row), &format!("{op}: {e}"))),
        }
    }

    fn failure(sheet: &str, row: Option<u32>, reason: &str) -> AppError {
        error!(sheet, row, reason, "Spreadsheet write failed");
        match row {
            Some(row) => AppError::ExternalWriteFailure(format!("{sheet} row {row}: {reason}")),
            None => AppError::ExternalWriteFailure(format!("{sheet}: {reason}")),
        }
    }
}
