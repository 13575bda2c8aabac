//! Spreadsheet row contract.
//!
//! Rows are addressed by 1-based index inside a named tab. The client reports
//! failure either as an error or as a missing row / negative acknowledgement;
//! [`super::mirror::SheetMirror`] folds both into `ExternalWriteFailure`.

use async_trait::async_trait;
use chrono::NaiveDate;
use hornero_shared::AppResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tab holding expenses.
pub const EXPENSES_SHEET: &str = "gastos";
/// Tab holding daily incomes.
pub const INCOMES_SHEET: &str = "ingresos";
/// Tab holding supplier invoices.
pub const INVOICES_SHEET: &str = "facturas";

/// Column of the paid flag in the invoices tab.
pub const INVOICE_PAID_COLUMN: char = 'K';

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    /// Plain text.
    Text(String),
    /// Number.
    Number(Decimal),
    /// Checkbox.
    Bool(bool),
    /// Calendar day, written as a serial day number.
    Date(NaiveDate),
    /// Blank cell.
    Empty,
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Number format family of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NumberFormatKind {
    /// Plain number.
    Number,
    /// Currency.
    Currency,
    /// Date.
    Date,
}

/// Display format applied to one column of an appended row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFormat {
    /// Column letter, `'A'..='Z'`.
    pub column: char,
    /// Format family.
    pub kind: NumberFormatKind,
    /// Sheets number-format pattern.
    pub pattern: &'static str,
}

impl ColumnFormat {
    /// Bolívar amount column.
    #[must_use]
    pub const fn bolivars(column: char) -> Self {
        Self {
            column,
            kind: NumberFormatKind::Number,
            pattern: "\"Bs\" #,##0.00",
        }
    }

    /// Dollar amount column.
    #[must_use]
    pub const fn dollars(column: char) -> Self {
        Self {
            column,
            kind: NumberFormatKind::Currency,
            pattern: "$#,##0.00",
        }
    }

    /// Date column.
    #[must_use]
    pub const fn date(column: char) -> Self {
        Self {
            column,
            kind: NumberFormatKind::Date,
            pattern: "yyyy-mm-dd",
        }
    }

    /// Zero-based column index.
    #[must_use]
    pub fn index(&self) -> u32 {
        u32::from(self.column.to_ascii_uppercase()).saturating_sub(u32::from('A'))
    }
}

/// Spreadsheet operations the records depend on.
#[async_trait]
pub trait SpreadsheetClient: Send + Sync {
    /// Appends a row; returns its 1-based index, or `None` if the sheet did not report one.
    async fn append_row(
        &self,
        sheet: &str,
        values: &[CellValue],
        formats: &[ColumnFormat],
    ) -> AppResult<Option<u32>>;

    /// Replaces a whole row starting at column A.
    async fn overwrite_row(&self, sheet: &str, row: u32, values: &[CellValue]) -> AppResult<bool>;

    /// Replaces a single cell.
    async fn patch_cell(
        &self,
        sheet: &str,
        row: u32,
        column: char,
        value: CellValue,
    ) -> AppResult<bool>;

    /// Clears a row's values.
    async fn erase_row(&self, sheet: &str, row: u32) -> AppResult<bool>;
}

/// Days since 1899-12-30, the spreadsheet epoch.
#[must_use]
pub fn serial_date(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days()
}
