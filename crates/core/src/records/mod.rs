//! Financial records mirrored 1:1 to spreadsheet rows.
//!
//! Writes follow a two-phase, non-atomic protocol: the spreadsheet is mutated
//! first and the local document is written only after the sheet acknowledged.
//! A crash between the two phases leaves a sheet row without a local record,
//! never the reverse.

pub mod expense;
pub mod income;
pub mod invoice;
pub mod mirror;
pub mod payroll;
pub mod ports;
pub mod sheet;
pub mod types;


pub use expense::ExpenseService;
pub use income::IncomeService;
pub use invoice::InvoiceService;
pub use payroll::{PayrollRegistrar, PayrollTarget, is_payroll_type};
pub use ports::{ExpenseRepository, IncomeRepository, InvoiceRepository};
pub use sheet::{CellValue, ColumnFormat, NumberFormatKind, SpreadsheetClient, serial_date};
pub use types::*;
