//! Core business logic for Hornero.
//!
//! This crate contains the bookkeeping rules of the bakery with ZERO database
//! or HTTP dependencies. Storage, the spreadsheet and the rate source are
//! reached through the port traits declared here.
//!
//! # Modules
//!
//! - `currency` - Bs/USD conversion, rounding and lenient amount parsing
//! - `exchange` - Daily exchange rates, fallback fetch and the business clock
//! - `debt` - Employee debts with independently payable items
//! - `records` - Expenses, incomes and invoices mirrored to spreadsheet rows
//! - `cashflow` - Monthly daily cash flow and expense summaries

pub mod cashflow;
pub mod currency;
pub mod debt;
pub mod exchange;
pub mod records;

#[cfg(test)]
pub(crate) mod testing;
