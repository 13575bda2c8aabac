//! Monthly cash flow and expense summaries.
//!
//! Reads stored incomes and paid expenses; never writes.

pub mod report;
pub mod service;
pub mod types;


pub use report::CashFlowReport;
pub use service::CashFlowService;
pub use types::*;
