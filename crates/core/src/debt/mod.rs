//! Employee debts with independently payable line items.
//!
//! A debt's persisted `total_amount` is always the USD value of its unpaid
//! items. Every mutation goes through [`DebtLedger`], which recomputes the
//! total and applies the automatic `pending`/`paid` transition.

pub mod ledger;
pub mod ports;
pub mod service;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use ledger::DebtLedger;
pub use ports::{DebtRepository, EmployeeDirectory};
pub use service::DebtService;
pub use types::*;
