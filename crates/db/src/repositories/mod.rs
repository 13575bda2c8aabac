//! Implementations of the `hornero-core` storage ports.

mod debt;
mod expense;
pub mod filters;
mod income;
mod invoice;
mod rate;

pub use debt::{MongoDebtRepository, MongoEmployeeDirectory};
pub use expense::MongoExpenseRepository;
pub use income::MongoIncomeRepository;
pub use invoice::MongoInvoiceRepository;
pub use rate::MongoRateRepository;
