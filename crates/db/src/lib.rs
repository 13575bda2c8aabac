//! MongoDB persistence for Hornero.
//!
//! This crate provides:
//! - [`MongoStore`], the connection and index setup
//! - Document shapes for every stored entity
//! - Implementations of the repository traits declared in `hornero-core`

pub mod documents;
pub mod error;
pub mod repositories;
pub mod store;

pub use repositories::{
    MongoDebtRepository, MongoEmployeeDirectory, MongoExpenseRepository, MongoIncomeRepository,
    MongoInvoiceRepository, MongoRateRepository,
};
pub use store::MongoStore;
