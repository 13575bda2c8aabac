//! Persistence ports for financial records.
//!
//! Date ranges are inclusive on both ends.

use async_trait::async_trait;
use chrono::NaiveDate;
use hornero_shared::AppResult;
use hornero_shared::types::{ExpenseId, IncomeId, InvoiceId};

use super::types::{Expense, Income, Invoice};

/// Expense storage.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Stores a new expense.
    async fn insert(&self, expense: &Expense) -> AppResult<()>;

    /// Looks an expense up by id.
    async fn find_by_id(&self, id: ExpenseId) -> AppResult<Option<Expense>>;

    /// Replaces a stored expense.
    async fn replace(&self, expense: &Expense) -> AppResult<()>;

    /// Deletes an expense. Returns false if it did not exist.
    async fn delete(&self, id: ExpenseId) -> AppResult<bool>;

    /// Paid expenses dated within `[from, to]`, newest first.
    async fn list_paid_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Expense>>;
}

/// Daily income storage.
#[async_trait]
pub trait IncomeRepository: Send + Sync {
    /// Stores a new income.
    async fn insert(&self, income: &Income) -> AppResult<()>;

    /// Looks an income up by id.
    async fn find_by_id(&self, id: IncomeId) -> AppResult<Option<Income>>;

    /// The income of a business day.
    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<Income>>;

    /// Replaces a stored income.
    async fn replace(&self, income: &Income) -> AppResult<()>;

    /// Incomes dated within `[from, to]`, newest first.
    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Income>>;
}

/// Invoice storage.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Stores a new invoice.
    async fn insert(&self, invoice: &Invoice) -> AppResult<()>;

    /// Looks an invoice up by id.
    async fn find_by_id(&self, id: InvoiceId) -> AppResult<Option<Invoice>>;

    /// Looks an invoice up by the supplier's invoice number.
    async fn find_by_numero(&self, numero_factura: &str) -> AppResult<Option<Invoice>>;

    /// Replaces a stored invoice.
    async fn replace(&self, invoice: &Invoice) -> AppResult<()>;

    /// Deletes an invoice. Returns false if it did not exist.
    async fn delete(&self, id: InvoiceId) -> AppResult<bool>;

    /// Unpaid invoices, earliest due date first.
    async fn list_unpaid(&self) -> AppResult<Vec<Invoice>>;
}
