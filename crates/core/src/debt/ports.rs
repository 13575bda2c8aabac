//! Persistence ports for debts and employees.

use async_trait::async_trait;
use hornero_shared::AppResult;
use hornero_shared::types::{DebtId, EmployeeId, PageRequest};

use super::types::{Debt, DebtFilter, Employee};

/// Debt storage.
#[async_trait]
pub trait DebtRepository: Send + Sync {
    /// Stores a new debt.
    async fn insert(&self, debt: &Debt) -> AppResult<()>;

    /// Looks a debt up by id.
    async fn find_by_id(&self, id: DebtId) -> AppResult<Option<Debt>>;

    /// Replaces a stored debt. Fails with `NotFound` if it does not exist.
    async fn replace(&self, debt: &Debt) -> AppResult<()>;

    /// Deletes a debt. Returns false if it did not exist.
    async fn delete(&self, id: DebtId) -> AppResult<bool>;

    /// All debts of an employee, newest first.
    async fn list_by_employee(&self, employee_id: EmployeeId) -> AppResult<Vec<Debt>>;

    /// One page of debts matching `filter`, newest first, plus the total match count.
    async fn list(&self, filter: &DebtFilter, page: PageRequest) -> AppResult<(Vec<Debt>, u64)>;

    /// Every stored debt.
    async fn list_all(&self) -> AppResult<Vec<Debt>>;
}

/// Employee lookup.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Looks an employee up by id.
    async fn find_by_id(&self, id: EmployeeId) -> AppResult<Option<Employee>>;

    /// Looks an employee up by name, ignoring case and surrounding whitespace.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Employee>>;

    /// Every employee.
    async fn list(&self) -> AppResult<Vec<Employee>>;
}
