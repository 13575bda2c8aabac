//! Cash-flow queries over stored records.

use std::sync::Arc;

use chrono::NaiveDate;
use hornero_shared::{AppError, AppResult};
use tracing::debug;

use super::report::CashFlowReport;
use super::types::{ExpenseSummary, MonthlyCashFlow};
use crate::records::{ExpenseRepository, IncomeRepository};

/// Cash-flow service.
#[derive(Clone)]
pub struct CashFlowService {
    incomes: Arc<dyn IncomeRepository>,
    expenses: Arc<dyn ExpenseRepository>,
}

impl CashFlowService {
    /// Creates a new service.
    pub fn new(incomes: Arc<dyn IncomeRepository>, expenses: Arc<dyn ExpenseRepository>) -> Self {
        Self { incomes, expenses }
    }

    /// Daily running balance of a month from its incomes and paid expenses.
    pub async fn build_monthly_cash_flow(&self, year: i32, month: u32) -> AppResult<MonthlyCashFlow> {
        let (first, last) = CashFlowReport::month_bounds(year, month)?;
        let incomes = self.incomes.list_between(first, last).await?;
        let expenses = self.expenses.list_paid_between(first, last).await?;
        debug!(
            year,
            month,
            incomes = incomes.len(),
            expenses = expenses.len(),
            "Building monthly cash flow"
        );
        CashFlowReport::build(year, month, &incomes, &expenses)
    }

    /// Totals of the paid expenses dated within `[from, to]`.
    pub async fn expense_summary(&self, from: NaiveDate, to: NaiveDate) -> AppResult<ExpenseSummary> {
        if from > to {
            return Err(AppError::Validation(format!(
                "Invalid range: {from} is after {to}"
            )));
        }
        let expenses = self.expenses.list_paid_between(from, to).await?;
        Ok(CashFlowReport::summarize_expenses(from, to, &expenses))
    }
}
