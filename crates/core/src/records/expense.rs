//! Expense records.
//!
//! Row layout of the `gastos` tab:
//! `description | amount_bs | amount_dollars | currency | date | type | sub_type | payment_method | rate | paid`

use std::sync::Arc;

use chrono::NaiveDate;
use hornero_shared::types::{ExpenseId, InvoiceId, UserId};
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::info;

use super::mirror::SheetMirror;
use super::ports::ExpenseRepository;
use super::sheet::{CellValue, ColumnFormat, EXPENSES_SHEET, SpreadsheetClient};
use super::types::{Expense, ExpenseInput};
use crate::currency::resolve_amounts;
use crate::exchange::ExchangeRateService;

/// Expense service.
#[derive(Clone)]
pub struct ExpenseService {
    repo: Arc<dyn ExpenseRepository>,
    mirror: SheetMirror,
    rates: ExchangeRateService,
}

impl ExpenseService {
    /// Creates a new service.
    pub fn new(
        repo: Arc<dyn ExpenseRepository>,
        sheets: Arc<dyn SpreadsheetClient>,
        rates: ExchangeRateService,
    ) -> Self {
        Self {
            repo,
            mirror: SheetMirror::new(sheets),
            rates,
        }
    }

    /// Records an expense: rate, amounts, sheet row, then the local document.
    pub async fn create_expense(&self, input: &ExpenseInput, actor: UserId) -> AppResult<Expense> {
        self.record(input, None, actor).await
    }

    pub(crate) async fn record(
        &self,
        input: &ExpenseInput,
        invoice_id: Option<InvoiceId>,
        actor: UserId,
    ) -> AppResult<Expense> {
        Self::validate(input)?;
        let rate = self.rates.require_rate(input.date).await?.rate;
        let amounts = resolve_amounts(input.amount, input.currency, rate)?;

        let now = self.rates.clock().now();
        let mut expense = Expense {
            id: ExpenseId::new(),
            description: input.description.trim().to_string(),
            amount_bs: amounts.amount_bs,
            amount_dollars: amounts.amount_dollars,
            currency: input.currency,
            date: input.date,
            kind: input.kind.trim().to_string(),
            sub_type: input.sub_type.trim().to_string(),
            payment_method: input.payment_method.trim().to_string(),
            paid: input.paid,
            invoice_id,
            google_row: 0,
            rate,
            created_by: Some(actor),
            created_at: now,
            updated_at: now,
        };

        expense.google_row = self
            .mirror
            .append(EXPENSES_SHEET, &Self::row(&expense), &Self::formats())
            .await?;
        self.repo.insert(&expense).await?;

        info!(
            expense_id = %expense.id,
            row = expense.google_row,
            amount_bs = %expense.amount_bs,
            amount_usd = %expense.amount_dollars,
            "Expense recorded"
        );
        Ok(expense)
    }

    /// Fetches an expense.
    pub async fn get_expense(&self, id: ExpenseId) -> AppResult<Expense> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Expense", id))
    }

    /// Rewrites an expense and its sheet row with the rate of the (new) date.
    pub async fn update_expense(&self, id: ExpenseId, input: &ExpenseInput) -> AppResult<Expense> {
        Self::validate(input)?;
        let current = self.get_expense(id).await?;
        let rate = self.rates.require_rate(input.date).await?.rate;
        let amounts = resolve_amounts(input.amount, input.currency, rate)?;

        let updated = Expense {
            description: input.description.trim().to_string(),
            amount_bs: amounts.amount_bs,
            amount_dollars: amounts.amount_dollars,
            currency: input.currency,
            date: input.date,
            kind: input.kind.trim().to_string(),
            sub_type: input.sub_type.trim().to_string(),
            payment_method: input.payment_method.trim().to_string(),
            paid: input.paid,
            rate,
            updated_at: self.rates.clock().now(),
            ..current
        };

        self.mirror
            .overwrite(EXPENSES_SHEET, updated.google_row, &Self::row(&updated))
            .await?;
        self.repo.replace(&updated).await?;
        info!(expense_id = %id, row = updated.google_row, "Expense updated");
        Ok(updated)
    }

    /// Erases the sheet row, then the local record.
    pub async fn delete_expense(&self, id: ExpenseId) -> AppResult<()> {
        let expense = self.get_expense(id).await?;
        self.mirror.erase(EXPENSES_SHEET, expense.google_row).await?;
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Expense", id));
        }
        info!(expense_id = %id, row = expense.google_row, "Expense deleted");
        Ok(())
    }

    /// Paid expenses dated within `[from, to]`, newest first.
    pub async fn list_paid_expenses(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Expense>> {
        if from > to {
            return Err(AppError::Validation(format!(
                "Invalid range: {from} is after {to}"
            )));
        }
        self.repo.list_paid_between(from, to).await
    }

    fn validate(input: &ExpenseInput) -> AppResult<()> {
        if input.description.trim().is_empty() {
            return Err(AppError::Validation(
                "Expense description is required".to_string(),
            ));
        }
        if input.kind.trim().is_empty() {
            return Err(AppError::Validation("Expense type is required".to_string()));
        }
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Expense amount must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn row(expense: &Expense) -> Vec<CellValue> {
        vec![
            expense.description.clone().into(),
            expense.amount_bs.into(),
            expense.amount_dollars.into(),
            expense.currency.symbol().into(),
            expense.date.into(),
            expense.kind.clone().into(),
            expense.sub_type.clone().into(),
            expense.payment_method.clone().into(),
            expense.rate.into(),
            expense.paid.into(),
        ]
    }

    fn formats() -> [ColumnFormat; 4] {
        [
            ColumnFormat::bolivars('B'),
            ColumnFormat::dollars('C'),
            ColumnFormat::date('E'),
            ColumnFormat::bolivars('I'),
        ]
    }
}
