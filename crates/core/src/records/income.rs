//! Daily income records.
//!
//! There is at most one income per business day. A second till submission for
//! the same day is added onto the existing record and its row is rewritten.
//!
//! Row layout of the `ingresos` tab:
//! `date | efectivo_bs | efectivo_dolares | sitef | punto_externo | pagomovil | biopago |
//! gastos_bs | gastos_dolares | total_sistema | notas | rate`

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use hornero_shared::types::{Currency, IncomeId, UserId};
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::info;

use super::expense::ExpenseService;
use super::mirror::SheetMirror;
use super::payroll::{PayrollRegistrar, PayrollTarget, is_payroll_type};
use super::ports::IncomeRepository;
use super::sheet::{CellValue, ColumnFormat, INCOMES_SHEET, SpreadsheetClient};
use super::types::{Income, IncomeChannels, IncomeInput, IncomeSubmission};
use crate::exchange::ExchangeRateService;

/// Window of [`IncomeService::list_incomes`] when no range is given.
const DEFAULT_LISTING_DAYS: u64 = 31;

/// Income service.
#[derive(Clone)]
pub struct IncomeService {
    repo: Arc<dyn IncomeRepository>,
    expenses: ExpenseService,
    payroll: PayrollRegistrar,
    mirror: SheetMirror,
    rates: ExchangeRateService,
}

impl IncomeService {
    /// Creates a new service.
    pub fn new(
        repo: Arc<dyn IncomeRepository>,
        expenses: ExpenseService,
        payroll: PayrollRegistrar,
        sheets: Arc<dyn SpreadsheetClient>,
        rates: ExchangeRateService,
    ) -> Self {
        Self {
            repo,
            expenses,
            payroll,
            mirror: SheetMirror::new(sheets),
            rates,
        }
    }

    /// Registers a till submission.
    ///
    /// Embedded expenses are recorded first and added to `gastos_bs` or
    /// `gastos_dolares` by their currency; payroll expenses also open a debt.
    /// The result is merged into the day's income if one exists.
    pub async fn submit_income(
        &self,
        input: &IncomeInput,
        actor: UserId,
    ) -> AppResult<IncomeSubmission> {
        Self::validate_channels(&input.channels)?;
        let rate = self.rates.require_rate(input.date).await?.rate;

        // Resolve payroll employees up front so a missing one fails before any write.
        let mut payroll_targets = Vec::with_capacity(input.expenses.len());
        for item in &input.expenses {
            let employee = if is_payroll_type(&item.kind) {
                let target = PayrollTarget {
                    employee_id: item.employee_id,
                    employee_name: item.employee_name.clone(),
                };
                Some(self.payroll.resolve_employee(&target).await?)
            } else {
                None
            };
            payroll_targets.push(employee);
        }

        let mut channels = input.channels;
        let mut created_expenses = Vec::with_capacity(input.expenses.len());
        let mut created_debts = Vec::new();
        for (item, employee) in input.expenses.iter().zip(payroll_targets) {
            let expense = self.expenses.create_expense(item, actor).await?;
            match expense.currency {
                Currency::Bs => channels.gastos_bs += expense.amount_bs,
                Currency::Usd => channels.gastos_dolares += expense.amount_dollars,
            }
            if let Some(employee_id) = employee {
                let notes = format!("Creado desde ingreso {}", input.date);
                if let Some(debt) = self.payroll.register(&expense, employee_id, notes, actor).await? {
                    created_debts.push(debt);
                }
            }
            created_expenses.push(expense);
        }

        let income = match self.repo.find_by_date(input.date).await? {
            Some(existing) => {
                let merged = Income {
                    channels: existing.channels + channels,
                    notas: Self::join_notes(&existing.notas, input.notas.trim()),
                    rate,
                    updated_at: self.rates.clock().now(),
                    ..existing
                };
                self.mirror
                    .overwrite(INCOMES_SHEET, merged.google_row, &Self::row(&merged))
                    .await?;
                self.repo.replace(&merged).await?;
                info!(income_id = %merged.id, date = %merged.date, "Income merged into existing day");
                merged
            }
            None => {
                let now = self.rates.clock().now();
                let mut income = Income {
                    id: IncomeId::new(),
                    date: input.date,
                    channels,
                    notas: input.notas.trim().to_string(),
                    rate,
                    google_row: 0,
                    created_at: now,
                    updated_at: now,
                };
                income.google_row = self
                    .mirror
                    .append(INCOMES_SHEET, &Self::row(&income), &Self::formats())
                    .await?;
                self.repo.insert(&income).await?;
                info!(income_id = %income.id, date = %income.date, row = income.google_row, "Income recorded");
                income
            }
        };

        Ok(IncomeSubmission {
            income,
            created_expenses,
            created_debts,
        })
    }

    /// Fetches an income.
    pub async fn get_income(&self, id: IncomeId) -> AppResult<Income> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Income", id))
    }

    /// Replaces an income's values and rewrites its row.
    ///
    /// Embedded expenses are not accepted here; they are only created by submissions.
    pub async fn update_income(&self, id: IncomeId, input: &IncomeInput) -> AppResult<Income> {
        if !input.expenses.is_empty() {
            return Err(AppError::Validation(
                "Expenses can only be attached when submitting an income".to_string(),
            ));
        }
        Self::validate_channels(&input.channels)?;
        let current = self.get_income(id).await?;

        if input.date != current.date {
            if let Some(other) = self.repo.find_by_date(input.date).await? {
                return Err(AppError::Validation(format!(
                    "Income {} already exists for {}",
                    other.id, input.date
                )));
            }
        }

        let rate = self.rates.require_rate(input.date).await?.rate;
        let updated = Income {
            date: input.date,
            channels: input.channels,
            notas: input.notas.trim().to_string(),
            rate,
            updated_at: self.rates.clock().now(),
            ..current
        };

        self.mirror
            .overwrite(INCOMES_SHEET, updated.google_row, &Self::row(&updated))
            .await?;
        self.repo.replace(&updated).await?;
        info!(income_id = %id, row = updated.google_row, "Income updated");
        Ok(updated)
    }

    /// Incomes within `[from, to]`, newest first. Defaults to the last 31 days.
    pub async fn list_incomes(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Income>> {
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                let today = self.rates.clock().today();
                let from = today
                    .checked_sub_days(Days::new(DEFAULT_LISTING_DAYS))
                    .unwrap_or(today);
                (from, today)
            }
        };
        if from > to {
            return Err(AppError::Validation(format!(
                "Invalid range: {from} is after {to}"
            )));
        }
        self.repo.list_between(from, to).await
    }

    fn validate_channels(channels: &IncomeChannels) -> AppResult<()> {
        let values = [
            channels.efectivo_bs,
            channels.efectivo_dolares,
            channels.sitef,
            channels.punto_externo,
            channels.pagomovil,
            channels.biopago,
            channels.gastos_bs,
            channels.gastos_dolares,
            channels.total_sistema,
        ];
        if values.iter().any(|v| *v < Decimal::ZERO) {
            return Err(AppError::Validation(
                "Income amounts cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn join_notes(existing: &str, new: &str) -> String {
        match (existing.is_empty(), new.is_empty()) {
            (true, _) => new.to_string(),
            (false, true) => existing.to_string(),
            (false, false) => format!("{existing}\n{new}"),
        }
    }

    fn row(income: &Income) -> Vec<CellValue> {
        let c = &income.channels;
        vec![
            income.date.into(),
            c.efectivo_bs.into(),
            c.efectivo_dolares.into(),
            c.sitef.into(),
            c.punto_externo.into(),
            c.pagomovil.into(),
            c.biopago.into(),
            c.gastos_bs.into(),
            c.gastos_dolares.into(),
            c.total_sistema.into(),
            income.notas.clone().into(),
            income.rate.into(),
        ]
    }

    fn formats() -> [ColumnFormat; 11] {
        [
            ColumnFormat::date('A'),
            ColumnFormat::bolivars('B'),
            ColumnFormat::dollars('C'),
            ColumnFormat::bolivars('D'),
            ColumnFormat::bolivars('E'),
            ColumnFormat::bolivars('F'),
            ColumnFormat::bolivars('G'),
            ColumnFormat::bolivars('H'),
            ColumnFormat::bolivars('I'),
            ColumnFormat::dollars('J'),
            ColumnFormat::bolivars('L'),
        ]
    }
}
