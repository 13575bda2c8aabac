//! Debt service: loads, mutates through [`DebtLedger`], stores.

use std::collections::BTreeMap;
use std::sync::Arc;

use hornero_shared::types::{DebtId, EmployeeId, PageRequest, PageResponse, UserId};
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::info;

use super::ledger::DebtLedger;
use super::ports::{DebtRepository, EmployeeDirectory};
use super::types::{
    CreateDebtInput, Debt, DebtFilter, DebtItemInput, DebtStatus, DebtTotals, DebtType,
    Employee, EmployeeDebtSummary, IndexedItem, PaymentHistory, UpdateDebtInput,
};
use crate::currency::validate_rate;
use crate::exchange::ExchangeRateService;

/// Debt service.
#[derive(Clone)]
pub struct DebtService {
    debts: Arc<dyn DebtRepository>,
    employees: Arc<dyn EmployeeDirectory>,
    rates: ExchangeRateService,
}

impl DebtService {
    /// Creates a new service.
    pub fn new(
        debts: Arc<dyn DebtRepository>,
        employees: Arc<dyn EmployeeDirectory>,
        rates: ExchangeRateService,
    ) -> Self {
        Self {
            debts,
            employees,
            rates,
        }
    }

    /// Registers a debt for an existing employee.
    ///
    /// `vale` debts get a rate snapshot: the explicit one, or the rate of
    /// `payment_date` (default today).
    pub async fn create_debt(&self, input: CreateDebtInput, actor: UserId) -> AppResult<Debt> {
        self.require_employee(input.employee_id).await?;

        let items = DebtLedger::validate_items(&input.items)?;
        let description = DebtLedger::validate_description(&input.description)?;
        let notes = DebtLedger::validate_notes(&input.notes)?;

        let snapshot = match (input.kind, input.exchange_rate_snapshot) {
            (_, Some(snapshot)) => {
                validate_rate(snapshot.rate)?;
                Some(snapshot)
            }
            (DebtType::Vale, None) => {
                let day = input.payment_date.unwrap_or_else(|| self.rates.clock().today());
                Some(self.rates.rate_for_snapshot(day).await?)
            }
            (DebtType::Standard, None) => None,
        };

        let now = self.rates.clock().now();
        let mut debt = Debt {
            id: DebtId::new(),
            employee_id: input.employee_id,
            kind: input.kind,
            description,
            notes,
            status: DebtStatus::Pending,
            payment_date: input.payment_date,
            total_amount: Decimal::ZERO,
            exchange_rate_snapshot: snapshot,
            created_by: actor,
            items,
            created_at: now,
            updated_at: now,
        };
        DebtLedger::recompute_totals(&mut debt)?;

        self.debts.insert(&debt).await?;
        info!(
            debt_id = %debt.id,
            employee_id = %debt.employee_id,
            kind = ?debt.kind,
            total_usd = %debt.total_amount,
            "Debt created"
        );
        Ok(debt)
    }

    /// Fetches a debt.
    pub async fn get_debt(&self, id: DebtId) -> AppResult<Debt> {
        self.debts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Debt", id))
    }

    /// All debts of an employee, newest first.
    pub async fn list_employee_debts(&self, employee_id: EmployeeId) -> AppResult<Vec<Debt>> {
        self.debts.list_by_employee(employee_id).await
    }

    /// Filtered, paginated debt listing.
    pub async fn list_debts(
        &self,
        filter: &DebtFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Debt>> {
        let (data, total) = self.debts.list(filter, page).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Appends items to a pending debt.
    pub async fn add_items(&self, id: DebtId, items: &[DebtItemInput]) -> AppResult<Debt> {
        let mut debt = self.get_debt(id).await?;
        DebtLedger::add_items(&mut debt, items, self.rates.clock())?;
        self.debts.replace(&debt).await?;
        info!(debt_id = %id, added = items.len(), total_usd = %debt.total_amount, "Debt items added");
        Ok(debt)
    }

    /// Marks items as paid by `actor`.
    pub async fn mark_items_paid(
        &self,
        id: DebtId,
        indexes: &[usize],
        actor: UserId,
    ) -> AppResult<Debt> {
        let mut debt = self.get_debt(id).await?;
        DebtLedger::mark_paid(&mut debt, indexes, actor, self.rates.clock())?;
        self.debts.replace(&debt).await?;
        info!(debt_id = %id, ?indexes, status = %debt.status, "Debt items paid");
        Ok(debt)
    }

    /// Marks items as unpaid.
    pub async fn mark_items_unpaid(&self, id: DebtId, indexes: &[usize]) -> AppResult<Debt> {
        let mut debt = self.get_debt(id).await?;
        DebtLedger::mark_unpaid(&mut debt, indexes, self.rates.clock())?;
        self.debts.replace(&debt).await?;
        info!(debt_id = %id, ?indexes, status = %debt.status, "Debt items unpaid");
        Ok(debt)
    }

    /// Applies a whitelisted patch.
    pub async fn update_debt(&self, id: DebtId, patch: &UpdateDebtInput) -> AppResult<Debt> {
        let mut debt = self.get_debt(id).await?;
        DebtLedger::apply_update(&mut debt, patch, self.rates.clock())?;
        self.debts.replace(&debt).await?;
        info!(debt_id = %id, status = %debt.status, "Debt updated");
        Ok(debt)
    }

    /// Deletes a pending debt.
    pub async fn delete_debt(&self, id: DebtId) -> AppResult<()> {
        let debt = self.get_debt(id).await?;
        DebtLedger::ensure_pending(&debt, "delete")?;
        if !self.debts.delete(id).await? {
            return Err(AppError::not_found("Debt", id));
        }
        info!(debt_id = %id, "Debt deleted");
        Ok(())
    }

    /// Derived totals of a debt.
    #[must_use]
    pub fn totals(debt: &Debt) -> DebtTotals {
        DebtLedger::calculate_totals(debt)
    }

    /// Paid/unpaid breakdown of a debt.
    pub async fn get_payment_history(&self, id: DebtId) -> AppResult<PaymentHistory> {
        let debt = self.get_debt(id).await?;
        let totals = DebtLedger::calculate_totals(&debt);

        let (paid_items, unpaid_items): (Vec<_>, Vec<_>) = debt
            .items
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, item)| IndexedItem { index, item })
            .partition(|entry| entry.item.is_paid);

        Ok(PaymentHistory {
            debt_id: debt.id,
            employee_id: debt.employee_id,
            description: debt.description,
            kind: debt.kind,
            status: debt.status,
            total_amount: debt.total_amount,
            item_count: debt.items.len(),
            paid_count: paid_items.len(),
            unpaid_count: unpaid_items.len(),
            paid_items,
            unpaid_items,
            totals,
            created_at: debt.created_at,
            updated_at: debt.updated_at,
        })
    }

    /// Per-employee totals, ordered by employee name.
    ///
    /// Debts of employees no longer in the directory are skipped.
    pub async fn summarize_by_employee(&self) -> AppResult<Vec<EmployeeDebtSummary>> {
        let debts = self.debts.list_all().await?;
        let employees: BTreeMap<EmployeeId, Employee> = self
            .employees
            .list()
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let mut by_employee: BTreeMap<EmployeeId, EmployeeDebtSummary> = BTreeMap::new();
        for debt in &debts {
            let Some(employee) = employees.get(&debt.employee_id) else {
                continue;
            };
            let entry = by_employee
                .entry(employee.id)
                .or_insert_with(|| EmployeeDebtSummary {
                    employee_id: employee.id,
                    employee_name: employee.name.clone(),
                    position: employee.position.clone(),
                    total_debts: 0,
                    total_amount: Decimal::ZERO,
                    pending_amount: Decimal::ZERO,
                    paid_amount: Decimal::ZERO,
                });

            entry.total_debts += 1;
            if debt.status == DebtStatus::Cancelled {
                continue;
            }
            let totals = DebtLedger::calculate_totals(debt);
            entry.total_amount += totals.original_usd;
            entry.pending_amount += totals.unpaid_usd;
            entry.paid_amount += totals.paid_usd;
        }

        let mut summary: Vec<_> = by_employee.into_values().collect();
        summary.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));
        Ok(summary)
    }

    async fn require_employee(&self, id: EmployeeId) -> AppResult<Employee> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee", id))
    }
}
