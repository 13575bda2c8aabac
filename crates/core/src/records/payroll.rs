//! Payroll expenses open an employee debt.
//!
//! A payroll expense paid in Bs becomes a `vale`; one paid in USD a `standard`
//! debt. The debt carries one item worth the entered amount.

use std::sync::Arc;

use hornero_shared::types::{Currency, EmployeeId, UserId};
use hornero_shared::{AppError, AppResult};
use tracing::info;

use super::types::Expense;
use crate::debt::{CreateDebtInput, Debt, DebtItemInput, DebtService, DebtType, EmployeeDirectory};

/// Expense category that denotes payroll, compared without case or accents.
const PAYROLL_TYPE: &str = "nomina";

/// Whether an expense category denotes payroll (`"Nómina"`, `"NOMINA"`, ...).
#[must_use]
pub fn is_payroll_type(kind: &str) -> bool {
    let folded: String = kind.trim().chars().map(fold_accent).collect::<String>().to_lowercase();
    folded == PAYROLL_TYPE
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'Á' | 'À' | 'Â' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

/// Who a payroll expense was paid to.
#[derive(Debug, Clone, Default)]
pub struct PayrollTarget {
    /// Employee id, preferred when present.
    pub employee_id: Option<EmployeeId>,
    /// Employee name, looked up when no id is given.
    pub employee_name: Option<String>,
}

/// Creates the debt that tracks a payroll expense.
#[derive(Clone)]
pub struct PayrollRegistrar {
    debts: DebtService,
    employees: Arc<dyn EmployeeDirectory>,
}

impl PayrollRegistrar {
    /// Creates a registrar.
    pub fn new(debts: DebtService, employees: Arc<dyn EmployeeDirectory>) -> Self {
        Self { debts, employees }
    }

    /// Finds the employee a payroll expense belongs to.
    pub async fn resolve_employee(&self, target: &PayrollTarget) -> AppResult<EmployeeId> {
        if let Some(id) = target.employee_id {
            return self
                .employees
                .find_by_id(id)
                .await?
                .map(|e| e.id)
                .ok_or_else(|| AppError::not_found("Employee", id));
        }
        let name = target
            .employee_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                AppError::Validation("Payroll expenses require an employee".to_string())
            })?;
        self.employees
            .find_by_name(name)
            .await?
            .map(|e| e.id)
            .ok_or_else(|| AppError::not_found("Employee", name))
    }

    /// Opens a debt for `expense` if its category is payroll.
    pub async fn register(
        &self,
        expense: &Expense,
        employee_id: EmployeeId,
        notes: String,
        actor: UserId,
    ) -> AppResult<Option<Debt>> {
        if !is_payroll_type(&expense.kind) {
            return Ok(None);
        }

        let concept = match expense.description.trim() {
            "" => "Nómina".to_string(),
            text => text.to_string(),
        };
        let kind = match expense.currency {
            Currency::Bs => DebtType::Vale,
            Currency::Usd => DebtType::Standard,
        };
        let amount = expense.amounts().in_currency(expense.currency);

        let input = CreateDebtInput {
            employee_id,
            kind,
            description: format!("Nómina: {concept}"),
            notes,
            payment_date: Some(expense.date),
            exchange_rate_snapshot: None,
            items: vec![DebtItemInput::new(concept, 1, amount)],
        };
        let debt = self.debts.create_debt(input, actor).await?;
        info!(expense_id = %expense.id, debt_id = %debt.id, "Payroll debt registered");
        Ok(Some(debt))
    }
}
