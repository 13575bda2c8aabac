//! In-memory port implementations and fixtures shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use hornero_shared::types::{
    Currency, DebtId, EmployeeId, ExpenseId, IncomeId, InvoiceId, PageRequest, UserId,
};
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::currency::round2;
use crate::debt::{
    Debt, DebtFilter, DebtItem, DebtRepository, DebtStatus, DebtType, Employee, EmployeeDirectory,
};
use crate::exchange::{Clock, ExchangeRate, FixedClock, RateOrigin, RateRepository};
use crate::records::{
    CellValue, ColumnFormat, Expense, ExpenseRepository, Income, IncomeChannels, IncomeRepository,
    Invoice, InvoiceRepository, SpreadsheetClient,
};

/// 2024-03-15 11:00 in Caracas.
pub fn fixed_clock() -> FixedClock {
    FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 15, 15, 0, 0).unwrap(),
        chrono_tz::America::Caracas,
    )
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A pending debt with the given `(concept, quantity, unit_amount)` items and no snapshot.
pub fn sample_debt(kind: DebtType, items: &[(&str, u32, Decimal)]) -> Debt {
    let now = fixed_clock().now();
    let items: Vec<DebtItem> = items
        .iter()
        .map(|(concept, quantity, unit_amount)| DebtItem {
            concept: (*concept).to_string(),
            quantity: *quantity,
            unit_amount: *unit_amount,
            is_paid: false,
            paid_at: None,
            paid_by: None,
        })
        .collect();
    let total_amount = match kind {
        DebtType::Standard => round2(items.iter().map(DebtItem::subtotal).sum()),
        DebtType::Vale => Decimal::ZERO,
    };
    Debt {
        id: DebtId::new(),
        employee_id: EmployeeId::new(),
        kind,
        description: "Test debt".to_string(),
        notes: String::new(),
        status: DebtStatus::Pending,
        payment_date: None,
        total_amount,
        exchange_rate_snapshot: None,
        created_by: UserId::new(),
        items,
        created_at: now,
        updated_at: now,
    }
}

pub fn employee(name: &str) -> Employee {
    Employee {
        id: EmployeeId::new(),
        name: name.to_string(),
        position: "Panadero".to_string(),
        weekly_salary: Decimal::new(50, 0),
        active: true,
    }
}

/// A paid expense recorded at rate 40.
pub fn sample_expense(date: NaiveDate, payment_method: &str, amount_bs: Decimal, amount_dollars: Decimal) -> Expense {
    let now = fixed_clock().now();
    Expense {
        id: ExpenseId::new(),
        description: "Gasto".to_string(),
        amount_bs,
        amount_dollars,
        currency: Currency::Bs,
        date,
        kind: "Materia prima".to_string(),
        sub_type: String::new(),
        payment_method: payment_method.to_string(),
        paid: true,
        invoice_id: None,
        google_row: 2,
        rate: Decimal::new(40, 0),
        created_by: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_income(date: NaiveDate, channels: IncomeChannels) -> Income {
    let now = fixed_clock().now();
    Income {
        id: IncomeId::new(),
        date,
        channels,
        notas: String::new(),
        rate: Decimal::new(40, 0),
        google_row: 2,
        created_at: now,
        updated_at: now,
    }
}

fn storage_down() -> AppError {
    AppError::Database("storage unavailable".to_string())
}

// ============================================================================
// Rates
// ============================================================================

#[derive(Default)]
pub struct InMemoryRates {
    rates: Mutex<BTreeMap<NaiveDate, ExchangeRate>>,
    failing: AtomicBool,
}

impl InMemoryRates {
    pub fn with_rates(rates: &[(NaiveDate, Decimal)]) -> Self {
        let now = fixed_clock().now();
        let map = rates
            .iter()
            .map(|(date, rate)| (*date, ExchangeRate::new(*date, *rate, RateOrigin::Manual, now)))
            .collect();
        Self {
            rates: Mutex::new(map),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rates.lock().unwrap().len()
    }

    pub fn get(&self, date: NaiveDate) -> Option<ExchangeRate> {
        self.rates.lock().unwrap().get(&date).cloned()
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(storage_down());
        }
        Ok(())
    }
}

#[async_trait]
impl RateRepository for InMemoryRates {
    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<ExchangeRate>> {
        self.check()?;
        Ok(self.get(date))
    }

    async fn find_latest_on_or_before(&self, date: NaiveDate) -> AppResult<Option<ExchangeRate>> {
        self.check()?;
        Ok(self
            .rates
            .lock()
            .unwrap()
            .range(..=date)
            .next_back()
            .map(|(_, r)| r.clone()))
    }

    async fn insert(&self, rate: &ExchangeRate) -> AppResult<()> {
        let mut rates = self.rates.lock().unwrap();
        if rates.contains_key(&rate.date) {
            return Err(AppError::Validation(format!(
                "Exchange rate for {} already exists",
                rate.date
            )));
        }
        rates.insert(rate.date, rate.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, rate: &ExchangeRate) -> AppResult<ExchangeRate> {
        let mut rates = self.rates.lock().unwrap();
        Ok(rates.entry(rate.date).or_insert_with(|| rate.clone()).clone())
    }
}

// ============================================================================
// Debts and employees
// ============================================================================

#[derive(Default)]
pub struct InMemoryDebts {
    debts: Mutex<Vec<Debt>>,
}

impl InMemoryDebts {
    pub fn all(&self) -> Vec<Debt> {
        self.debts.lock().unwrap().clone()
    }

    fn newest_first(mut debts: Vec<Debt>) -> Vec<Debt> {
        debts.reverse();
        debts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debts
    }
}

#[async_trait]
impl DebtRepository for InMemoryDebts {
    async fn insert(&self, debt: &Debt) -> AppResult<()> {
        self.debts.lock().unwrap().push(debt.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: DebtId) -> AppResult<Option<Debt>> {
        Ok(self.debts.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn replace(&self, debt: &Debt) -> AppResult<()> {
        let mut debts = self.debts.lock().unwrap();
        let slot = debts
            .iter_mut()
            .find(|d| d.id == debt.id)
            .ok_or_else(|| AppError::not_found("Debt", debt.id))?;
        *slot = debt.clone();
        Ok(())
    }

    async fn delete(&self, id: DebtId) -> AppResult<bool> {
        let mut debts = self.debts.lock().unwrap();
        let before = debts.len();
        debts.retain(|d| d.id != id);
        Ok(debts.len() != before)
    }

    async fn list_by_employee(&self, employee_id: EmployeeId) -> AppResult<Vec<Debt>> {
        let matching = self
            .all()
            .into_iter()
            .filter(|d| d.employee_id == employee_id)
            .collect();
        Ok(Self::newest_first(matching))
    }

    async fn list(&self, filter: &DebtFilter, page: PageRequest) -> AppResult<(Vec<Debt>, u64)> {
        let matching: Vec<Debt> = self.all().into_iter().filter(|d| filter.matches(d)).collect();
        let total = u64::try_from(matching.len()).unwrap();
        let data = Self::newest_first(matching)
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap())
            .take(usize::try_from(page.limit()).unwrap())
            .collect();
        Ok((data, total))
    }

    async fn list_all(&self) -> AppResult<Vec<Debt>> {
        Ok(self.all())
    }
}

#[derive(Default)]
pub struct InMemoryEmployees {
    employees: Vec<Employee>,
}

impl InMemoryEmployees {
    pub fn with(employees: Vec<Employee>) -> Self {
        Self { employees }
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployees {
    async fn find_by_id(&self, id: EmployeeId) -> AppResult<Option<Employee>> {
        Ok(self.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Employee>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .employees
            .iter()
            .find(|e| e.name.trim().to_lowercase() == wanted)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Employee>> {
        Ok(self.employees.clone())
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Default)]
pub struct InMemoryExpenses {
    expenses: Mutex<HashMap<ExpenseId, Expense>>,
}

impl InMemoryExpenses {
    pub fn with(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Mutex::new(expenses.into_iter().map(|e| (e.id, e)).collect()),
        }
    }

    pub fn all(&self) -> Vec<Expense> {
        self.expenses.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenses {
    async fn insert(&self, expense: &Expense) -> AppResult<()> {
        self.expenses.lock().unwrap().insert(expense.id, expense.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ExpenseId) -> AppResult<Option<Expense>> {
        Ok(self.expenses.lock().unwrap().get(&id).cloned())
    }

    async fn replace(&self, expense: &Expense) -> AppResult<()> {
        self.expenses.lock().unwrap().insert(expense.id, expense.clone());
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> AppResult<bool> {
        Ok(self.expenses.lock().unwrap().remove(&id).is_some())
    }

    async fn list_paid_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Expense>> {
        let mut found: Vec<Expense> = self
            .all()
            .into_iter()
            .filter(|e| e.paid && e.date >= from && e.date <= to)
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }
}

#[derive(Default)]
pub struct InMemoryIncomes {
    incomes: Mutex<HashMap<IncomeId, Income>>,
}

impl InMemoryIncomes {
    pub fn with(incomes: Vec<Income>) -> Self {
        Self {
            incomes: Mutex::new(incomes.into_iter().map(|i| (i.id, i)).collect()),
        }
    }

    pub fn all(&self) -> Vec<Income> {
        self.incomes.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl IncomeRepository for InMemoryIncomes {
    async fn insert(&self, income: &Income) -> AppResult<()> {
        self.incomes.lock().unwrap().insert(income.id, income.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: IncomeId) -> AppResult<Option<Income>> {
        Ok(self.incomes.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<Income>> {
        Ok(self.all().into_iter().find(|i| i.date == date))
    }

    async fn replace(&self, income: &Income) -> AppResult<()> {
        self.incomes.lock().unwrap().insert(income.id, income.clone());
        Ok(())
    }

    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Income>> {
        let mut found: Vec<Income> = self
            .all()
            .into_iter()
            .filter(|i| i.date >= from && i.date <= to)
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }
}

#[derive(Default)]
pub struct InMemoryInvoices {
    invoices: Mutex<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoices {
    pub fn all(&self) -> Vec<Invoice> {
        self.invoices.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoices {
    async fn insert(&self, invoice: &Invoice) -> AppResult<()> {
        self.invoices.lock().unwrap().insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: InvoiceId) -> AppResult<Option<Invoice>> {
        Ok(self.invoices.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_numero(&self, numero_factura: &str) -> AppResult<Option<Invoice>> {
        Ok(self
            .all()
            .into_iter()
            .find(|i| i.numero_factura == numero_factura))
    }

    async fn replace(&self, invoice: &Invoice) -> AppResult<()> {
        self.invoices.lock().unwrap().insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn delete(&self, id: InvoiceId) -> AppResult<bool> {
        Ok(self.invoices.lock().unwrap().remove(&id).is_some())
    }

    async fn list_unpaid(&self) -> AppResult<Vec<Invoice>> {
        let mut found: Vec<Invoice> = self.all().into_iter().filter(|i| !i.paid).collect();
        found.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(found)
    }
}

// ============================================================================
// Spreadsheet
// ============================================================================

/// One call received by [`FakeSheets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCall {
    Append { sheet: String, values: Vec<CellValue> },
    Overwrite { sheet: String, row: u32, values: Vec<CellValue> },
    Patch { sheet: String, row: u32, column: char, value: CellValue },
    Erase { sheet: String, row: u32 },
}

/// How [`FakeSheets`] answers writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetMode {
    /// Every write succeeds.
    #[default]
    Healthy,
    /// Every write returns an error.
    Failing,
    /// Appends report no row and updates are not acknowledged.
    Silent,
}

/// Spreadsheet that numbers appended rows from 2 per tab and records every call.
#[derive(Default)]
pub struct FakeSheets {
    calls: Mutex<Vec<SheetCall>>,
    next_rows: Mutex<HashMap<String, u32>>,
    mode: Mutex<SheetMode>,
}

impl FakeSheets {
    pub fn set_mode(&self, mode: SheetMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SheetCall) -> AppResult<bool> {
        self.calls.lock().unwrap().push(call);
        match *self.mode.lock().unwrap() {
            SheetMode::Healthy => Ok(true),
            SheetMode::Failing => Err(AppError::ExternalService("sheets down".to_string())),
            SheetMode::Silent => Ok(false),
        }
    }
}

#[async_trait]
impl SpreadsheetClient for FakeSheets {
    async fn append_row(
        &self,
        sheet: &str,
        values: &[CellValue],
        _formats: &[ColumnFormat],
    ) -> AppResult<Option<u32>> {
        let acknowledged = self.record(SheetCall::Append {
            sheet: sheet.to_string(),
            values: values.to_vec(),
        })?;
        if !acknowledged {
            return Ok(None);
        }
        let mut rows = self.next_rows.lock().unwrap();
        let row = rows.entry(sheet.to_string()).or_insert(1);
        *row += 1;
        Ok(Some(*row))
    }

    async fn overwrite_row(&self, sheet: &str, row: u32, values: &[CellValue]) -> AppResult<bool> {
        self.record(SheetCall::Overwrite {
            sheet: sheet.to_string(),
            row,
            values: values.to_vec(),
        })
    }

    async fn patch_cell(
        &self,
        sheet: &str,
        row: u32,
        column: char,
        value: CellValue,
    ) -> AppResult<bool> {
        self.record(SheetCall::Patch {
            sheet: sheet.to_string(),
            row,
            column,
            value,
        })
    }

    async fn erase_row(&self, sheet: &str, row: u32) -> AppResult<bool> {
        self.record(SheetCall::Erase {
            sheet: sheet.to_string(),
            row,
        })
    }
}
