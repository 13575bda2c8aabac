//! Expense, income and invoice records.

use std::ops::Add;

use chrono::{DateTime, NaiveDate, Utc};
use hornero_shared::types::{Currency, DualAmount, EmployeeId, ExpenseId, IncomeId, InvoiceId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::debt::Debt;

/// A paid or pending expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense id.
    pub id: ExpenseId,
    /// What was paid for.
    pub description: String,
    /// Amount in Bs.
    pub amount_bs: Decimal,
    /// Amount in USD.
    pub amount_dollars: Decimal,
    /// Currency the amount was entered in.
    pub currency: Currency,
    /// Day of the expense.
    pub date: NaiveDate,
    /// Expense category (e.g. `Nómina`, `Materia prima`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Sub-category.
    #[serde(default)]
    pub sub_type: String,
    /// How it was paid (`cuentaBs`, `transferencia`, `bsEfectivo`, `dolaresEfectivo`, ...).
    #[serde(default)]
    pub payment_method: String,
    /// Whether the expense has been paid.
    pub paid: bool,
    /// Invoice this expense settles, if any.
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,
    /// 1-based row in the `gastos` sheet.
    pub google_row: u32,
    /// Rate used for the conversion.
    pub rate: Decimal,
    /// User who registered it.
    #[serde(default)]
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Both amounts of the record.
    #[must_use]
    pub const fn amounts(&self) -> DualAmount {
        DualAmount::new(self.amount_bs, self.amount_dollars)
    }
}

/// Input for creating or updating an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseInput {
    /// What was paid for.
    pub description: String,
    /// Entered amount, in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: Currency,
    /// Day of the expense.
    pub date: NaiveDate,
    /// Expense category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sub-category.
    #[serde(default)]
    pub sub_type: String,
    /// How it was paid.
    #[serde(default)]
    pub payment_method: String,
    /// Whether the expense has been paid.
    #[serde(default = "default_paid")]
    pub paid: bool,
    /// Employee a payroll expense belongs to.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    /// Employee name, used when no id is given.
    #[serde(default)]
    pub employee_name: Option<String>,
}

fn default_paid() -> bool {
    true
}

/// Sales channels and totals of one business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeChannels {
    /// Cash in Bs.
    #[serde(default)]
    pub efectivo_bs: Decimal,
    /// Cash in USD.
    #[serde(default)]
    pub efectivo_dolares: Decimal,
    /// Card terminal (Sitef) in Bs.
    #[serde(default)]
    pub sitef: Decimal,
    /// External card terminal in Bs.
    #[serde(default)]
    pub punto_externo: Decimal,
    /// Mobile payments in Bs.
    #[serde(default)]
    pub pagomovil: Decimal,
    /// Biometric payments in Bs.
    #[serde(default)]
    pub biopago: Decimal,
    /// Expenses paid from the till, in Bs.
    #[serde(default)]
    pub gastos_bs: Decimal,
    /// Expenses paid from the till, in USD.
    #[serde(default)]
    pub gastos_dolares: Decimal,
    /// Total reported by the point-of-sale system.
    #[serde(default)]
    pub total_sistema: Decimal,
}

impl IncomeChannels {
    /// Bs received through account-based channels.
    #[must_use]
    pub fn account_total(&self) -> Decimal {
        self.sitef + self.punto_externo + self.pagomovil + self.biopago
    }
}

impl Add for IncomeChannels {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            efectivo_bs: self.efectivo_bs + rhs.efectivo_bs,
            efectivo_dolares: self.efectivo_dolares + rhs.efectivo_dolares,
            sitef: self.sitef + rhs.sitef,
            punto_externo: self.punto_externo + rhs.punto_externo,
            pagomovil: self.pagomovil + rhs.pagomovil,
            biopago: self.biopago + rhs.biopago,
            gastos_bs: self.gastos_bs + rhs.gastos_bs,
            gastos_dolares: self.gastos_dolares + rhs.gastos_dolares,
            total_sistema: self.total_sistema + rhs.total_sistema,
        }
    }
}

/// The single income record of a business day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    /// Income id.
    pub id: IncomeId,
    /// Business day. Unique.
    pub date: NaiveDate,
    /// Channel amounts.
    pub channels: IncomeChannels,
    /// Notes, one submission per line.
    #[serde(default)]
    pub notas: String,
    /// Rate of the day.
    pub rate: Decimal,
    /// 1-based row in the `ingresos` sheet.
    pub google_row: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A till submission for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeInput {
    /// Business day.
    pub date: NaiveDate,
    /// Channel amounts.
    #[serde(default)]
    pub channels: IncomeChannels,
    /// Notes.
    #[serde(default)]
    pub notas: String,
    /// Expenses paid from the till; each becomes its own expense record.
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,
}

/// Everything a till submission produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSubmission {
    /// The day's income record after the submission.
    pub income: Income,
    /// Expenses created from the submission.
    pub created_expenses: Vec<Expense>,
    /// Payroll debts created from those expenses.
    pub created_debts: Vec<Debt>,
}

/// A supplier invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice id.
    pub id: InvoiceId,
    /// Supplier name.
    pub supplier: String,
    /// Supplier's invoice number. Unique.
    pub numero_factura: String,
    /// `"{supplier} #{numero_factura}"`.
    pub description: String,
    /// Day the invoice was registered.
    pub date: NaiveDate,
    /// Day payment is due.
    pub due_date: NaiveDate,
    /// Amount in Bs.
    pub amount_bs: Decimal,
    /// Amount in USD.
    pub amount_dollars: Decimal,
    /// Currency the amount was entered in.
    pub currency: Currency,
    /// Expense category the invoice will be booked under.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sub-category.
    #[serde(default)]
    pub sub_type: String,
    /// Planned payment method.
    #[serde(default)]
    pub payment_method: String,
    /// Whether the invoice has been paid.
    pub paid: bool,
    /// 1-based row in the `facturas` sheet.
    pub google_row: u32,
    /// Rate of the registration day.
    pub rate: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Builds the invoice description.
    #[must_use]
    pub fn describe(supplier: &str, numero_factura: &str) -> String {
        format!("{supplier} #{numero_factura}")
    }

    /// The amount in the currency it was entered in.
    #[must_use]
    pub const fn entered_amount(&self) -> Decimal {
        DualAmount::new(self.amount_bs, self.amount_dollars).in_currency(self.currency)
    }
}

/// Input for creating or updating an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
    /// Supplier name.
    pub supplier: String,
    /// Supplier's invoice number.
    pub numero_factura: String,
    /// Day payment is due.
    pub due_date: NaiveDate,
    /// Entered amount, in `currency`.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: Currency,
    /// Expense category.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sub-category.
    #[serde(default)]
    pub sub_type: String,
    /// Planned payment method.
    #[serde(default)]
    pub payment_method: String,
}

/// Input for paying an invoice with a new expense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayInvoiceInput {
    /// Day of payment; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// How it was paid; defaults to the invoice's planned method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Expense category; defaults to the invoice's.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Sub-category; defaults to the invoice's.
    #[serde(default)]
    pub sub_type: Option<String>,
    /// Employee for payroll invoices.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    /// Employee name, used when no id is given.
    #[serde(default)]
    pub employee_name: Option<String>,
}

/// Result of paying an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayment {
    /// The invoice, now paid.
    pub invoice: Invoice,
    /// The expense that settles it.
    pub expense: Expense,
    /// Payroll debt, for payroll invoices.
    pub debt: Option<Debt>,
}
