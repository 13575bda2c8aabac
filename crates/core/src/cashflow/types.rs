//! Cash-flow report types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where money moved, as far as the daily report is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashChannel {
    /// Bank account, in Bs.
    Account,
    /// Bolívar notes.
    CashBs,
    /// Dollar notes.
    CashUsd,
}

impl CashChannel {
    /// Channel an expense was paid through, by its payment method.
    ///
    /// Unknown methods are not part of the cash flow.
    #[must_use]
    pub fn from_payment_method(method: &str) -> Option<Self> {
        match method.trim() {
            "cuentaBs" | "transferencia" => Some(Self::Account),
            "bsEfectivo" => Some(Self::CashBs),
            "dolaresEfectivo" => Some(Self::CashUsd),
            _ => None,
        }
    }
}

/// One day of the monthly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCashFlow {
    /// Calendar day.
    pub date: NaiveDate,
    /// Income through account channels (Sitef, external terminal, mobile, biometric).
    pub income_account: Decimal,
    /// Bs cash income.
    pub income_cash_bs: Decimal,
    /// USD cash income.
    pub income_cash_usd: Decimal,
    /// Expenses paid from the account.
    pub expense_account: Decimal,
    /// Expenses paid in Bs cash.
    pub expense_cash_bs: Decimal,
    /// Expenses paid in USD cash, in USD.
    pub expense_cash_usd: Decimal,
    /// `net_account + net_cash_bs`. USD cash is not included.
    pub net: Decimal,
    /// Account income minus account expenses.
    pub net_account: Decimal,
    /// Bs cash income minus Bs cash expenses.
    pub net_cash_bs: Decimal,
    /// USD cash income minus USD cash expenses.
    pub net_cash_usd: Decimal,
    /// Running `net` since the first of the month.
    pub accumulated: Decimal,
    /// Running `net_account`.
    pub accumulated_account: Decimal,
    /// Running `net_cash_bs`.
    pub accumulated_cash_bs: Decimal,
    /// Running `net_cash_usd`.
    pub accumulated_cash_usd: Decimal,
}

/// Daily cash flow of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCashFlow {
    /// Year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Every day of the month, ascending.
    pub days: Vec<DailyCashFlow>,
}

impl MonthlyCashFlow {
    /// Running totals at the end of the month.
    #[must_use]
    pub fn closing(&self) -> Option<&DailyCashFlow> {
        self.days.last()
    }
}

/// Totals of one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodTotal {
    /// Payment method as recorded; `None` when the expense had none.
    pub payment_method: Option<String>,
    /// Number of expenses.
    pub count: u64,
    /// Sum in Bs.
    pub total_bs: Decimal,
    /// Sum in USD.
    pub total_dollars: Decimal,
}

/// Paid expenses of a date range, totalled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    /// First day, inclusive.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
    /// Number of expenses.
    pub count: u64,
    /// Sum in Bs.
    pub total_bs: Decimal,
    /// Sum in USD.
    pub total_dollars: Decimal,
    /// Per payment method, ordered by method.
    pub by_payment_method: Vec<PaymentMethodTotal>,
}
