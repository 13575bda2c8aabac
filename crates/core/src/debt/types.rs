//! Debt domain types.

use chrono::{DateTime, NaiveDate, Utc};
use hornero_shared::types::{Currency, DebtId, EmployeeId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::exchange::RateSnapshot;

/// Denomination of a debt's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtType {
    /// Items priced in USD.
    #[default]
    Standard,
    /// Cash advance; items priced in Bs and converted with the debt's rate snapshot.
    Vale,
}

impl DebtType {
    /// Currency the item unit amounts are expressed in.
    #[must_use]
    pub const fn item_currency(self) -> Currency {
        match self {
            Self::Standard => Currency::Usd,
            Self::Vale => Currency::Bs,
        }
    }
}

/// Debt lifecycle status.
///
/// ```text
/// pending ──(all items paid)──> paid
/// paid ──(an item un-paid)──> pending
/// pending ──> overdue ──> paid
/// pending | paid | overdue ──> cancelled   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    /// Open, accepts new items.
    #[default]
    Pending,
    /// Every item paid.
    Paid,
    /// Flagged late by hand.
    Overdue,
    /// Void. No further changes.
    Cancelled,
}

impl DebtStatus {
    /// Whether a manual status change from `self` to `next` is allowed.
    ///
    /// `paid -> pending` only happens automatically when an item is un-paid.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Overdue | Self::Cancelled)
                | (Self::Overdue, Self::Paid | Self::Cancelled)
                | (Self::Paid, Self::Cancelled)
        )
    }

    /// Returns the lowercase status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtItem {
    /// What was lent or advanced.
    pub concept: String,
    /// Number of units, at least 1.
    pub quantity: u32,
    /// Price per unit in the debt's item currency.
    pub unit_amount: Decimal,
    /// Whether this line has been settled.
    #[serde(default)]
    pub is_paid: bool,
    /// When it was settled.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    /// Who registered the payment.
    #[serde(default)]
    pub paid_by: Option<UserId>,
}

impl DebtItem {
    /// `quantity * unit_amount` in the item currency.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_amount * Decimal::from(self.quantity)
    }
}

/// An employee debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    /// Debt id.
    pub id: DebtId,
    /// Employee who owes.
    pub employee_id: EmployeeId,
    /// Item denomination.
    #[serde(rename = "type")]
    pub kind: DebtType,
    /// Short description.
    pub description: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Lifecycle status.
    pub status: DebtStatus,
    /// Day the debt was (or is to be) settled.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// USD value of unpaid items. Derived; see [`crate::debt::DebtLedger::recompute_totals`].
    pub total_amount: Decimal,
    /// Rate used for Bs conversions. Always present on `vale` debts.
    #[serde(default)]
    pub exchange_rate_snapshot: Option<RateSnapshot>,
    /// User who registered the debt.
    pub created_by: UserId,
    /// Line items.
    pub items: Vec<DebtItem>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Item as submitted by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtItemInput {
    /// What was lent or advanced.
    pub concept: String,
    /// Number of units.
    pub quantity: i64,
    /// Price per unit in the debt's item currency.
    pub unit_amount: Decimal,
}

impl DebtItemInput {
    /// Creates an item input.
    pub fn new(concept: impl Into<String>, quantity: i64, unit_amount: Decimal) -> Self {
        Self {
            concept: concept.into(),
            quantity,
            unit_amount,
        }
    }
}

/// Input for creating a debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDebtInput {
    /// Employee who owes.
    pub employee_id: EmployeeId,
    /// Item denomination.
    #[serde(rename = "type", default)]
    pub kind: DebtType,
    /// Short description.
    pub description: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Optional settlement day; also the day used to resolve a `vale` rate.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// Explicit rate snapshot; resolved automatically for `vale` when absent.
    #[serde(default)]
    pub exchange_rate_snapshot: Option<RateSnapshot>,
    /// At least one item.
    pub items: Vec<DebtItemInput>,
}

/// Whitelisted patch for [`crate::debt::DebtService::update_debt`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDebtInput {
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Requested status.
    #[serde(default)]
    pub status: Option<DebtStatus>,
    /// Rate snapshot; only settable while the debt has none, or on `standard` debts.
    #[serde(default)]
    pub exchange_rate_snapshot: Option<RateSnapshot>,
}

/// Totals derived from a debt's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtTotals {
    /// USD value of unpaid items.
    pub unpaid_usd: Decimal,
    /// Bs value of unpaid items (0 for `standard` debts without a snapshot).
    pub unpaid_bs: Decimal,
    /// USD value of paid items.
    pub paid_usd: Decimal,
    /// Bs value of paid items (0 for `standard` debts without a snapshot).
    pub paid_bs: Decimal,
    /// USD value of all items, as if nothing had been paid.
    pub original_usd: Decimal,
    /// Paid items over all items, rounded to a whole percent.
    pub payment_percentage: u32,
    /// True when there is at least one item and every item is paid.
    pub is_fully_paid: bool,
}

/// A debt item tagged with its position in the debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedItem {
    /// Zero-based index inside `Debt::items`.
    pub index: usize,
    /// The item.
    pub item: DebtItem,
}

/// Paid/unpaid breakdown of a debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentHistory {
    /// Debt id.
    pub debt_id: DebtId,
    /// Employee who owes.
    pub employee_id: EmployeeId,
    /// Debt description.
    pub description: String,
    /// Item denomination.
    pub kind: DebtType,
    /// Current status.
    pub status: DebtStatus,
    /// Persisted unpaid USD total.
    pub total_amount: Decimal,
    /// Settled items.
    pub paid_items: Vec<IndexedItem>,
    /// Outstanding items.
    pub unpaid_items: Vec<IndexedItem>,
    /// Number of items.
    pub item_count: usize,
    /// Number of settled items.
    pub paid_count: usize,
    /// Number of outstanding items.
    pub unpaid_count: usize,
    /// Derived totals.
    pub totals: DebtTotals,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Per-employee aggregate over all of an employee's debts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDebtSummary {
    /// Employee id.
    pub employee_id: EmployeeId,
    /// Employee name.
    pub employee_name: String,
    /// Employee position.
    pub position: String,
    /// Number of debts.
    pub total_debts: u64,
    /// USD value of every item ever registered (excluding cancelled debts).
    pub total_amount: Decimal,
    /// USD still owed on non-cancelled debts.
    pub pending_amount: Decimal,
    /// USD already paid back.
    pub paid_amount: Decimal,
}

/// Filter for [`crate::debt::DebtRepository::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtFilter {
    /// Only debts with this status.
    #[serde(default)]
    pub status: Option<DebtStatus>,
    /// Only debts of this employee.
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    /// Created at or after this instant.
    #[serde(default)]
    pub created_from: Option<DateTime<Utc>>,
    /// Created at or before this instant.
    #[serde(default)]
    pub created_to: Option<DateTime<Utc>>,
}

impl DebtFilter {
    /// In-memory evaluation of the filter.
    #[must_use]
    pub fn matches(&self, debt: &Debt) -> bool {
        self.status.is_none_or(|s| debt.status == s)
            && self.employee_id.is_none_or(|e| debt.employee_id == e)
            && self.created_from.is_none_or(|from| debt.created_at >= from)
            && self.created_to.is_none_or(|to| debt.created_at <= to)
    }
}

/// Employee as seen by the debt ledger and payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee id.
    pub id: EmployeeId,
    /// Full name.
    pub name: String,
    /// Job position.
    pub position: String,
    /// Weekly salary in USD.
    pub weekly_salary: Decimal,
    /// Whether the employee is currently on payroll.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
