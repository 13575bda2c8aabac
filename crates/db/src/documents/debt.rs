use chrono::{DateTime, NaiveDate, Utc};
use hornero_core::debt::{Debt, DebtItem, DebtStatus, DebtType, Employee};
use hornero_core::exchange::RateSnapshot;
use hornero_shared::AppResult;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{parse_id, parse_opt_id};

/// An employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub weekly_salary: Decimal,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl From<&Employee> for EmployeeDocument {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.to_string(),
            name: e.name.clone(),
            position: e.position.clone(),
            weekly_salary: e.weekly_salary,
            active: e.active,
        }
    }
}

impl TryFrom<EmployeeDocument> for Employee {
    type Error = hornero_shared::AppError;

    fn try_from(doc: EmployeeDocument) -> AppResult<Self> {
        Ok(Self {
            id: parse_id("employee id", &doc.id)?,
            name: doc.name,
            position: doc.position,
            weekly_salary: doc.weekly_salary,
            active: doc.active,
        })
    }
}

/// A debt line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtItemDocument {
    pub concept: String,
    pub quantity: u32,
    pub unit_amount: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid_by: Option<String>,
}

/// An employee debt with its items embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_id: String,
    #[serde(rename = "type")]
    pub kind: DebtType,
    pub description: String,
    #[serde(default)]
    pub notes: String,
    pub status: DebtStatus,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub exchange_rate_snapshot: Option<RateSnapshot>,
    pub created_by: String,
    pub items: Vec<DebtItemDocument>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Debt> for DebtDocument {
    fn from(debt: &Debt) -> Self {
        Self {
            id: debt.id.to_string(),
            employee_id: debt.employee_id.to_string(),
            kind: debt.kind,
            description: debt.description.clone(),
            notes: debt.notes.clone(),
            status: debt.status,
            payment_date: debt.payment_date,
            total_amount: debt.total_amount,
            exchange_rate_snapshot: debt.exchange_rate_snapshot,
            created_by: debt.created_by.to_string(),
            items: debt
                .items
                .iter()
                .map(|item| DebtItemDocument {
                    concept: item.concept.clone(),
                    quantity: item.quantity,
                    unit_amount: item.unit_amount,
                    is_paid: item.is_paid,
                    paid_at: item.paid_at,
                    paid_by: item.paid_by.map(|u| u.to_string()),
                })
                .collect(),
            created_at: debt.created_at,
            updated_at: debt.updated_at,
        }
    }
}

impl TryFrom<DebtDocument> for Debt {
    type Error = hornero_shared::AppError;

    fn try_from(doc: DebtDocument) -> AppResult<Self> {
        let items = doc
            .items
            .into_iter()
            .map(|item| {
                Ok(DebtItem {
                    concept: item.concept,
                    quantity: item.quantity,
                    unit_amount: item.unit_amount,
                    is_paid: item.is_paid,
                    paid_at: item.paid_at,
                    paid_by: parse_opt_id("paid_by", item.paid_by.as_deref())?,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            id: parse_id("debt id", &doc.id)?,
            employee_id: parse_id("employee_id", &doc.employee_id)?,
            kind: doc.kind,
            description: doc.description,
            notes: doc.notes,
            status: doc.status,
            payment_date: doc.payment_date,
            total_amount: doc.total_amount,
            exchange_rate_snapshot: doc.exchange_rate_snapshot,
            created_by: parse_id("created_by", &doc.created_by)?,
            items,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}
