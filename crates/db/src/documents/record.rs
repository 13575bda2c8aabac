use chrono::{DateTime, NaiveDate, Utc};
use hornero_core::records::{Expense, Income, IncomeChannels, Invoice};
use hornero_shared::types::Currency;
use hornero_shared::{AppError, AppResult};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{parse_id, parse_opt_id};

/// An expense and its sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub description: String,
    pub amount_bs: Decimal,
    pub amount_dollars: Decimal,
    pub currency: Currency,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub sub_type: String,
    #[serde(default)]
    pub payment_method: String,
    pub paid: bool,
    #[serde(default)]
    pub invoice_id: Option<String>,
    pub google_row: u32,
    pub rate: Decimal,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Expense> for ExpenseDocument {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id.to_string(),
            description: e.description.clone(),
            amount_bs: e.amount_bs,
            amount_dollars: e.amount_dollars,
            currency: e.currency,
            date: e.date,
            kind: e.kind.clone(),
            sub_type: e.sub_type.clone(),
            payment_method: e.payment_method.clone(),
            paid: e.paid,
            invoice_id: e.invoice_id.map(|i| i.to_string()),
            google_row: e.google_row,
            rate: e.rate,
            created_by: e.created_by.map(|u| u.to_string()),
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl TryFrom<ExpenseDocument> for Expense {
    type Error = AppError;

    fn try_from(doc: ExpenseDocument) -> AppResult<Self> {
        Ok(Self {
            id: parse_id("expense id", &doc.id)?,
            description: doc.description,
            amount_bs: doc.amount_bs,
            amount_dollars: doc.amount_dollars,
            currency: doc.currency,
            date: doc.date,
            kind: doc.kind,
            sub_type: doc.sub_type,
            payment_method: doc.payment_method,
            paid: doc.paid,
            invoice_id: parse_opt_id("invoice_id", doc.invoice_id.as_deref())?,
            google_row: doc.google_row,
            rate: doc.rate,
            created_by: parse_opt_id("created_by", doc.created_by.as_deref())?,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// The income of one business day. Channel amounts are stored at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub channels: IncomeChannels,
    #[serde(default)]
    pub notas: String,
    pub rate: Decimal,
    pub google_row: u32,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Income> for IncomeDocument {
    fn from(i: &Income) -> Self {
        Self {
            id: i.id.to_string(),
            date: i.date,
            channels: i.channels,
            notas: i.notas.clone(),
            rate: i.rate,
            google_row: i.google_row,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

impl TryFrom<IncomeDocument> for Income {
    type Error = AppError;

    fn try_from(doc: IncomeDocument) -> AppResult<Self> {
        Ok(Self {
            id: parse_id("income id", &doc.id)?,
            date: doc.date,
            channels: doc.channels,
            notas: doc.notas,
            rate: doc.rate,
            google_row: doc.google_row,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// A supplier invoice and its sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub supplier: String,
    pub numero_factura: String,
    pub description: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount_bs: Decimal,
    pub amount_dollars: Decimal,
    pub currency: Currency,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub sub_type: String,
    #[serde(default)]
    pub payment_method: String,
    pub paid: bool,
    pub google_row: u32,
    pub rate: Decimal,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Invoice> for InvoiceDocument {
    fn from(i: &Invoice) -> Self {
        Self {
            id: i.id.to_string(),
            supplier: i.supplier.clone(),
            numero_factura: i.numero_factura.clone(),
            description: i.description.clone(),
            date: i.date,
            due_date: i.due_date,
            amount_bs: i.amount_bs,
            amount_dollars: i.amount_dollars,
            currency: i.currency,
            kind: i.kind.clone(),
            sub_type: i.sub_type.clone(),
            payment_method: i.payment_method.clone(),
            paid: i.paid,
            google_row: i.google_row,
            rate: i.rate,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

impl TryFrom<InvoiceDocument> for Invoice {
    type Error = AppError;

    fn try_from(doc: InvoiceDocument) -> AppResult<Self> {
        Ok(Self {
            id: parse_id("invoice id", &doc.id)?,
            supplier: doc.supplier,
            numero_factura: doc.numero_factura,
            description: doc.description,
            date: doc.date,
            due_date: doc.due_date,
            amount_bs: doc.amount_bs,
            amount_dollars: doc.amount_dollars,
            currency: doc.currency,
            kind: doc.kind,
            sub_type: doc.sub_type,
            payment_method: doc.payment_method,
            paid: doc.paid,
            google_row: doc.google_row,
            rate: doc.rate,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}
