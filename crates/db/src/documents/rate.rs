use chrono::{DateTime, NaiveDate, Utc};
use hornero_core::exchange::{ExchangeRate, RateOrigin};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day's rate. The day is the document id, which makes it unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateDocument {
    /// Day, `YYYY-MM-DD`.
    #[serde(rename = "_id")]
    pub date: NaiveDate,
    /// Bs per 1 USD.
    pub rate: Decimal,
    /// How the rate was entered.
    pub origin: RateOrigin,
    /// Storage timestamp.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<&ExchangeRate> for RateDocument {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            date: rate.date,
            rate: rate.rate,
            origin: rate.origin,
            created_at: rate.created_at,
        }
    }
}

impl From<RateDocument> for ExchangeRate {
    fn from(doc: RateDocument) -> Self {
        Self::new(doc.date, doc.rate, doc.origin, doc.created_at)
    }
}
