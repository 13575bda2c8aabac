//! Exchange rate types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    /// Entered by hand.
    Manual,
    /// Fetched from the central bank source.
    External,
}

/// Bolívars per one US dollar for a calendar day. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Day the rate applies to.
    pub date: NaiveDate,
    /// Bs per 1 USD, always positive.
    pub rate: Decimal,
    /// How the rate entered the system.
    pub origin: RateOrigin,
    /// When the rate was stored.
    pub created_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        date: NaiveDate,
        rate: Decimal,
        origin: RateOrigin,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            date,
            rate,
            origin,
            created_at,
        }
    }

    /// Captures this rate as a debt snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> RateSnapshot {
        RateSnapshot {
            rate: self.rate,
            date: self.date,
            source: self.origin,
        }
    }
}

/// Rate frozen onto a debt when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Bs per 1 USD.
    pub rate: Decimal,
    /// Day of the rate that was captured.
    pub date: NaiveDate,
    /// Origin of the captured rate.
    pub source: RateOrigin,
}
