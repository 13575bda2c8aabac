//! Storage and source ports for exchange rates.

use async_trait::async_trait;
use chrono::NaiveDate;
use hornero_shared::AppResult;
use rust_decimal::Decimal;

use super::types::ExchangeRate;

/// Persistence of daily rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateRepository: Send + Sync {
    /// Exact-day lookup.
    async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<ExchangeRate>>;

    /// Most recent rate dated on or before `date`.
    async fn find_latest_on_or_before(&self, date: NaiveDate) -> AppResult<Option<ExchangeRate>>;

    /// Stores a new rate. Fails with `Validation` if the day already has one.
    async fn insert(&self, rate: &ExchangeRate) -> AppResult<()>;

    /// Stores `rate` unless its day already has one; returns the stored rate either way.
    async fn insert_if_absent(&self, rate: &ExchangeRate) -> AppResult<ExchangeRate>;
}

/// External provider of official rates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Returns Bs per 1 USD for `date`, or an error when the source has none.
    async fn fetch_rate(&self, date: NaiveDate) -> AppResult<Decimal>;
}
