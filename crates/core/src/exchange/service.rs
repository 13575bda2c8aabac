//! Exchange rate resolution.
//!
//! Lookup order for a day that must have a rate:
//! 1. the stored rate for that exact day
//! 2. the external source for that day
//! 3. the external source for the previous day (one step only)
//!
//! Whatever the source returns is stored under the requested day, so the
//! source is asked at most once per day.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use hornero_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::clock::Clock;
use super::ports::{RateRepository, RateSource};
use super::types::{ExchangeRate, RateOrigin, RateSnapshot};
use crate::currency::validate_rate;

/// How many days back the external lookup may step.
const FALLBACK_DAYS: u64 = 1;

/// Exchange rate service.
#[derive(Clone)]
pub struct ExchangeRateService {
    repo: Arc<dyn RateRepository>,
    source: Arc<dyn RateSource>,
    clock: Arc<dyn Clock>,
}

impl ExchangeRateService {
    /// Creates a new service.
    pub fn new(
        repo: Arc<dyn RateRepository>,
        source: Arc<dyn RateSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            source,
            clock,
        }
    }

    /// The clock that defines "today" for every caller of this service.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Exact-day lookup. Storage errors are logged and reported as a miss.
    pub async fn get_rate_for_date(&self, date: NaiveDate) -> Option<ExchangeRate> {
        match self.repo.find_by_date(date).await {
            Ok(rate) => rate,
            Err(e) => {
                warn!(%date, error = %e, "Rate lookup failed, treating as missing");
                None
            }
        }
    }

    /// Returns the stored rate for `date`, fetching and caching it on a miss.
    pub async fn fetch_and_save_if_missing(&self, date: NaiveDate) -> AppResult<ExchangeRate> {
        if let Some(existing) = self.get_rate_for_date(date).await {
            return Ok(existing);
        }

        let value = self.fetch_with_fallback(date).await?;
        validate_rate(value)?;

        let rate = ExchangeRate::new(date, value, RateOrigin::External, self.clock.now());
        let stored = self.repo.insert_if_absent(&rate).await?;
        info!(%date, rate = %stored.rate, "Exchange rate cached");
        Ok(stored)
    }

    /// Resolves the rate an operation needs before writing anything.
    ///
    /// Source failures become `RateNotFound`; storage failures are returned as-is.
    pub async fn require_rate(&self, date: NaiveDate) -> AppResult<ExchangeRate> {
        match self.fetch_and_save_if_missing(date).await {
            Ok(rate) => Ok(rate),
            Err(AppError::Database(msg)) => Err(AppError::Database(msg)),
            Err(e) => {
                warn!(%date, error = %e, "No exchange rate available");
                Err(AppError::RateNotFound(date))
            }
        }
    }

    /// Stores a hand-entered rate for `date` (default: today).
    pub async fn create_rate(
        &self,
        rate: Decimal,
        date: Option<NaiveDate>,
    ) -> AppResult<ExchangeRate> {
        validate_rate(rate)?;
        let date = date.unwrap_or_else(|| self.clock.today());

        if self.repo.find_by_date(date).await?.is_some() {
            return Err(AppError::Validation(format!(
                "An exchange rate already exists for {date}"
            )));
        }

        let entry = ExchangeRate::new(date, rate, RateOrigin::Manual, self.clock.now());
        self.repo.insert(&entry).await?;
        info!(%date, %rate, "Manual exchange rate created");
        Ok(entry)
    }

    /// Rate to freeze onto a bolívar debt dated `date`.
    ///
    /// Prefers the exact day, then the latest stored rate on or before it, and
    /// only then asks the external source.
    pub async fn rate_for_snapshot(&self, date: NaiveDate) -> AppResult<RateSnapshot> {
        if let Some(exact) = self.repo.find_by_date(date).await? {
            return Ok(exact.snapshot());
        }
        if let Some(previous) = self.repo.find_latest_on_or_before(date).await? {
            return Ok(previous.snapshot());
        }
        self.require_rate(date).await.map(|r| r.snapshot())
    }

    async fn fetch_with_fallback(&self, date: NaiveDate) -> AppResult<Decimal> {
        match self.source.fetch_rate(date).await {
            Ok(rate) => Ok(rate),
            Err(first) => {
                let previous = date
                    .checked_sub_days(Days::new(FALLBACK_DAYS))
                    .ok_or(AppError::RateNotFound(date))?;
                warn!(%date, %previous, error = %first, "Rate source miss, retrying previous day");
                self.source.fetch_rate(previous).await
            }
        }
    }
}
