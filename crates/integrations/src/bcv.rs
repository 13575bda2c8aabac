//! Client for the public BCV rates API.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use hornero_core::exchange::RateSource;
use hornero_shared::config::RatesConfig;
use hornero_shared::{AppError, AppResult};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

/// Body of `GET /rates/{day}`. Only the dollar rate is used.
#[derive(Debug, Deserialize)]
struct RateResponse {
    #[serde(default)]
    dollar: Option<serde_json::Number>,
}

/// [`RateSource`] backed by the BCV rates API.
#[derive(Debug, Clone)]
pub struct BcvRateClient {
    client: Client,
    base_url: String,
}

impl BcvRateClient {
    /// Creates a client from configuration.
    pub fn new(config: &RatesConfig) -> AppResult<Self> {
        Ok(Self {
            client: crate::http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, date: NaiveDate) -> String {
        format!("{}/rates/{}", self.base_url, date.format("%Y-%m-%d"))
    }
}

/// Reads a JSON number without going through a float.
fn parse_rate(number: &serde_json::Number) -> AppResult<Decimal> {
    let text = number.to_string();
    let rate = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| AppError::ExternalService(format!("unreadable rate {text}: {e}")))?;
    if rate <= Decimal::ZERO {
        return Err(AppError::ExternalService(format!("non-positive rate {rate}")));
    }
    Ok(rate)
}

#[async_trait]
impl RateSource for BcvRateClient {
    async fn fetch_rate(&self, date: NaiveDate) -> AppResult<Decimal> {
        let url = self.url(date);
        debug!(%url, "Fetching BCV rate");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%date, error = %e, "BCV request failed");
            AppError::ExternalService(format!("BCV request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%date, %status, "BCV returned an error status");
            return Err(AppError::ExternalService(format!(
                "BCV returned {status} for {date}"
            )));
        }

        let body: RateResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("invalid BCV response: {e}")))?;

        let number = body
            .dollar
            .ok_or_else(|| AppError::ExternalService(format!("no rate available for {date}")))?;
        parse_rate(&number)
    }
}
