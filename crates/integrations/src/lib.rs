//! Outbound HTTP integrations for Hornero.
//!
//! - [`BcvRateClient`] reads the official Bs/USD rate of a day
//! - [`GoogleSheetsClient`] mirrors records into the bookkeeping spreadsheet

pub mod bcv;
pub mod sheets;

pub use bcv::BcvRateClient;
pub use sheets::{GoogleSheetsClient, TokenProvider};

use std::time::Duration;

use hornero_shared::{AppError, AppResult};

/// Builds the shared HTTP client with a request timeout.
pub(crate) fn http_client(timeout_secs: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .gzip(true)
        .build()
        .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))
}
