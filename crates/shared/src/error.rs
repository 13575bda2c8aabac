//! Application-wide error types.
//!
//! Every fallible operation in the workspace reports one of these kinds so the
//! calling layer can map it to a status code without inspecting messages.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input (empty concept, non-positive quantity, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Employee, debt, invoice or record not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No exchange rate could be resolved for a date that requires one.
    #[error("No exchange rate found for {0}")]
    RateNotFound(NaiveDate),

    /// Exchange rate is zero or negative.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),

    /// The spreadsheet mutation failed or returned no row handle.
    #[error("Spreadsheet write failed: {0}")]
    ExternalWriteFailure(String),

    /// Operation illegal for the current status of the record.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error (rate source, spreadsheet transport).
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a `NotFound` error on a named entity.
    #[must_use]
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidRate(_) => 400,
            Self::NotFound(_) | Self::RateNotFound(_) => 404,
            Self::InvalidState(_) => 409,
            Self::ExternalWriteFailure(_) | Self::ExternalService(_) => 502,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RateNotFound(_) => "RATE_NOT_FOUND",
            Self::InvalidRate(_) => "INVALID_EXCHANGE_RATE",
            Self::ExternalWriteFailure(_) => "EXTERNAL_WRITE_FAILURE",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if retrying the whole request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExternalWriteFailure(_) | Self::ExternalService(_) | Self::Database(_)
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Internal(format!("configuration: {err}"))
    }
}
