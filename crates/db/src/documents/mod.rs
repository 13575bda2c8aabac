//! Stored document shapes.
//!
//! Ids are kept as hyphenated strings, calendar days as `YYYY-MM-DD` strings
//! (so range filters compare lexicographically), amounts as decimal strings and
//! timestamps as BSON dates.

#![allow(missing_docs)]

mod debt;
mod rate;
mod record;

pub use debt::{DebtDocument, DebtItemDocument, EmployeeDocument};
pub use rate::RateDocument;
pub use record::{ExpenseDocument, IncomeDocument, InvoiceDocument};

use std::str::FromStr;

use hornero_shared::AppResult;

use crate::error::corrupt;

/// Parses a stored id.
pub(crate) fn parse_id<T>(field: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| corrupt(field, raw, e))
}

/// Parses an optional stored id.
pub(crate) fn parse_opt_id<T>(field: &str, raw: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|r| parse_id(field, r)).transpose()
}
