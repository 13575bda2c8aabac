//! Bs/USD currency handling.
//!
//! Every financial record carries both sides of the pair. The entered side is
//! the source of truth and the other one is derived with the rate of the day.

pub mod conversion;
pub mod parse;

#[cfg(test)]
mod props;

pub use conversion::{resolve_amounts, round2, to_bs, to_usd, validate_rate};
pub use parse::parse_amount;
