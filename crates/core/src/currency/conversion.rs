//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for the Bs/USD pair:
//! - Always round to 2 decimal places
//! - Midpoints round away from zero (matches the amounts already in the books)
//! - Store both the entered and the converted amount

use hornero_shared::types::{Currency, DualAmount};
use hornero_shared::{AppError, AppResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to 2 decimal places, midpoint away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rejects zero and negative rates.
pub fn validate_rate(rate: Decimal) -> AppResult<()> {
    if rate <= Decimal::ZERO {
        return Err(AppError::InvalidRate(rate));
    }
    Ok(())
}

/// Converts a bolívar amount to dollars: `round2(amount_bs / rate)`.
pub fn to_usd(amount_bs: Decimal, rate: Decimal) -> AppResult<Decimal> {
    validate_rate(rate)?;
    amount_bs
        .checked_div(rate)
        .map(round2)
        .ok_or_else(|| AppError::Validation(format!("amount {amount_bs} out of range")))
}

/// Converts a dollar amount to bolívars: `round2(amount_usd * rate)`.
pub fn to_bs(amount_usd: Decimal, rate: Decimal) -> AppResult<Decimal> {
    validate_rate(rate)?;
    amount_usd
        .checked_mul(rate)
        .map(round2)
        .ok_or_else(|| AppError::Validation(format!("amount {amount_usd} out of range")))
}

/// Builds both amounts of a record from the entered amount.
///
/// The field named by `currency` keeps the entered value (rounded to cents),
/// the other side is derived through `rate`.
///
/// # Example
///
/// ```
/// use hornero_core::currency::resolve_amounts;
/// use hornero_shared::types::Currency;
/// use rust_decimal_macros::dec;
///
/// let amounts = resolve_amounts(dec!(400), Currency::Bs, dec!(40)).unwrap();
/// assert_eq!(amounts.amount_dollars, dec!(10.00));
/// ```
pub fn resolve_amounts(amount: Decimal, currency: Currency, rate: Decimal) -> AppResult<DualAmount> {
    match currency {
        Currency::Bs => Ok(DualAmount::new(round2(amount), to_usd(amount, rate)?)),
        Currency::Usd => Ok(DualAmount::new(to_bs(amount, rate)?, round2(amount))),
    }
}
