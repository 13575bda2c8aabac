//! Money types for the Bs/USD pair.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount wraps `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two currencies the business operates in.
///
/// Serialized with the symbols used in the bookkeeping sheets: `"Bs"` and `"$"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Venezuelan bolívar.
    #[serde(rename = "Bs", alias = "VES", alias = "bs")]
    Bs,
    /// US dollar.
    #[serde(rename = "$", alias = "USD", alias = "usd")]
    Usd,
}

impl Currency {
    /// Returns the symbol written to records and spreadsheet rows.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Bs => "Bs",
            Self::Usd => "$",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BS" | "VES" | "BS." => Ok(Self::Bs),
            "$" | "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// The pair of amounts every financial record stores.
///
/// One side is the entered amount, the other is derived with the rate of the record's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DualAmount {
    /// Amount in bolívars.
    pub amount_bs: Decimal,
    /// Amount in US dollars.
    pub amount_dollars: Decimal,
}

impl DualAmount {
    /// Creates a dual amount from both sides.
    #[must_use]
    pub const fn new(amount_bs: Decimal, amount_dollars: Decimal) -> Self {
        Self {
            amount_bs,
            amount_dollars,
        }
    }

    /// Returns the side denominated in `currency`.
    #[must_use]
    pub const fn in_currency(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Bs => self.amount_bs,
            Currency::Usd => self.amount_dollars,
        }
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
