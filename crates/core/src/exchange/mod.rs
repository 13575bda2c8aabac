//! Exchange-rate lookup for the Bs/USD pair.
//!
//! One rate per calendar day. Rates are either entered by hand or fetched from
//! the external source the first time a day is needed and cached afterwards.

pub mod clock;
pub mod ports;
pub mod service;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ports::{RateRepository, RateSource};
pub use service::ExchangeRateService;
pub use types::{ExchangeRate, RateOrigin, RateSnapshot};

#[cfg(test)]
pub use ports::MockRateSource;
