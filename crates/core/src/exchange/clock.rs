//! Business-day clock.
//!
//! "Today" is the calendar day in the business time zone, not in UTC.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use hornero_shared::{AppError, AppResult};

/// Source of the current instant and the business day.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Business time zone.
    fn timezone(&self) -> Tz;

    /// Calendar day of `now()` in the business time zone.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.timezone()).date_naive()
    }
}

/// Wall clock in a fixed time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    /// Creates a clock for `tz`.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a clock from an IANA zone name such as `America/Caracas`.
    pub fn from_name(name: &str) -> AppResult<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|e| AppError::Internal(format!("invalid time zone {name}: {e}")))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn timezone(&self) -> Tz {
        self.tz
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    tz: Tz,
}

impl FixedClock {
    /// Creates a clock that always returns `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self { now, tz }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn timezone(&self) -> Tz {
        self.tz
    }
}
