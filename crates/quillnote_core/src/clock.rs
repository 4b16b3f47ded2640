//! Injectable UTC time source.
//!
//! Timestamps are persisted as epoch microseconds, so every value handed out
//! here is truncated to microsecond precision. That keeps a note returned by
//! a write equal to the same note read back later.

use chrono::{DateTime, Utc};

/// Source of "now" for lifecycle operations.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_to_micros(Utc::now())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Drops sub-microsecond precision.
pub fn truncate_to_micros(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(value.timestamp_micros()).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{truncate_to_micros, Clock, SystemClock};
    use chrono::{TimeZone, Timelike, Utc};

    #[test]
    fn truncation_keeps_whole_microseconds() {
        let value = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_to_micros(value);
        assert_eq!(truncated.nanosecond(), 123_456_000);
        assert_eq!(truncated.timestamp_micros(), value.timestamp_micros());
    }

    #[test]
    fn system_clock_is_microsecond_aligned() {
        let now = SystemClock.now();
        assert_eq!(now.nanosecond() % 1_000, 0);
    }
}
