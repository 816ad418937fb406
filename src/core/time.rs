//! Time sources
//!
//! The builder never reads the wall clock directly; it asks a
//! `TimeProvider`, so tests can pin the current time.

use chrono::{DateTime, Duration, Utc};

/// Hours between creation and expiry when no deadline is given
pub const DEFAULT_DEADLINE_HOURS: i64 = 23;

/// Source of the current time
pub trait TimeProvider: Send + Sync {
    fn current_time(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn current_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider(pub DateTime<Utc>);

impl TimeProvider for FixedTimeProvider {
    fn current_time(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Default deadline for a transaction created at `timestamp`
pub fn default_deadline(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp + Duration::hours(DEFAULT_DEADLINE_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_provider() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let provider = FixedTimeProvider(instant);
        assert_eq!(provider.current_time(), instant);
        assert_eq!(provider.current_time(), instant);
    }

    #[test]
    fn test_default_deadline() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 11, 0, 0).unwrap();
        assert_eq!(default_deadline(instant), expected);
    }

    #[test]
    fn test_system_provider_is_monotone_enough() {
        let provider = SystemTimeProvider;
        let a = provider.current_time();
        let b = provider.current_time();
        assert!(b >= a);
    }
}
