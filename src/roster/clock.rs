//! Source of "today" for expiry and date rollover

use chrono::{FixedOffset, NaiveDate, Offset, Utc};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock shifted to the community's time zone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Offset in whole hours east of UTC; out-of-range values fall back to UTC
    pub fn with_utc_offset_hours(hours: i32) -> Self {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self::new(offset)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_system_clock_offset_stays_within_a_day() {
        let utc = Utc::now().date_naive();
        let local = SystemClock::with_utc_offset_hours(3).today();
        assert!((local - utc).num_days().abs() <= 1);
    }

    #[test]
    fn test_invalid_offset_falls_back_to_utc() {
        let clock = SystemClock::with_utc_offset_hours(48);
        assert_eq!(clock.offset, FixedOffset::east_opt(0).unwrap());
    }

    #[test]
    fn test_huge_offset_does_not_overflow() {
        for hours in [i32::MAX, i32::MIN] {
            let clock = SystemClock::with_utc_offset_hours(hours);
            assert_eq!(clock.offset, FixedOffset::east_opt(0).unwrap());
        }
    }
}
