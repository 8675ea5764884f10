//! Wall-clock time as reported by the timezone service.

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::error::{Error, TimeFetchError};

/// Local calendar time.
///
/// The timezone service already returns local epoch seconds, so the value
/// is kept offset-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime(NaiveDateTime);

impl DateTime {
    /// Time `ts` seconds after 1970-01-01T00:00:00.
    pub fn from_unix_timestamp(ts: i64) -> Result<Self, Error> {
        chrono::DateTime::from_timestamp(ts, 0)
            .map(|t| Self(t.naive_utc()))
            .ok_or(TimeFetchError::Malformed.into())
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// This time moved forward by `ms` milliseconds; saturates at the end
    /// of chrono's range.
    pub fn advanced_by_ms(self, ms: u64) -> Self {
        i64::try_from(ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map_or(Self(NaiveDateTime::MAX), Self)
    }
}

impl From<NaiveDateTime> for DateTime {
    fn from(t: NaiveDateTime) -> Self {
        Self(t)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DateTime {
    fn format(&self, f: defmt::Formatter) {
        use chrono::Datelike;
        defmt::write!(
            f,
            "{}-{}-{} {}:{}:{}",
            self.0.year(),
            self.0.month(),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .unwrap()
            .into()
    }

    #[test]
    fn epoch() {
        assert_eq!(DateTime::from_unix_timestamp(0), Ok(dt(1970, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn leap_day() {
        assert_eq!(DateTime::from_unix_timestamp(951_782_400), Ok(dt(2000, 2, 29, 0, 0, 0)));
    }

    #[test]
    fn recent_timestamp() {
        let t = DateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(t, dt(2023, 11, 14, 22, 13, 20));
        assert_eq!((t.hour(), t.minute()), (22, 13));
    }

    #[test]
    fn before_epoch() {
        assert_eq!(DateTime::from_unix_timestamp(-1), Ok(dt(1969, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn out_of_range_timestamp_is_malformed() {
        assert_eq!(
            DateTime::from_unix_timestamp(i64::MAX),
            Err(Error::TimeFetchFailure(TimeFetchError::Malformed))
        );
    }

    #[test]
    fn advancing_rolls_over_midnight() {
        let t = dt(2024, 12, 31, 23, 59, 30).advanced_by_ms(45_000);
        assert_eq!(t, dt(2025, 1, 1, 0, 0, 15));
        let end = DateTime::from(NaiveDateTime::MAX);
        assert_eq!(dt(2024, 1, 1, 9, 0, 0).advanced_by_ms(u64::MAX), end);
    }
}
