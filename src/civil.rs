use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{ConvertError, Result};

/// A wall-clock reading: six calendar fields with no attached zone.
///
/// The record itself is plain data; [`CivilDateTime::validate`] is the single
/// structural gate (month/day ranges including leap years, hour/minute/second
/// ranges). Anything that anchors a reading to a zone validates first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilDateTime {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.to_naive().map(|_| ())
    }

    pub(crate) fn to_naive(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
            .ok_or_else(|| ConvertError::InvalidCivilTime {
                reason: format!(
                    "{:04}-{:02}-{:02} is not a calendar date",
                    self.year, self.month, self.day
                ),
            })?;
        let time = NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .ok_or_else(|| ConvertError::InvalidCivilTime {
            reason: format!(
                "{:02}:{:02}:{:02} is not a time of day",
                self.hour, self.minute, self.second
            ),
        })?;
        Ok(NaiveDateTime::new(date, time))
    }
}

impl From<NaiveDateTime> for CivilDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        }
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_dates() {
        assert!(CivilDateTime::new(2024, 1, 31, 0, 0, 0).validate().is_ok());
        assert!(CivilDateTime::new(2024, 12, 31, 23, 59, 59).validate().is_ok());
    }

    #[test]
    fn leap_day_validity() {
        assert!(CivilDateTime::new(2024, 2, 29, 12, 0, 0).validate().is_ok());
        assert!(CivilDateTime::new(2023, 2, 29, 12, 0, 0).validate().is_err());
        assert!(CivilDateTime::new(1900, 2, 29, 12, 0, 0).validate().is_err());
        assert!(CivilDateTime::new(2000, 2, 29, 12, 0, 0).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(CivilDateTime::new(2024, 13, 1, 0, 0, 0).validate().is_err());
        assert!(CivilDateTime::new(2024, 0, 1, 0, 0, 0).validate().is_err());
        assert!(CivilDateTime::new(2024, 4, 31, 0, 0, 0).validate().is_err());
        assert!(CivilDateTime::new(2024, 1, 1, 24, 0, 0).validate().is_err());
        assert!(CivilDateTime::new(2024, 1, 1, 0, 60, 0).validate().is_err());
        assert!(CivilDateTime::new(2024, 1, 1, 0, 0, 60).validate().is_err());
    }

    #[test]
    fn error_carries_the_offending_reading() {
        let err = CivilDateTime::new(2024, 6, 31, 0, 0, 0).validate().unwrap_err();
        assert!(matches!(err, ConvertError::InvalidCivilTime { .. }));
        assert!(err.to_string().contains("2024-06-31"));
    }

    #[test]
    fn display_zero_pads_every_field() {
        let c = CivilDateTime::new(33, 1, 2, 3, 4, 5);
        assert_eq!(c.to_string(), "0033-01-02 03:04:05");
    }

    #[test]
    fn naive_round_trip_preserves_fields() {
        let c = CivilDateTime::new(1999, 12, 31, 23, 59, 58);
        let back = CivilDateTime::from(c.to_naive().unwrap());
        assert_eq!(back, c);
    }
}
