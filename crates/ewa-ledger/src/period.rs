//! Calendar-month reporting periods.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::LedgerError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month identified by year and zero-based month (`0` = January).
///
/// Instants are bucketed in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    year: i32,
    month0: u32,
}

impl Period {
    pub fn new(year: i32, month0: u32) -> Result<Self, LedgerError> {
        if month0 >= 12 {
            return Err(LedgerError::InvalidPeriod(format!(
                "month index {month0} is outside 0..=11"
            )));
        }
        if NaiveDate::from_ymd_opt(year, month0 + 1, 1).is_none() {
            return Err(LedgerError::InvalidPeriod(format!(
                "year {year} is out of range"
            )));
        }
        Ok(Self { year, month0 })
    }

    /// Period containing `instant`.
    pub fn of(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month0: instant.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    /// First instant of the period.
    pub fn start(&self) -> DateTime<Utc> {
        month_start(self.year, self.month0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// First instant after the period, clamped to the last representable
    /// instant for the final month of the calendar.
    pub fn end(&self) -> DateTime<Utc> {
        let next = self.next();
        month_start(next.year, next.month0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant.year() == self.year && instant.month0() == self.month0
    }

    pub fn next(&self) -> Self {
        if self.month0 == 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

fn month_start(year: i32, month0: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month0 + 1, 1, 0, 0, 0).single()
}
