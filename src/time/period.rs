use std::fmt;
use std::ops::{Add, Sub};
use std::num::ParseIntError;

use chrono::{
    Datelike,
    Duration,
    NaiveDate
};
use thiserror::Error;

use crate::time::utility::days_of_month;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years
}

impl TimeUnit {
    pub fn to_char(&self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y'
        }
    }
}

#[derive(Debug, Error)]
pub enum ParsePeriodError {
    #[error("empty tenor string")]
    Empty,
    #[error("unknown time unit '{0}' found")]
    UnknownTimeUnit(char),
    #[error(transparent)]
    Parse(#[from] ParseIntError)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Period {
    number: i32,
    unit: TimeUnit
}

impl Period {
    pub fn new(number: i32, unit: TimeUnit) -> Period {
        Period { number, unit }
    }

    pub fn days(number: i32) -> Period {
        Period::new(number, TimeUnit::Days)
    }

    pub fn weeks(number: i32) -> Period {
        Period::new(number, TimeUnit::Weeks)
    }

    pub fn months(number: i32) -> Period {
        Period::new(number, TimeUnit::Months)
    }

    pub fn years(number: i32) -> Period {
        Period::new(number, TimeUnit::Years)
    }

    /// Parses tenor strings such as `3M`, `10Y` or `2W` (unit letter is case-insensitive).
    pub fn parse(period_str: &str) -> Result<Period, ParsePeriodError> {
        let trimmed = period_str.trim();
        let unit_chr = trimmed.chars().last().ok_or(ParsePeriodError::Empty)?;
        let number = trimmed[..(trimmed.len() - unit_chr.len_utf8())].parse::<i32>()?;
        match unit_chr.to_ascii_uppercase() {
            'D' => Ok(Period::days(number)),
            'W' => Ok(Period::weeks(number)),
            'M' => Ok(Period::months(number)),
            'Y' => Ok(Period::years(number)),
            _ => Err(ParsePeriodError::UnknownTimeUnit(unit_chr))
        }
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Length in months for month/year based periods.
    pub fn total_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.number),
            TimeUnit::Years => Some(12 * self.number),
            _ => None
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.number, self.unit.to_char())
    }
}

fn shift_months(horizon: NaiveDate, number: i32) -> NaiveDate {
    let total = horizon.month0() as i32 + number;
    let new_year = horizon.year() + total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    let last = days_of_month(new_year, new_month);
    // day is clamped to the month length, so the date always exists
    NaiveDate::from_ymd_opt(new_year, new_month, last.min(horizon.day())).unwrap()
}

impl Add<Period> for NaiveDate {
    type Output = Self;

    fn add(self, period: Period) -> Self {
        match period.unit {
            TimeUnit::Days => self + Duration::days(period.number as i64),
            TimeUnit::Weeks => self + Duration::days(7 * period.number as i64),
            TimeUnit::Months => shift_months(self, period.number),
            TimeUnit::Years => shift_months(self, 12 * period.number)
        }
    }
}

impl Sub<Period> for NaiveDate {
    type Output = Self;

    fn sub(self, period: Period) -> Self {
        self + Period::new(-period.number, period.unit)
    }
}
