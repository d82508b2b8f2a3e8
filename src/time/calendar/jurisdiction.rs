use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::jointcalendar::JointCalendar;
use crate::time::calendar::simplecalendar::{saturday_sunday, SimpleCalendar};
use crate::time::recurringholiday::easterrelatedholiday::EasterRelatedHoliday;
use crate::time::recurringholiday::fixeddateholiday::FixedDateHoliday;
use crate::time::recurringholiday::holidayrun::HolidayRun;
use crate::time::recurringholiday::nthweekdayholiday::NthWeekdayHoliday;
use crate::time::recurringholiday::recurringholiday::RecurringHoliday;
use crate::time::recurringholiday::weekdayonorafterholiday::WeekdayOnOrAfterHoliday;
use crate::time::recurringholiday::weekendadjustment::{
    WeekendAdjustment,
    WeekendAdjustmentRule
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("unsupported jurisdiction '{0}'")]
    UnsupportedJurisdiction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jurisdiction {
    UK,
    Sweden,
    USA,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [Jurisdiction::UK, Jurisdiction::Sweden, Jurisdiction::USA];

    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::UK => "UK",
            Jurisdiction::Sweden => "Sweden",
            Jurisdiction::USA => "USA",
        }
    }

    /// The jurisdiction's business-day calendar: Saturday/Sunday weekend
    /// plus its public holidays. Built once and shared.
    pub fn calendar(&self) -> Arc<SimpleCalendar> {
        static UK_CALENDAR: OnceLock<Arc<SimpleCalendar>> = OnceLock::new();
        static SWEDEN_CALENDAR: OnceLock<Arc<SimpleCalendar>> = OnceLock::new();
        static USA_CALENDAR: OnceLock<Arc<SimpleCalendar>> = OnceLock::new();

        let (cell, rules): (&OnceLock<Arc<SimpleCalendar>>, fn() -> Vec<Arc<dyn RecurringHoliday>>) = match self {
            Jurisdiction::UK => (&UK_CALENDAR, uk_holidays),
            Jurisdiction::Sweden => (&SWEDEN_CALENDAR, sweden_holidays),
            Jurisdiction::USA => (&USA_CALENDAR, usa_holidays),
        };
        cell.get_or_init(|| {
            Arc::new(SimpleCalendar::new(saturday_sunday(), rules(), Vec::new(), Vec::new()))
        }).clone()
    }

    /// True iff `d` is a named public holiday; weekends alone do not count.
    pub fn is_holiday(&self, d: NaiveDate) -> bool {
        self.calendar().is_named_holiday(d)
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UK" | "GB" | "GBR" | "GBP" => Ok(Jurisdiction::UK),
            "SWEDEN" | "SE" | "SWE" | "SEK" => Ok(Jurisdiction::Sweden),
            "USA" | "US" | "USD" => Ok(Jurisdiction::USA),
            _ => Err(CalendarError::UnsupportedJurisdiction(s.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for Jurisdiction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Public-holiday check by jurisdiction name.
pub fn is_holiday(d: NaiveDate, jurisdiction: &str) -> Result<bool, CalendarError> {
    let jurisdiction: Jurisdiction = jurisdiction.parse()?;
    Ok(jurisdiction.is_holiday(d))
}

/// Union calendar of `jurisdictions`: a day is a business day only when it
/// is one in every listed jurisdiction. An empty list gives a holiday-free
/// calendar.
pub fn calendar_for(jurisdictions: &[Jurisdiction]) -> Arc<dyn HolidayCalendar> {
    let mut calendars = jurisdictions
        .iter()
        .map(|j| j.calendar() as Arc<dyn HolidayCalendar>);
    let Some(first) = calendars.next() else {
        return Arc::new(SimpleCalendar::holiday_free());
    };
    calendars.fold(first, |joint, c| {
        Arc::new(JointCalendar::union(joint, c)) as Arc<dyn HolidayCalendar>
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// holiday rules
// ─────────────────────────────────────────────────────────────────────────────

fn next_monday_rule() -> WeekendAdjustmentRule {
    WeekendAdjustmentRule::new(&HashMap::from([
        (Weekday::Sat, WeekendAdjustment::NextWeekday),
        (Weekday::Sun, WeekendAdjustment::NextWeekday),
    ]))
}

fn fixed(month: u32, day: u32, rule: WeekendAdjustmentRule) -> Vec<Arc<dyn RecurringHoliday>> {
    FixedDateHoliday::new(month, day, rule)
        .map(|h| Arc::new(h) as Arc<dyn RecurringHoliday>)
        .into_iter()
        .collect()
}

fn nth(month: u32, n: u8, weekday: Weekday) -> Vec<Arc<dyn RecurringHoliday>> {
    NthWeekdayHoliday::new(month, n, weekday)
        .map(|h| Arc::new(h) as Arc<dyn RecurringHoliday>)
        .into_iter()
        .collect()
}

fn last(month: u32, weekday: Weekday) -> Vec<Arc<dyn RecurringHoliday>> {
    NthWeekdayHoliday::last(month, weekday)
        .map(|h| Arc::new(h) as Arc<dyn RecurringHoliday>)
        .into_iter()
        .collect()
}

fn easter(shift_days: i32) -> Vec<Arc<dyn RecurringHoliday>> {
    vec![Arc::new(EasterRelatedHoliday::new(shift_days)) as Arc<dyn RecurringHoliday>]
}

/// US settlement calendar.
fn usa_holidays() -> Vec<Arc<dyn RecurringHoliday>> {
    let observed = WeekendAdjustmentRule::nearest_weekday;
    let juneteenth = FixedDateHoliday::new(6, 19, observed())
        .map(|h| Arc::new(h.since(2022)) as Arc<dyn RecurringHoliday>);
    [
        fixed(1, 1, observed()),
        nth(1, 3, Weekday::Mon),
        nth(2, 3, Weekday::Mon),
        last(5, Weekday::Mon),
        juneteenth.into_iter().collect(),
        fixed(7, 4, observed()),
        nth(9, 1, Weekday::Mon),
        nth(10, 2, Weekday::Mon),
        fixed(11, 11, observed()),
        nth(11, 4, Weekday::Thu),
        fixed(12, 25, observed()),
    ].concat()
}

/// England and Wales bank holidays.
fn uk_holidays() -> Vec<Arc<dyn RecurringHoliday>> {
    let christmas = HolidayRun::new(12, 25, 2)
        .map(|h| Arc::new(h) as Arc<dyn RecurringHoliday>);
    [
        fixed(1, 1, next_monday_rule()),
        easter(-2),
        easter(1),
        nth(5, 1, Weekday::Mon),
        last(5, Weekday::Mon),
        last(8, Weekday::Mon),
        christmas.into_iter().collect(),
    ].concat()
}

fn sweden_holidays() -> Vec<Arc<dyn RecurringHoliday>> {
    let unadjusted = WeekendAdjustmentRule::unadjusted;
    let midsummer_eve = WeekdayOnOrAfterHoliday::new(6, 19, Weekday::Fri)
        .map(|h| Arc::new(h) as Arc<dyn RecurringHoliday>);
    [
        fixed(1, 1, unadjusted()),
        fixed(1, 6, unadjusted()),
        easter(-2),
        easter(1),
        fixed(5, 1, unadjusted()),
        easter(39),
        fixed(6, 6, unadjusted()),
        midsummer_eve.into_iter().collect(),
        fixed(12, 24, unadjusted()),
        fixed(12, 25, unadjusted()),
        fixed(12, 26, unadjusted()),
        fixed(12, 31, unadjusted()),
    ].concat()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("usa".parse::<Jurisdiction>().unwrap(), Jurisdiction::USA);
        assert_eq!("SEK".parse::<Jurisdiction>().unwrap(), Jurisdiction::Sweden);
        assert_eq!("GB".parse::<Jurisdiction>().unwrap(), Jurisdiction::UK);
        assert_eq!(
            "France".parse::<Jurisdiction>(),
            Err(CalendarError::UnsupportedJurisdiction("France".to_owned()))
        );
    }

    #[test]
    fn unknown_jurisdiction_fails() {
        let result = is_holiday(ymd(2023, 7, 14), "France");
        assert!(matches!(result, Err(CalendarError::UnsupportedJurisdiction(name)) if name == "France"));
    }

    #[test]
    fn usa_holidays_2023() {
        for d in [
            ymd(2023, 1, 2),   // New Year's Day observed
            ymd(2023, 1, 16),
            ymd(2023, 2, 20),
            ymd(2023, 5, 29),
            ymd(2023, 6, 19),
            ymd(2023, 7, 4),
            ymd(2023, 9, 4),
            ymd(2023, 10, 9),
            ymd(2023, 11, 10),  // Veterans Day observed
            ymd(2023, 11, 23),
            ymd(2023, 12, 25),
        ] {
            assert!(is_holiday(d, "USA").unwrap(), "{d} should be a USA holiday");
        }
        assert!(!is_holiday(ymd(2023, 7, 5), "USA").unwrap());
    }

    #[test]
    fn weekends_are_not_named_holidays() {
        // 2023-04-01 is a Saturday
        assert!(!is_holiday(ymd(2023, 4, 1), "USA").unwrap());
        assert!(!Jurisdiction::USA.calendar().is_business_day(ymd(2023, 4, 1)));
    }

    #[test]
    fn weekend_holidays_are_still_named_holidays() {
        // Sunday 2022-12-25, Sunday 2021-07-04, Saturday 2021-12-25
        assert!(is_holiday(ymd(2022, 12, 25), "USA").unwrap());
        assert!(is_holiday(ymd(2021, 7, 4), "USA").unwrap());
        assert!(is_holiday(ymd(2021, 7, 5), "USA").unwrap());
        assert!(is_holiday(ymd(2021, 12, 25), "UK").unwrap());
        assert!(is_holiday(ymd(2021, 12, 27), "UK").unwrap());
        assert!(!is_holiday(ymd(2021, 12, 29), "UK").unwrap());
    }

    #[test]
    fn uk_holidays_2023() {
        for d in [
            ymd(2023, 1, 2),
            ymd(2023, 4, 7),
            ymd(2023, 4, 10),
            ymd(2023, 5, 1),
            ymd(2023, 5, 29),
            ymd(2023, 8, 28),
            ymd(2023, 12, 25),
            ymd(2023, 12, 26),
        ] {
            assert!(Jurisdiction::UK.is_holiday(d), "{d} should be a UK holiday");
        }
        assert!(!Jurisdiction::UK.is_holiday(ymd(2023, 7, 4)));
    }

    #[test]
    fn sweden_holidays_2023() {
        for d in [
            ymd(2023, 1, 6),
            ymd(2023, 4, 7),
            ymd(2023, 4, 10),
            ymd(2023, 5, 1),
            ymd(2023, 5, 18),
            ymd(2023, 6, 6),
            ymd(2023, 6, 23),
            ymd(2023, 12, 24),
            ymd(2023, 12, 31),
        ] {
            assert!(Jurisdiction::Sweden.is_holiday(d), "{d} should be a Swedish holiday");
        }
    }

    #[test]
    fn joint_calendar_closes_on_either_market_holiday() {
        let calendar = calendar_for(&[Jurisdiction::USA, Jurisdiction::Sweden]);
        assert!(calendar.is_holiday(ymd(2023, 7, 4)));
        assert!(calendar.is_holiday(ymd(2023, 6, 6)));
        assert!(calendar.is_business_day(ymd(2023, 6, 7)));
        assert!(calendar_for(&[]).is_business_day(ymd(2023, 4, 1)));
    }
}
