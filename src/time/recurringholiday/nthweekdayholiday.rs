use std::collections::HashSet;

use chrono::{
    Datelike,
    Days,
    NaiveDate,
    Weekday
};

use super::recurringholiday::RecurringHoliday;

/// Which occurrence of a weekday within its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekdayOrdinal {
    /// Counted from the start of the month, 1 to 5.
    Nth(u8),
    Last,
}

/// A weekday fixed by its position in a month, e.g. the fourth Thursday of
/// November or the last Monday of May.
#[derive(Clone)]
pub struct NthWeekdayHoliday {
    month: u32,
    ordinal: WeekdayOrdinal,
    weekday: Weekday,
}

impl NthWeekdayHoliday {
    pub fn new(month: u32, n: u8, weekday: Weekday) -> Option<NthWeekdayHoliday> {
        NthWeekdayHoliday::with_ordinal(month, WeekdayOrdinal::Nth(n), weekday)
    }

    pub fn last(month: u32, weekday: Weekday) -> Option<NthWeekdayHoliday> {
        NthWeekdayHoliday::with_ordinal(month, WeekdayOrdinal::Last, weekday)
    }

    pub fn with_ordinal(month: u32, ordinal: WeekdayOrdinal, weekday: Weekday) -> Option<NthWeekdayHoliday> {
        let valid_ordinal = match ordinal {
            WeekdayOrdinal::Nth(n) => (1..=5).contains(&n),
            WeekdayOrdinal::Last => true,
        };
        if !(1..=12).contains(&month) || !valid_ordinal {
            None
        } else {
            Some(NthWeekdayHoliday { month, ordinal, weekday })
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn ordinal(&self) -> WeekdayOrdinal {
        self.ordinal
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    fn last_in_month(&self, year: i32) -> Option<NaiveDate> {
        let first_of_next_month = if self.month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, self.month + 1, 1)
        }?;
        let offset = (first_of_next_month.weekday().num_days_from_monday() + 7
                      - self.weekday.num_days_from_monday()) % 7;
        // the 1st of next month falls on the weekday itself: go back a full week
        let days_back = if offset == 0 { 7 } else { offset };
        first_of_next_month.checked_sub_days(Days::new(days_back as u64))
    }
}

impl RecurringHoliday for NthWeekdayHoliday {
    fn get_holiday(&self, year: i32) -> HashSet<NaiveDate> {
        let date = match self.ordinal {
            WeekdayOrdinal::Nth(n) => NaiveDate::from_weekday_of_month_opt(year, self.month, self.weekday, n),
            WeekdayOrdinal::Last => self.last_in_month(year),
        };
        date.into_iter().collect()
    }
}
