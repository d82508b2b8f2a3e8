use std::collections::HashSet;

use chrono::{
    Datelike,
    NaiveDate
};

use super::recurringholiday::RecurringHoliday;
use super::weekendadjustment::WeekendAdjustmentRule;

#[derive(PartialEq, Eq, Clone, Copy)]
enum WeekendAdjustmentShiftCheck {
    MayShiftToPreviousYear = 1,
    MayShiftToNextYear = -1,
    None
}

/// A holiday on the same month/day every year, moved off weekends by a
/// [`WeekendAdjustmentRule`].
#[derive(Clone)]
pub struct FixedDateHoliday {
    month: u32,
    day: u32,
    weekend_adjustment_rules: WeekendAdjustmentRule,
    shift_check: WeekendAdjustmentShiftCheck,
    first_year: Option<i32>
}

impl FixedDateHoliday {
    pub fn new(month: u32, day: u32, weekend_adjustment_rules: WeekendAdjustmentRule) -> Option<FixedDateHoliday> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }

        let n_weekend = weekend_adjustment_rules.len() as u32;
        let shift_check = if n_weekend > 0 {
            if month == 1 && day <= n_weekend {
                WeekendAdjustmentShiftCheck::MayShiftToPreviousYear
            } else if month == 12 && day > 31 - n_weekend {
                WeekendAdjustmentShiftCheck::MayShiftToNextYear
            } else {
                WeekendAdjustmentShiftCheck::None
            }
        } else {
            WeekendAdjustmentShiftCheck::None
        };

        Some(FixedDateHoliday {
            month,
            day,
            weekend_adjustment_rules,
            shift_check,
            first_year: None
        })
    }

    /// Holiday observed only from `first_year` onwards.
    pub fn since(mut self, first_year: i32) -> FixedDateHoliday {
        self.first_year = Some(first_year);
        self
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn first_year(&self) -> Option<i32> {
        self.first_year
    }

    /// The calendar date of the holiday in `year`.
    fn calendar_date(&self, year: i32) -> Option<NaiveDate> {
        if self.first_year.is_some_and(|first| year < first) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }

    fn observed_date(&self, year: i32) -> Option<NaiveDate> {
        self.calendar_date(year)
            .map(|d| self.weekend_adjustment_rules.adjust(d))
    }
}

impl RecurringHoliday for FixedDateHoliday {
    /// Both the calendar date and, when it differs, its observed substitute.
    fn get_holiday(&self, year: i32) -> HashSet<NaiveDate> {
        let mut holiday_set: HashSet<NaiveDate> = self.calendar_date(year).into_iter().collect();

        if let Some(d1) = self.observed_date(year) {
            if d1.year() == year {
                holiday_set.insert(d1);
            }
        }

        // the observed date of an adjacent year's holiday may land in this year
        if self.shift_check != WeekendAdjustmentShiftCheck::None {
            if let Some(d2) = self.observed_date(year + self.shift_check as i32) {
                if d2.year() == year {
                    holiday_set.insert(d2);
                }
            }
        }

        holiday_set
    }
}
