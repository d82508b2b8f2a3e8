use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use super::recurringholiday::RecurringHoliday;

const ONE_DAY: Days = Days::new(1);

#[inline]
fn is_saturday_or_sunday(d: NaiveDate) -> bool {
    matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Consecutive fixed-date holidays where each one falling on a weekend, or
/// on a day already taken by an earlier holiday of the run, is substituted
/// by the next free weekday. UK Christmas and Boxing Day follow this rule.
/// The calendar dates stay in the holiday set next to their substitutes.
#[derive(Clone)]
pub struct HolidayRun {
    month: u32,
    first_day: u32,
    length: u32,
}

impl HolidayRun {
    pub fn new(month: u32, first_day: u32, length: u32) -> Option<HolidayRun> {
        if length == 0 {
            return None;
        }
        NaiveDate::from_ymd_opt(2023, month, first_day + length - 1)?;
        Some(HolidayRun { month, first_day, length })
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}

impl RecurringHoliday for HolidayRun {
    fn get_holiday(&self, year: i32) -> HashSet<NaiveDate> {
        let mut holiday_set = HashSet::new();
        let mut observed = HashSet::new();
        for offset in 0..self.length {
            let Some(calendar_date) = NaiveDate::from_ymd_opt(year, self.month, self.first_day + offset) else {
                continue;
            };
            let mut d = calendar_date;
            while is_saturday_or_sunday(d) || observed.contains(&d) {
                d = d + ONE_DAY;
            }
            observed.insert(d);
            holiday_set.insert(calendar_date);
        }
        holiday_set.extend(observed);
        holiday_set.retain(|d| d.year() == year);
        holiday_set
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn christmas_on_saturday_substitutes_monday_and_tuesday() {
        let christmas = HolidayRun::new(12, 25, 2).unwrap();
        let holidays = christmas.get_holiday(2021);
        assert_eq!(
            holidays,
            HashSet::from([ymd(2021, 12, 25), ymd(2021, 12, 26), ymd(2021, 12, 27), ymd(2021, 12, 28)])
        );
    }

    #[test]
    fn christmas_on_sunday_keeps_boxing_day_monday() {
        let christmas = HolidayRun::new(12, 25, 2).unwrap();
        let holidays = christmas.get_holiday(2022);
        assert_eq!(holidays, HashSet::from([ymd(2022, 12, 25), ymd(2022, 12, 26), ymd(2022, 12, 27)]));
    }

    #[test]
    fn weekday_christmas_is_unchanged() {
        let christmas = HolidayRun::new(12, 25, 2).unwrap();
        let holidays = christmas.get_holiday(2023);
        assert_eq!(holidays, HashSet::from([ymd(2023, 12, 25), ymd(2023, 12, 26)]));
    }
}
