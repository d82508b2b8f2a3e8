use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use super::recurringholiday::RecurringHoliday;

/// The first given weekday on or after a month/day anchor, e.g. Swedish
/// Midsummer Eve (first Friday on or after 19 June).
#[derive(Clone)]
pub struct WeekdayOnOrAfterHoliday {
    month: u32,
    day: u32,
    weekday: Weekday,
}

impl WeekdayOnOrAfterHoliday {
    pub fn new(month: u32, day: u32, weekday: Weekday) -> Option<WeekdayOnOrAfterHoliday> {
        // the anchor must exist in every year
        NaiveDate::from_ymd_opt(2023, month, day)?;
        Some(WeekdayOnOrAfterHoliday { month, day, weekday })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl RecurringHoliday for WeekdayOnOrAfterHoliday {
    fn get_holiday(&self, year: i32) -> HashSet<NaiveDate> {
        let mut holiday_set = HashSet::new();
        if let Some(anchor) = NaiveDate::from_ymd_opt(year, self.month, self.day) {
            let days_ahead = (self.weekday.num_days_from_monday() as i64
                              - anchor.weekday().num_days_from_monday() as i64).rem_euclid(7) as u64;
            holiday_set.insert(anchor + Days::new(days_ahead));
        }
        holiday_set
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midsummer_eve() {
        let midsummer_eve = WeekdayOnOrAfterHoliday::new(6, 19, Weekday::Fri).unwrap();
        assert!(midsummer_eve.is_holiday(&NaiveDate::from_ymd_opt(2023, 6, 23).unwrap()));
        assert!(midsummer_eve.is_holiday(&NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()));
        assert!(midsummer_eve.is_holiday(&NaiveDate::from_ymd_opt(2020, 6, 19).unwrap()));
    }
}
