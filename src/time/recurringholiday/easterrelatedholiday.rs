use std::collections::HashSet;

use chrono::NaiveDate;

use super::super::period::Period;
use super::recurringholiday::RecurringHoliday;

/// A holiday a fixed number of days from Western Easter Sunday
/// (Good Friday = -2, Easter Monday = 1, Ascension Day = 39).
#[derive(Clone)]
pub struct EasterRelatedHoliday {
    shift_period: Period
}

impl EasterRelatedHoliday {
    pub fn new(shift_days: i32) -> EasterRelatedHoliday {
        EasterRelatedHoliday {
            shift_period: Period::days(shift_days)
        }
    }

    pub fn shift_period(&self) -> Period {
        self.shift_period
    }
}

/// Gregorian Easter Sunday, defined for 1583..=4099.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    if !(1583..=4099).contains(&year) {
        return None;
    }

    let g = year % 19;
    let c = year / 100;
    let c_div_4 = c / 4;
    let h = (c - c_div_4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
    let h_div_28 = h / 28;
    let i = h - h_div_28 * (1 - h_div_28 * (29 / (h + 1)) * ((21 - g) / 11));
    let j = (year + year / 4 + i + 2 - c + c_div_4) % 7;
    let p = i - j;

    let day = 1 + (p + 27 + (p + 6) / 40) % 31;
    let month = 3 + (p + 26) / 30;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

impl RecurringHoliday for EasterRelatedHoliday {
    fn get_holiday(&self, year: i32) -> HashSet<NaiveDate> {
        let mut holiday_set = HashSet::new();

        if let Some(easter_day) = easter_sunday(year) {
            holiday_set.insert(easter_day + self.shift_period);
        }

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
    fn easter_sunday_known_years() {
        assert_eq!(easter_sunday(2022), Some(ymd(2022, 4, 17)));
        assert_eq!(easter_sunday(2023), Some(ymd(2023, 4, 9)));
        assert_eq!(easter_sunday(2024), Some(ymd(2024, 3, 31)));
        assert_eq!(easter_sunday(1500), None);
    }

    #[test]
    fn shifted_holidays() {
        let good_friday = EasterRelatedHoliday::new(-2);
        let ascension = EasterRelatedHoliday::new(39);
        assert!(good_friday.is_holiday(&ymd(2023, 4, 7)));
        assert!(ascension.is_holiday(&ymd(2023, 5, 18)));
        assert!(!ascension.is_holiday(&ymd(2023, 5, 17)));
    }
}
