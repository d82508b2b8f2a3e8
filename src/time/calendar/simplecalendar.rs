use std::collections::HashSet;
use std::sync::Arc;

use chrono::{
    Datelike,
    Days,
    NaiveDate,
    Weekday
};

use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::recurringholiday::recurringholiday::RecurringHoliday;

/// Weekend days as a bitmask, Mon(0) ... Sun(6).
#[derive(Clone, Copy)]
struct WeekendMask(u8);

impl WeekendMask {
    fn new(weekends: &HashSet<Weekday>) -> Self {
        let mut mask = 0u8;
        for &weekday in weekends {
            mask |= 1u8 << weekday.num_days_from_monday();
        }
        WeekendMask(mask)
    }

    #[inline]
    fn is_weekend(&self, weekday: Weekday) -> bool {
        let bit = 1u8 << weekday.num_days_from_monday();
        (self.0 & bit) != 0
    }

    fn weekend_list(&self) -> Vec<Weekday> {
        let mut weekdays = Vec::with_capacity(7);
        for day in 0..7u8 {
            if (self.0 & (1u8 << day)) != 0 {
                if let Ok(weekday) = Weekday::try_from(day) {
                    weekdays.push(weekday);
                }
            }
        }
        weekdays
    }
}

pub fn saturday_sunday() -> HashSet<Weekday> {
    HashSet::from([Weekday::Sat, Weekday::Sun])
}

pub struct SimpleCalendar {
    weekends: WeekendMask,
    recurring_holidays: Vec<Arc<dyn RecurringHoliday>>,
    additional_holidays: HashSet<NaiveDate>,
    additional_business_days: HashSet<NaiveDate>
}

impl SimpleCalendar {
    /// Creates a new SimpleCalendar.
    ///
    /// # Arguments
    /// * `weekends` - Set of weekdays that are considered weekends
    /// * `recurring_holidays` - List of recurring holiday rules
    /// * `additional_holidays` - One-time holidays
    /// * `additional_business_days` - Special business days that override weekends/holidays
    pub fn new(
        weekends: HashSet<Weekday>,
        recurring_holidays: Vec<Arc<dyn RecurringHoliday>>,
        additional_holidays: Vec<NaiveDate>,
        additional_business_days: Vec<NaiveDate>
    ) -> SimpleCalendar {
        SimpleCalendar {
            weekends: WeekendMask::new(&weekends),
            recurring_holidays,
            additional_holidays: additional_holidays.into_iter().collect(),
            additional_business_days: additional_business_days.into_iter().collect()
        }
    }

    /// Every day is a business day.
    pub fn holiday_free() -> SimpleCalendar {
        SimpleCalendar::new(HashSet::new(), Vec::new(), Vec::new(), Vec::new())
    }

    /// Saturday and Sunday are the only non-business days.
    pub fn weekends_only() -> SimpleCalendar {
        SimpleCalendar::new(saturday_sunday(), Vec::new(), Vec::new(), Vec::new())
    }

    #[inline]
    pub fn is_weekend(&self, d: NaiveDate) -> bool {
        self.weekends.is_weekend(d.weekday())
    }

    pub fn is_recurring_holiday(&self, d: NaiveDate) -> bool {
        self.recurring_holidays.iter().any(|r| r.is_holiday(&d))
    }

    #[inline]
    pub fn is_additional_holiday(&self, d: NaiveDate) -> bool {
        self.additional_holidays.contains(&d)
    }

    #[inline]
    pub fn is_additional_business_day(&self, d: NaiveDate) -> bool {
        self.additional_business_days.contains(&d)
    }

    /// True for a named (recurring or additional) holiday, whatever the weekday.
    pub fn is_named_holiday(&self, d: NaiveDate) -> bool {
        !self.is_additional_business_day(d)
            && (self.is_additional_holiday(d) || self.is_recurring_holiday(d))
    }

    pub fn weekends(&self) -> Vec<Weekday> {
        self.weekends.weekend_list()
    }
}

const SEVEN_DAYS: Days = Days::new(7);

impl HolidayCalendar for SimpleCalendar {
    fn is_holiday(&self, d: NaiveDate) -> bool {
        if self.is_weekend(d) {
            return !self.is_additional_business_day(d);
        }

        if self.is_additional_business_day(d) {
            return false;
        }

        if self.is_additional_holiday(d) {
            return true;
        }

        self.is_recurring_holiday(d)
    }

    /// All non-business days of `year`, weekends included.
    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        let mut holiday_set = HashSet::with_capacity(120);

        if let (Some(year_start), Some(year_end)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31)
        ) {
            for target_weekday in self.weekends.weekend_list() {
                let offset = (target_weekday.num_days_from_monday() as i64
                              - year_start.weekday().num_days_from_monday() as i64).rem_euclid(7) as u64;
                let mut current = year_start + Days::new(offset);
                while current <= year_end {
                    holiday_set.insert(current);
                    current = current + SEVEN_DAYS;
                }
            }
        }

        for r in self.recurring_holidays.iter() {
            holiday_set.extend(r.get_holiday(year));
        }

        holiday_set.extend(
            self.additional_holidays
                .iter()
                .filter(|d| d.year() == year)
                .copied()
        );

        for b_day in self.additional_business_days.iter().filter(|d| d.year() == year) {
            holiday_set.remove(b_day);
        }

        holiday_set
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::recurringholiday::nthweekdayholiday::NthWeekdayHoliday;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn holiday_free_calendar_has_no_holidays() {
        let calendar = SimpleCalendar::holiday_free();
        // 2023-04-01 is a Saturday
        assert!(calendar.is_business_day(ymd(2023, 4, 1)));
        assert!(calendar.get_holiday_set(2023).is_empty());
    }

    #[test]
    fn weekends_and_overrides() {
        let labor_day: Arc<dyn RecurringHoliday> = Arc::new(NthWeekdayHoliday::new(9, 1, Weekday::Mon).unwrap());
        let calendar = SimpleCalendar::new(
            saturday_sunday(),
            vec![labor_day],
            vec![ymd(2023, 3, 15)],
            vec![ymd(2023, 3, 18)]
        );
        assert!(calendar.is_holiday(ymd(2023, 9, 4)));
        assert!(calendar.is_named_holiday(ymd(2023, 9, 4)));
        assert!(calendar.is_holiday(ymd(2023, 3, 15)));
        assert!(calendar.is_holiday(ymd(2023, 3, 19)));
        assert!(!calendar.is_named_holiday(ymd(2023, 3, 19)));
        assert!(calendar.is_business_day(ymd(2023, 3, 18)));
        assert_eq!(calendar.next_business_day(ymd(2023, 9, 1)), ymd(2023, 9, 5));
        assert_eq!(calendar.previous_business_day(ymd(2023, 9, 5)), ymd(2023, 9, 1));
    }

    #[test]
    fn holiday_set_counts_weekends() {
        let calendar = SimpleCalendar::weekends_only();
        // 2023 has 53 Sundays and 52 Saturdays
        assert_eq!(calendar.get_holiday_set(2023).len(), 105);
        assert_eq!(calendar.weekends().len(), 2);
    }
}
