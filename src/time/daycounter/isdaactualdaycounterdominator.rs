use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use super::daycounter::{
    DayCounterNumerator,
    DayCounterDominator
};
use super::super::utility::is_leap;


pub struct ISDAActualDayCounterDominator;

impl ISDAActualDayCounterDominator {
    pub fn new() -> ISDAActualDayCounterDominator {
        ISDAActualDayCounterDominator {}
    }
}

impl Default for ISDAActualDayCounterDominator {
    fn default() -> Self {
        ISDAActualDayCounterDominator::new()
    }
}

fn get_dominator (year: i32) -> f64 {
    if is_leap(year) {
        366.0
    } else {
        365.0
    }
}

fn new_year(year: i32) -> NaiveDate {
    // January 1st exists for every year chrono can represent here
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
}

impl DayCounterDominator for ISDAActualDayCounterDominator {
    /// Days in each calendar year are divided by that year's length.
    fn year_fraction(&self,
                     start_date: NaiveDate,
                     end_date: NaiveDate,
                     numerator: &Arc<dyn DayCounterNumerator>) -> f64 {
        let start_year = start_date.year();
        let end_year = end_date.year();
        if start_year == end_year {
            numerator.days_between(start_date, end_date) / get_dominator(start_year)
        } else {
            let mut result = numerator.days_between(start_date, new_year(start_year + 1)) / get_dominator(start_year);
            result += numerator.days_between(new_year(end_year), end_date) / get_dominator(end_year);
            result += (end_year - start_year - 1) as f64;
            result
        }
    }
}
