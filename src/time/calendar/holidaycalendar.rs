use std::collections::HashSet;

use chrono::{Days, NaiveDate};

const ONE_DAY: Days = Days::new(1);

/// A business-day calendar. `is_holiday` is true for every non-business
/// day, weekends included.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, d: NaiveDate) -> bool;

    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate>;

    fn is_business_day(&self, d: NaiveDate) -> bool {
        !self.is_holiday(d)
    }

    /// Moves `n` business days away from `horizon`; `horizon` itself is not counted.
    fn shift_n_business_day(&self, horizon: NaiveDate, n: i32) -> NaiveDate {
        let shif_one_day = if n >= 0 {
            |d: NaiveDate| d + ONE_DAY
        } else {
            |d: NaiveDate| d - ONE_DAY
        };

        let mut m = n.unsigned_abs();
        let mut d = horizon;
        while m > 0 {
            d = shif_one_day(d);
            m -= self.is_business_day(d) as u32;
        }
        d
    }

    fn next_business_day(&self, d: NaiveDate) -> NaiveDate {
        self.shift_n_business_day(d, 1)
    }

    fn previous_business_day(&self, d: NaiveDate) -> NaiveDate {
        self.shift_n_business_day(d, -1)
    }
}
