use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::time::calendar::holidaycalendar::HolidayCalendar;

/// Combines two calendars using logical operations (union or intersection).
///
/// # Union
/// A date is a holiday if it's a holiday in EITHER calendar.
/// Use case: a swap paying in USD and SEK needs both markets open.
///
/// # Intersection
/// A date is a holiday if it's a holiday in BOTH calendars.
pub struct JointCalendar {
    c1: Arc<dyn HolidayCalendar>,
    c2: Arc<dyn HolidayCalendar>,
    logical_operator: fn(bool, bool) -> bool
}

impl JointCalendar {
    pub fn union(c1: Arc<dyn HolidayCalendar>, c2: Arc<dyn HolidayCalendar>) -> JointCalendar {
        JointCalendar {
            c1,
            c2,
            logical_operator: |b1, b2| b1 || b2
        }
    }

    pub fn intersection(c1: Arc<dyn HolidayCalendar>, c2: Arc<dyn HolidayCalendar>) -> JointCalendar {
        JointCalendar {
            c1,
            c2,
            logical_operator: |b1, b2| b1 && b2
        }
    }

    pub fn is_union(&self) -> bool {
        (self.logical_operator)(true, false)
    }

    pub fn is_intersection(&self) -> bool {
        !self.is_union()
    }

    pub fn c1(&self) -> &Arc<dyn HolidayCalendar> {
        &self.c1
    }

    pub fn c2(&self) -> &Arc<dyn HolidayCalendar> {
        &self.c2
    }
}

impl HolidayCalendar for JointCalendar {
    #[inline]
    fn is_holiday(&self, d: NaiveDate) -> bool {
        (self.logical_operator)(self.c1.is_holiday(d), self.c2.is_holiday(d))
    }

    fn get_holiday_set(&self, year: i32) -> HashSet<NaiveDate> {
        let s1 = self.c1.get_holiday_set(year);
        let s2 = self.c2.get_holiday_set(year);

        if self.is_union() {
            s1.union(&s2).copied().collect()
        } else {
            s1.intersection(&s2).copied().collect()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::calendar::simplecalendar::SimpleCalendar;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar_with(holiday: NaiveDate) -> Arc<dyn HolidayCalendar> {
        Arc::new(SimpleCalendar::new(HashSet::new(), Vec::new(), vec![holiday], Vec::new()))
    }

    #[test]
    fn union_and_intersection() {
        let c1 = calendar_with(ymd(2023, 3, 1));
        let c2 = calendar_with(ymd(2023, 3, 2));
        let union = JointCalendar::union(c1.clone(), c2.clone());
        let intersection = JointCalendar::intersection(c1, c2);

        assert!(union.is_union());
        assert!(union.is_holiday(ymd(2023, 3, 1)));
        assert!(union.is_holiday(ymd(2023, 3, 2)));
        assert_eq!(union.next_business_day(ymd(2023, 2, 28)), ymd(2023, 3, 3));

        assert!(intersection.is_intersection());
        assert!(!intersection.is_holiday(ymd(2023, 3, 1)));
        assert!(intersection.get_holiday_set(2023).is_empty());
    }
}
