use std::sync::Arc;

use chrono::NaiveDate;
use serde::{
    Serialize,
    Deserialize
};

use crate::time::calendar::holidaycalendar::HolidayCalendar;

fn unadjust(d: NaiveDate, _calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    d
}

fn following(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    calendar.next_business_day(d)
}

fn preceding(d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
    calendar.previous_business_day(d)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum BusinessDayConvention {
    Unadjusted,
    Following,
    Preceding
}

#[derive(Clone, Copy, Deserialize)]
#[serde(from = "BusinessDayConvention")]
pub struct BusinessDayAdjuster {
    convention: BusinessDayConvention,
    adjuster: fn(NaiveDate, &Arc<dyn HolidayCalendar>) -> NaiveDate
}

impl BusinessDayAdjuster {
    pub fn new(convention: BusinessDayConvention) -> BusinessDayAdjuster {
        let adjuster = match convention {
            BusinessDayConvention::Unadjusted => unadjust,
            BusinessDayConvention::Following => following,
            BusinessDayConvention::Preceding => preceding
        };
        BusinessDayAdjuster { convention, adjuster }
    }

    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Returns `d` unchanged on a business day, otherwise the adjusted date.
    pub fn adjust(&self, d: NaiveDate, calendar: &Arc<dyn HolidayCalendar>) -> NaiveDate {
        if calendar.is_holiday(d) {
            (self.adjuster)(d, calendar)
        } else {
            d
        }
    }
}

impl From<BusinessDayConvention> for BusinessDayAdjuster {
    fn from(convention: BusinessDayConvention) -> Self {
        BusinessDayAdjuster::new(convention)
    }
}

impl std::fmt::Debug for BusinessDayAdjuster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessDayAdjuster")
            .field("convention", &self.convention)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::calendar::jurisdiction::Jurisdiction;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn following_and_preceding_around_independence_day() {
        let calendar: Arc<dyn HolidayCalendar> = Jurisdiction::USA.calendar();
        let following = BusinessDayAdjuster::new(BusinessDayConvention::Following);
        let preceding = BusinessDayAdjuster::new(BusinessDayConvention::Preceding);
        let unadjusted = BusinessDayAdjuster::new(BusinessDayConvention::Unadjusted);

        assert_eq!(following.adjust(ymd(2023, 7, 4), &calendar), ymd(2023, 7, 5));
        assert_eq!(preceding.adjust(ymd(2023, 7, 4), &calendar), ymd(2023, 7, 3));
        assert_eq!(unadjusted.adjust(ymd(2023, 7, 4), &calendar), ymd(2023, 7, 4));
        assert_eq!(following.adjust(ymd(2023, 7, 6), &calendar), ymd(2023, 7, 6));
    }

    #[test]
    fn deserializes_from_convention_name() {
        let adjuster: BusinessDayAdjuster = serde_json::from_str("\"Preceding\"").unwrap();
        assert_eq!(adjuster.convention(), BusinessDayConvention::Preceding);
    }
}
