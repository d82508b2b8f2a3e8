use std::collections::HashMap;

use chrono::{
    Datelike,
    NaiveDate,
    Weekday
};
use serde::{
    Serialize,
    Deserialize
};

use super::super::period::Period;


#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum WeekendAdjustment {
    Unadjusted = 0,
    NextWeekday = 1,
    PreviousWeekday = -1
}

/// Observance rule for a holiday that falls on a weekend, stored as one
/// optional day shift per weekday (index 0 = Monday).
#[derive(Clone)]
pub struct WeekendAdjustmentRule {
    rule: [Option<Period>; 7]
}

impl WeekendAdjustmentRule {
    /// Consecutive weekend days in `adjustment_map` are walked over, so a
    /// Saturday holiday moved to the next weekday lands on Monday.
    pub fn new(adjustment_map: &HashMap<Weekday, WeekendAdjustment>) -> WeekendAdjustmentRule {
        let mut rule: [Option<Period>; 7] = [None; 7];

        for (&weekday, &adj) in adjustment_map {
            if adj == WeekendAdjustment::Unadjusted {
                continue;
            }

            let mut to_weekday = weekday;
            let next_weekday = if adj == WeekendAdjustment::NextWeekday {
                Weekday::succ
            } else {
                Weekday::pred
            };

            let mut shift_days = 0;
            let one_day = adj as i32;

            while adjustment_map.contains_key(&to_weekday) {
                to_weekday = next_weekday(&to_weekday);
                shift_days += one_day;
            }

            let idx = weekday.num_days_from_monday() as usize;
            rule[idx] = Some(Period::days(shift_days));
        }

        WeekendAdjustmentRule { rule }
    }

    /// Saturday to Friday, Sunday to Monday (US federal observance).
    pub fn nearest_weekday() -> WeekendAdjustmentRule {
        let mut rule: [Option<Period>; 7] = [None; 7];
        rule[Weekday::Sat.num_days_from_monday() as usize] = Some(Period::days(-1));
        rule[Weekday::Sun.num_days_from_monday() as usize] = Some(Period::days(1));
        WeekendAdjustmentRule { rule }
    }

    pub fn unadjusted() -> WeekendAdjustmentRule {
        WeekendAdjustmentRule { rule: [None; 7] }
    }

    /// Number of weekdays carrying a shift.
    pub fn len(&self) -> usize {
        self.rule.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn adjust(&self, d: NaiveDate) -> NaiveDate {
        let idx = d.weekday().num_days_from_monday() as usize;

        match self.rule[idx] {
            Some(period) => d + period,
            None => d,
        }
    }
}
