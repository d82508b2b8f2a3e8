use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::time::businessdayadjuster::{
    BusinessDayAdjuster,
    BusinessDayConvention
};
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::period::Period;
use super::frequency::Frequency;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Deserialize)]
pub enum GenerationMode {
    /// Boundary k is `start + k * frequency`, rolled to a business day.
    Normal,
    /// Each boundary is the previous rolled boundary plus one frequency step.
    #[default]
    Recursive,
}

/// An accrual interval before payment dates and accrual fractions are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
    is_stub: bool
}

impl CalculationPeriod {
    pub fn regular(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self { start_date, end_date, is_stub: false }
    }

    pub fn stub(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self { start_date, end_date, is_stub: true }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn is_stub(&self) -> bool {
        self.is_stub
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CalculationPeriodGenerator {
    frequency: Frequency,
    freq_adjuster: BusinessDayAdjuster,
    mode: GenerationMode
}

impl CalculationPeriodGenerator {
    pub fn new(frequency: Frequency, mode: GenerationMode) -> CalculationPeriodGenerator {
        CalculationPeriodGenerator {
            frequency,
            freq_adjuster: BusinessDayAdjuster::new(BusinessDayConvention::Following),
            mode
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn freq_adjuster(&self) -> &BusinessDayAdjuster {
        &self.freq_adjuster
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// Splits `[start_date, end_date]` into consecutive periods.
    ///
    /// Interior boundaries are rolled with the following convention. A
    /// boundary whose unadjusted or rolled date reaches `end_date` becomes
    /// the final boundary and is set to `end_date` itself. Returns an empty
    /// vector when `start_date >= end_date`.
    pub fn generate(&self,
                    calendar: &Arc<dyn HolidayCalendar>,
                    start_date: NaiveDate,
                    end_date: NaiveDate) -> Vec<CalculationPeriod> {
        let mut calculation_periods: Vec<CalculationPeriod> = Vec::new();
        let mut d1 = start_date;
        let mut step = 0;

        while d1 < end_date {
            step += 1;
            let unadjusted = match self.mode {
                GenerationMode::Normal => start_date + Period::months(step * self.frequency.months()),
                GenerationMode::Recursive => d1 + self.frequency.period()
            };

            if unadjusted > end_date {
                calculation_periods.push(CalculationPeriod::stub(d1, end_date));
                break;
            }

            let d2 = self.freq_adjuster.adjust(unadjusted, calendar);
            if d2 >= end_date {
                calculation_periods.push(CalculationPeriod::regular(d1, end_date));
                break;
            }

            // a long holiday run can roll a Normal-mode boundary onto the next one
            if d2 <= d1 {
                continue;
            }

            calculation_periods.push(CalculationPeriod::regular(d1, d2));
            d1 = d2;
        }

        calculation_periods
    }
}
