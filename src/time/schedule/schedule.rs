use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::time::businessdayadjuster::{
    BusinessDayAdjuster,
    BusinessDayConvention
};
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::daycounter::daycounter::{
    DayCountConvention,
    DayCounter
};
use super::calculationperiodgenerator::{
    CalculationPeriodGenerator,
    GenerationMode
};
use super::cashflowentry::CashflowEntry;
use super::frequency::Frequency;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid payment frequency '{0}'")]
    InvalidFrequency(String),
    #[error("invalid date range: start {start} is not before end {end}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate
    }
}

/// How the payment date of the last period is set when the end date is not
/// a business day. The last `period_end` is the end date in every case.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Deserialize)]
pub enum FinalPaymentPolicy {
    /// Pay on the end date itself.
    #[default]
    Clamp,
    /// Pay on the preceding business day, but not before the period start.
    RollBackward,
    /// Pay on the following business day, possibly after the end date.
    Overrun
}

// ─────────────────────────────────────────────────────────────────────────────
// Schedule
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Schedule {
    start_date: NaiveDate,
    end_date: NaiveDate,
    frequency: Frequency,
    entries: Vec<CashflowEntry>
}

impl Schedule {
    pub fn new(start_date: NaiveDate,
               end_date: NaiveDate,
               frequency: Frequency,
               entries: Vec<CashflowEntry>) -> Schedule {
        Schedule {
            start_date,
            end_date,
            frequency,
            entries
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn entries(&self) -> &[CashflowEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CashflowEntry> {
        self.entries.iter()
    }

    pub fn payment_dates(&self) -> Vec<NaiveDate> {
        self.entries.iter().map(|e| e.payment_date()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a CashflowEntry;
    type IntoIter = std::slice::Iter<'a, CashflowEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScheduleGenerator
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ScheduleGenerator {
    calculation_period_generator: CalculationPeriodGenerator,
    calendar: Arc<dyn HolidayCalendar>,
    final_payment_policy: FinalPaymentPolicy,
    day_counter: DayCounter
}

impl ScheduleGenerator {
    /// Recursive generation, `Clamp` final payment and Actual/360 accruals.
    pub fn new(frequency: Frequency, calendar: Arc<dyn HolidayCalendar>) -> ScheduleGenerator {
        ScheduleGenerator {
            calculation_period_generator: CalculationPeriodGenerator::new(frequency, GenerationMode::default()),
            calendar,
            final_payment_policy: FinalPaymentPolicy::default(),
            day_counter: DayCountConvention::Actual360.day_counter()
        }
    }

    pub fn with_generation_mode(mut self, mode: GenerationMode) -> ScheduleGenerator {
        self.calculation_period_generator = CalculationPeriodGenerator::new(self.frequency(), mode);
        self
    }

    pub fn with_final_payment_policy(mut self, policy: FinalPaymentPolicy) -> ScheduleGenerator {
        self.final_payment_policy = policy;
        self
    }

    pub fn with_day_counter(mut self, day_counter: DayCounter) -> ScheduleGenerator {
        self.day_counter = day_counter;
        self
    }

    pub fn frequency(&self) -> Frequency {
        self.calculation_period_generator.frequency()
    }

    pub fn generation_mode(&self) -> GenerationMode {
        self.calculation_period_generator.mode()
    }

    pub fn final_payment_policy(&self) -> FinalPaymentPolicy {
        self.final_payment_policy
    }

    pub fn day_counter(&self) -> &DayCounter {
        &self.day_counter
    }

    pub fn calendar(&self) -> &Arc<dyn HolidayCalendar> {
        &self.calendar
    }

    fn final_payment_date(&self, period_start: NaiveDate, end_date: NaiveDate) -> NaiveDate {
        match self.final_payment_policy {
            FinalPaymentPolicy::Clamp => end_date,
            FinalPaymentPolicy::RollBackward => {
                BusinessDayAdjuster::new(BusinessDayConvention::Preceding)
                    .adjust(end_date, &self.calendar)
                    .max(period_start)
            }
            FinalPaymentPolicy::Overrun => {
                let payment_date = BusinessDayAdjuster::new(BusinessDayConvention::Following)
                    .adjust(end_date, &self.calendar);
                if payment_date > end_date {
                    warn!(%end_date, %payment_date, "final payment rolled past the end date");
                }
                payment_date
            }
        }
    }

    pub fn generate_schedule(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<Schedule, ScheduleError> {
        if start_date >= end_date {
            return Err(ScheduleError::InvalidDateRange { start: start_date, end: end_date });
        }

        let calculation_periods = self.calculation_period_generator.generate(&self.calendar, start_date, end_date);
        let n = calculation_periods.len();
        let entries: Vec<CashflowEntry> = calculation_periods
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let payment_date = if i + 1 == n {
                    self.final_payment_date(p.start_date(), p.end_date())
                } else {
                    p.end_date()
                };
                CashflowEntry::new(
                    p.start_date(),
                    p.end_date(),
                    payment_date,
                    self.day_counter.year_fraction(p.start_date(), p.end_date()),
                    p.is_stub()
                )
            })
            .collect();

        debug!(
            %start_date,
            %end_date,
            frequency = %self.frequency(),
            periods = entries.len(),
            "generated schedule"
        );
        Ok(Schedule::new(start_date, end_date, self.frequency(), entries))
    }
}

impl std::fmt::Debug for ScheduleGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleGenerator")
            .field("frequency", &self.frequency())
            .field("mode", &self.generation_mode())
            .field("final_payment_policy", &self.final_payment_policy)
            .field("day_counter", &self.day_counter)
            .finish()
    }
}

/// Generates a schedule with default options from a frequency name or tenor.
pub fn generate_schedule(start_date: NaiveDate,
                         end_date: NaiveDate,
                         frequency: &str,
                         calendar: &Arc<dyn HolidayCalendar>) -> Result<Schedule, ScheduleError> {
    let frequency: Frequency = frequency.parse()?;
    ScheduleGenerator::new(frequency, calendar.clone()).generate_schedule(start_date, end_date)
}
