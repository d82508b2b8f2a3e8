use std::sync::Arc;

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use swapval::time::calendar::holidaycalendar::HolidayCalendar;
use swapval::time::calendar::jurisdiction::{calendar_for, is_holiday, CalendarError, Jurisdiction};
use swapval::time::calendar::simplecalendar::SimpleCalendar;
use swapval::time::schedule::frequency::Frequency;
use swapval::time::schedule::schedule::{generate_schedule, ScheduleError, ScheduleGenerator};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn quarterly_year_on_holiday_free_calendar() {
    let calendar: Arc<dyn HolidayCalendar> = Arc::new(SimpleCalendar::holiday_free());
    let schedule = generate_schedule(ymd(2023, 1, 1), ymd(2024, 1, 1), "quarterly", &calendar).unwrap();
    let ends: Vec<NaiveDate> = schedule.iter().map(|e| e.period_end()).collect();
    assert_eq!(ends, vec![ymd(2023, 4, 1), ymd(2023, 7, 1), ymd(2023, 10, 1), ymd(2024, 1, 1)]);
    assert!(schedule.iter().all(|e| !e.is_stub()));
}

#[test]
fn usa_independence_day_payment_rolls() {
    let calendar = calendar_for(&[Jurisdiction::USA]);
    let schedule = generate_schedule(ymd(2023, 1, 4), ymd(2024, 1, 4), "6M", &calendar).unwrap();
    assert_eq!(schedule.payment_dates()[0], ymd(2023, 7, 5));
    assert!(is_holiday(ymd(2023, 7, 4), "USA").unwrap());
}

#[test]
fn unknown_inputs_are_errors() {
    let calendar: Arc<dyn HolidayCalendar> = Arc::new(SimpleCalendar::holiday_free());
    assert!(matches!(
        generate_schedule(ymd(2023, 1, 1), ymd(2024, 1, 1), "biweekly", &calendar),
        Err(ScheduleError::InvalidFrequency(_))
    ));
    assert_eq!(
        is_holiday(ymd(2023, 7, 14), "France"),
        Err(CalendarError::UnsupportedJurisdiction("France".to_owned()))
    );
}

fn frequency() -> impl Strategy<Value = Frequency> {
    prop::sample::select(Frequency::ALL.to_vec())
}

fn jurisdictions() -> impl Strategy<Value = Vec<Jurisdiction>> {
    prop::sample::subsequence(Jurisdiction::ALL.to_vec(), 0..=3)
}

proptest! {
    #[test]
    fn schedules_terminate_and_are_ordered(start_offset in 0u64..3000,
                                           length in 1u64..4000,
                                           frequency in frequency(),
                                           jurisdictions in jurisdictions()) {
        let start = ymd(2020, 1, 1).checked_add_days(Days::new(start_offset)).unwrap();
        let end = start.checked_add_days(Days::new(length)).unwrap();
        let calendar = calendar_for(&jurisdictions);
        let schedule = ScheduleGenerator::new(frequency, calendar).generate_schedule(start, end).unwrap();

        prop_assert!(!schedule.is_empty());
        let entries = schedule.entries();
        prop_assert_eq!(entries[0].period_start(), start);
        prop_assert_eq!(entries[entries.len() - 1].period_end(), end);
        for entry in entries {
            prop_assert!(entry.period_start() < entry.period_end());
            prop_assert!(entry.payment_date() >= entry.period_start());
            prop_assert!(entry.accrual_fraction() > 0.0);
        }
        for pair in entries.windows(2) {
            prop_assert_eq!(pair[0].period_end(), pair[1].period_start());
            prop_assert!(pair[0].payment_date() < pair[1].payment_date());
        }
    }
}
