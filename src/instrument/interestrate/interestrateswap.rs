use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::instrument::instrument::{
    Instrument,
    Position
};
use crate::model::interestrate::ratecurve::{
    CurveError,
    CurveKind,
    RateCurve
};
use crate::pricingcondition::PricingCondition;
use crate::time::calendar::holidaycalendar::HolidayCalendar;
use crate::time::calendar::jurisdiction::{
    calendar_for,
    CalendarError,
    Jurisdiction
};
use crate::time::daycounter::daycounter::{
    DayCountConvention,
    DayCountError
};
use crate::time::schedule::calculationperiodgenerator::GenerationMode;
use crate::time::schedule::cashflowentry::CashflowEntry;
use crate::time::schedule::frequency::Frequency;
use crate::time::schedule::schedule::{
    FinalPaymentPolicy,
    Schedule,
    ScheduleError,
    ScheduleGenerator
};
use crate::value::cashflows::CashFlows;
use crate::value::npv::{
    Npv,
    NpvArithmeticError
};

#[derive(Debug, Error)]
pub enum ValuationError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    DayCount(#[from] DayCountError),
    #[error("expected a {expected} curve, got a {found} curve")]
    CurveKindMismatch {
        expected: CurveKind,
        found: CurveKind
    },
    #[error(transparent)]
    ValuationDateMismatch(#[from] NpvArithmeticError)
}

fn check_kind(curve: &RateCurve, expected: CurveKind) -> Result<(), ValuationError> {
    if curve.kind() == expected {
        Ok(())
    } else {
        Err(ValuationError::CurveKindMismatch { expected, found: curve.kind() })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SwapTerms
// ─────────────────────────────────────────────────────────────────────────────

fn default_notional() -> f64 {
    1_000_000_000.0
}

fn default_fixed_rate() -> f64 {
    0.01
}

fn default_payment_frequency() -> Frequency {
    Frequency::SemiAnnually
}

fn default_holiday_calendars() -> Vec<Jurisdiction> {
    vec![Jurisdiction::USA, Jurisdiction::Sweden]
}

fn default_fixed_day_count() -> DayCountConvention {
    DayCountConvention::Thirty360
}

fn default_floating_day_count() -> DayCountConvention {
    DayCountConvention::Actual360
}

/// Contract terms of a fixed-for-floating swap.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SwapTerms {
    #[serde(default = "default_notional")]
    notional: f64,
    #[serde(default = "default_fixed_rate")]
    fixed_rate: f64,
    #[serde(default = "default_payment_frequency")]
    payment_frequency: Frequency,
    #[serde(default)]
    floating_payment_frequency: Option<Frequency>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default = "default_holiday_calendars")]
    holiday_calendars: Vec<Jurisdiction>,
    #[serde(default = "default_fixed_day_count")]
    fixed_day_count: DayCountConvention,
    #[serde(default = "default_floating_day_count")]
    floating_day_count: DayCountConvention,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    generation_mode: GenerationMode,
    #[serde(default)]
    final_payment_policy: FinalPaymentPolicy
}

impl SwapTerms {
    /// 1bn notional receiving 1% semi-annually on USA and Sweden holidays.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> SwapTerms {
        SwapTerms {
            notional: default_notional(),
            fixed_rate: default_fixed_rate(),
            payment_frequency: default_payment_frequency(),
            floating_payment_frequency: None,
            start_date,
            end_date,
            holiday_calendars: default_holiday_calendars(),
            fixed_day_count: default_fixed_day_count(),
            floating_day_count: default_floating_day_count(),
            position: Position::default(),
            generation_mode: GenerationMode::default(),
            final_payment_policy: FinalPaymentPolicy::default()
        }
    }

    pub fn with_notional(mut self, notional: f64) -> SwapTerms {
        self.notional = notional;
        self
    }

    pub fn with_fixed_rate(mut self, fixed_rate: f64) -> SwapTerms {
        self.fixed_rate = fixed_rate;
        self
    }

    pub fn with_payment_frequency(mut self, frequency: Frequency) -> SwapTerms {
        self.payment_frequency = frequency;
        self
    }

    pub fn with_floating_payment_frequency(mut self, frequency: Frequency) -> SwapTerms {
        self.floating_payment_frequency = Some(frequency);
        self
    }

    pub fn with_holiday_calendars(mut self, holiday_calendars: Vec<Jurisdiction>) -> SwapTerms {
        self.holiday_calendars = holiday_calendars;
        self
    }

    pub fn with_day_counts(mut self, fixed: DayCountConvention, floating: DayCountConvention) -> SwapTerms {
        self.fixed_day_count = fixed;
        self.floating_day_count = floating;
        self
    }

    pub fn with_position(mut self, position: Position) -> SwapTerms {
        self.position = position;
        self
    }

    pub fn with_generation_mode(mut self, generation_mode: GenerationMode) -> SwapTerms {
        self.generation_mode = generation_mode;
        self
    }

    pub fn with_final_payment_policy(mut self, policy: FinalPaymentPolicy) -> SwapTerms {
        self.final_payment_policy = policy;
        self
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }

    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    pub fn payment_frequency(&self) -> Frequency {
        self.payment_frequency
    }

    pub fn floating_payment_frequency(&self) -> Frequency {
        self.floating_payment_frequency.unwrap_or(self.payment_frequency)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn holiday_calendars(&self) -> &[Jurisdiction] {
        &self.holiday_calendars
    }

    pub fn fixed_day_count(&self) -> DayCountConvention {
        self.fixed_day_count
    }

    pub fn floating_day_count(&self) -> DayCountConvention {
        self.floating_day_count
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projected flows
// ─────────────────────────────────────────────────────────────────────────────

/// A schedule entry with its rate and cash amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedFlow {
    entry: CashflowEntry,
    rate: f64,
    amount: f64
}

impl ProjectedFlow {
    pub fn new(entry: CashflowEntry, rate: f64, notional: f64) -> ProjectedFlow {
        ProjectedFlow {
            entry,
            rate,
            amount: notional * rate * entry.accrual_fraction()
        }
    }

    pub fn entry(&self) -> &CashflowEntry {
        &self.entry
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.entry.payment_date()
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

fn to_cash_flows(flows: &[ProjectedFlow]) -> CashFlows {
    flows.iter().map(|f| (f.payment_date(), f.amount())).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapValuation {
    fixed_leg: Npv,
    floating_leg: Npv,
    npv: Npv
}

impl SwapValuation {
    pub fn fixed_leg(&self) -> Npv {
        self.fixed_leg
    }

    pub fn floating_leg(&self) -> Npv {
        self.floating_leg
    }

    /// Signed by position: receive-fixed gets fixed minus floating.
    pub fn npv(&self) -> Npv {
        self.npv
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InterestRateSwap
// ─────────────────────────────────────────────────────────────────────────────

pub struct InterestRateSwap {
    terms: SwapTerms,
    fixed_leg_generator: ScheduleGenerator,
    floating_leg_generator: ScheduleGenerator
}

impl InterestRateSwap {
    pub fn new(terms: SwapTerms) -> Result<InterestRateSwap, ValuationError> {
        if terms.start_date >= terms.end_date {
            return Err(ScheduleError::InvalidDateRange { start: terms.start_date, end: terms.end_date }.into());
        }

        let calendar: Arc<dyn HolidayCalendar> = calendar_for(&terms.holiday_calendars);
        let leg_generator = |frequency: Frequency, day_count: DayCountConvention| {
            ScheduleGenerator::new(frequency, calendar.clone())
                .with_generation_mode(terms.generation_mode)
                .with_final_payment_policy(terms.final_payment_policy)
                .with_day_counter(day_count.day_counter())
        };
        let fixed_leg_generator = leg_generator(terms.payment_frequency(), terms.fixed_day_count);
        let floating_leg_generator = leg_generator(terms.floating_payment_frequency(), terms.floating_day_count);

        Ok(InterestRateSwap {
            terms,
            fixed_leg_generator,
            floating_leg_generator
        })
    }

    pub fn terms(&self) -> &SwapTerms {
        &self.terms
    }

    pub fn fixed_leg_schedule(&self) -> Result<Schedule, ScheduleError> {
        self.fixed_leg_generator.generate_schedule(self.terms.start_date, self.terms.end_date)
    }

    pub fn floating_leg_schedule(&self) -> Result<Schedule, ScheduleError> {
        self.floating_leg_generator.generate_schedule(self.terms.start_date, self.terms.end_date)
    }

    pub fn fixed_leg_flows(&self) -> Result<Vec<ProjectedFlow>, ValuationError> {
        Ok(self
            .fixed_leg_schedule()?
            .iter()
            .map(|entry| ProjectedFlow::new(*entry, self.terms.fixed_rate, self.terms.notional))
            .collect())
    }

    /// Each period pays the simple forward implied by `forecast_curve` over it.
    ///
    /// The forward comes from the curve's discount factors at the period
    /// start and end, which read the interpolated rate of
    /// [`RateCurve::get_rate`] on those two dates.
    pub fn floating_leg_flows(&self, forecast_curve: &RateCurve) -> Result<Vec<ProjectedFlow>, ValuationError> {
        check_kind(forecast_curve, CurveKind::Forecast)?;
        Ok(self
            .floating_leg_schedule()?
            .iter()
            .map(|entry| {
                let rate = forecast_curve.forward_rate(entry.period_start(), entry.period_end(), entry.accrual_fraction());
                ProjectedFlow::new(*entry, rate, self.terms.notional)
            })
            .collect())
    }

    pub fn fixed_leg_cashflows(&self) -> Result<CashFlows, ValuationError> {
        Ok(to_cash_flows(&self.fixed_leg_flows()?))
    }

    pub fn floating_leg_cashflows(&self, forecast_curve: &RateCurve) -> Result<CashFlows, ValuationError> {
        Ok(to_cash_flows(&self.floating_leg_flows(forecast_curve)?))
    }

    /// Present value of `cash_flows` on `discount_curve`, as of the pricing horizon.
    pub fn discount_cash_flows(&self,
                               cash_flows: &CashFlows,
                               discount_curve: &RateCurve,
                               pricing_condition: &PricingCondition) -> Result<Npv, ValuationError> {
        check_kind(discount_curve, CurveKind::Discount)?;
        Ok(Npv::new(cash_flows.npv(discount_curve, pricing_condition), pricing_condition.horizon()))
    }

    /// Values the swap as of the discount curve date.
    pub fn value_swap(&self, forecast_curve: &RateCurve, discount_curve: &RateCurve) -> Result<SwapValuation, ValuationError> {
        self.value_swap_at(forecast_curve, discount_curve, &PricingCondition::at(discount_curve.curve_date()))
    }

    pub fn value_swap_at(&self,
                         forecast_curve: &RateCurve,
                         discount_curve: &RateCurve,
                         pricing_condition: &PricingCondition) -> Result<SwapValuation, ValuationError> {
        check_kind(discount_curve, CurveKind::Discount)?;
        let fixed_leg = self.discount_cash_flows(&self.fixed_leg_cashflows()?, discount_curve, pricing_condition)?;
        let floating_leg = self.discount_cash_flows(&self.floating_leg_cashflows(forecast_curve)?, discount_curve, pricing_condition)?;
        let npv = (fixed_leg - floating_leg)? * self.terms.position.sign();

        debug!(
            fixed_leg = fixed_leg.amount(),
            floating_leg = floating_leg.amount(),
            npv = npv.amount(),
            horizon = %pricing_condition.horizon(),
            "valued swap"
        );
        Ok(SwapValuation { fixed_leg, floating_leg, npv })
    }

    /// Fixed rate at which the swap is worth zero on the given curves.
    pub fn par_rate(&self, forecast_curve: &RateCurve, discount_curve: &RateCurve) -> Result<f64, ValuationError> {
        let pricing_condition = PricingCondition::at(discount_curve.curve_date());
        let floating_leg = self.discount_cash_flows(&self.floating_leg_cashflows(forecast_curve)?, discount_curve, &pricing_condition)?;
        let annuity: CashFlows = self
            .fixed_leg_schedule()?
            .iter()
            .map(|entry| (entry.payment_date(), self.terms.notional * entry.accrual_fraction()))
            .collect();
        let annuity = self.discount_cash_flows(&annuity, discount_curve, &pricing_condition)?;
        Ok(floating_leg.amount() / annuity.amount())
    }
}

impl Instrument for InterestRateSwap {
    fn position(&self) -> Position {
        self.terms.position
    }

    fn max_date(&self) -> NaiveDate {
        let last_payment = |schedule: Result<Schedule, ScheduleError>| {
            schedule.ok().and_then(|s| s.entries().last().map(|e| e.payment_date()))
        };
        [last_payment(self.fixed_leg_schedule()), last_payment(self.floating_leg_schedule())]
            .into_iter()
            .flatten()
            .fold(self.terms.end_date, NaiveDate::max)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::model::interestrate::interestratecurve::InterestRateCurve;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quotes() -> Vec<(NaiveDate, f64)> {
        vec![
            (ymd(2023, 1, 2), 0.0430),
            (ymd(2023, 4, 1), 0.0445),
            (ymd(2023, 7, 1), 0.0460),
            (ymd(2024, 1, 1), 0.0455),
            (ymd(2025, 1, 1), 0.0420),
            (ymd(2028, 1, 1), 0.0390),
        ]
    }

    fn curve(kind: CurveKind) -> RateCurve {
        RateCurve::new(ymd(2023, 1, 1), kind, quotes()).unwrap()
    }

    fn terms() -> SwapTerms {
        SwapTerms::new(ymd(2023, 1, 3), ymd(2026, 1, 5))
            .with_notional(100_000_000.0)
            .with_fixed_rate(0.04)
            .with_holiday_calendars(vec![Jurisdiction::USA])
    }

    #[test]
    fn fixed_leg_amounts_use_fixed_day_count() {
        let swap = InterestRateSwap::new(terms()).unwrap();
        let flows = swap.fixed_leg_flows().unwrap();
        assert_eq!(flows.len(), 6);
        let first = flows[0];
        assert_eq!(first.entry().period_end(), ymd(2023, 7, 3));
        // 30/360 from Jan 3 to Jul 3
        assert_abs_diff_eq!(first.amount(), 100_000_000.0 * 0.04 * 0.5, epsilon = 1e-6);
        assert_eq!(flows.last().unwrap().payment_date(), ymd(2026, 1, 5));
    }

    #[test]
    fn floating_leg_telescopes_on_a_single_curve() {
        let swap = InterestRateSwap::new(terms()).unwrap();
        let forecast = curve(CurveKind::Forecast);
        let discount = curve(CurveKind::Discount);
        let floating = swap
            .discount_cash_flows(&swap.floating_leg_cashflows(&forecast).unwrap(), &discount, &PricingCondition::at(ymd(2023, 1, 1)))
            .unwrap();
        let expected = 100_000_000.0 * (discount.discount(ymd(2023, 1, 3)) - discount.discount(ymd(2026, 1, 5)));
        assert_abs_diff_eq!(floating.amount(), expected, epsilon = 1e-4);
    }

    #[test]
    fn floating_rate_is_read_off_curve_rates() {
        let swap = InterestRateSwap::new(terms()).unwrap();
        let forecast = curve(CurveKind::Forecast);
        let curve_date = forecast.curve_date();
        let growth = |d: NaiveDate| {
            let tau = (d - curve_date).num_days() as f64 / 365.0;
            (forecast.get_rate(d) * tau).exp()
        };
        for flow in swap.floating_leg_flows(&forecast).unwrap() {
            let entry = flow.entry();
            let expected = (growth(entry.period_end()) / growth(entry.period_start()) - 1.0) / entry.accrual_fraction();
            assert_abs_diff_eq!(flow.rate(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn npv_sign_follows_position_around_par() {
        let forecast = curve(CurveKind::Forecast);
        let discount = curve(CurveKind::Discount);
        let par = InterestRateSwap::new(terms()).unwrap().par_rate(&forecast, &discount).unwrap();

        let at_par = InterestRateSwap::new(terms().with_fixed_rate(par)).unwrap();
        assert_abs_diff_eq!(at_par.value_swap(&forecast, &discount).unwrap().npv().amount(), 0.0, epsilon = 1e-4);

        let receiver = InterestRateSwap::new(terms().with_fixed_rate(par + 0.001)).unwrap();
        let payer = InterestRateSwap::new(terms().with_fixed_rate(par + 0.001).with_position(Position::PayFixed)).unwrap();
        let receiver_npv = receiver.value_swap(&forecast, &discount).unwrap();
        let payer_npv = payer.value_swap(&forecast, &discount).unwrap();
        assert!(receiver_npv.npv().amount() > 0.0);
        assert_abs_diff_eq!(payer_npv.npv().amount(), -receiver_npv.npv().amount(), epsilon = 1e-6);
        assert_abs_diff_eq!(
            receiver_npv.npv().amount(),
            receiver_npv.fixed_leg().amount() - receiver_npv.floating_leg().amount(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn curve_kinds_are_checked() {
        let swap = InterestRateSwap::new(terms()).unwrap();
        let forecast = curve(CurveKind::Forecast);
        let discount = curve(CurveKind::Discount);
        assert!(matches!(
            swap.value_swap(&discount, &discount),
            Err(ValuationError::CurveKindMismatch { expected: CurveKind::Forecast, found: CurveKind::Discount })
        ));
        assert!(matches!(
            swap.value_swap(&forecast, &forecast),
            Err(ValuationError::CurveKindMismatch { expected: CurveKind::Discount, found: CurveKind::Forecast })
        ));
    }

    #[test]
    fn horizon_drops_paid_flows() {
        let swap = InterestRateSwap::new(terms()).unwrap();
        let forecast = curve(CurveKind::Forecast);
        let discount = curve(CurveKind::Discount);
        let full = swap.value_swap(&forecast, &discount).unwrap();
        let later = swap.value_swap_at(&forecast, &discount, &PricingCondition::at(ymd(2023, 7, 4))).unwrap();
        assert_eq!(later.npv().valuation_date(), ymd(2023, 7, 4));
        assert!(later.fixed_leg().amount() < full.fixed_leg().amount());
    }

    #[test]
    fn floating_frequency_defaults_to_fixed() {
        let swap = InterestRateSwap::new(terms().with_floating_payment_frequency(Frequency::Quarterly)).unwrap();
        assert_eq!(swap.floating_leg_schedule().unwrap().len(), 12);
        assert_eq!(swap.fixed_leg_schedule().unwrap().len(), 6);
        assert_eq!(terms().floating_payment_frequency(), Frequency::SemiAnnually);
        assert_eq!(swap.max_date(), ymd(2026, 1, 5));
        assert_eq!(swap.position(), Position::ReceiveFixed);
    }

    #[test]
    fn rejects_inverted_dates() {
        let result = InterestRateSwap::new(SwapTerms::new(ymd(2024, 1, 1), ymd(2023, 1, 1)));
        assert!(matches!(result, Err(ValuationError::Schedule(ScheduleError::InvalidDateRange { .. }))));
    }

    #[test]
    fn terms_deserialize_with_defaults() {
        let terms: SwapTerms = serde_json::from_str(
            r#"{"start_date": "2023-01-01", "end_date": "2028-01-01", "payment_frequency": "3M", "holiday_calendars": ["USA", "SEK"]}"#
        ).unwrap();
        assert_eq!(terms.notional(), 1_000_000_000.0);
        assert_eq!(terms.payment_frequency(), Frequency::Quarterly);
        assert_eq!(terms.holiday_calendars(), &[Jurisdiction::USA, Jurisdiction::Sweden]);
        assert_eq!(terms.position(), Position::ReceiveFixed);
        assert_eq!(terms.fixed_day_count(), DayCountConvention::Thirty360);
    }
}
