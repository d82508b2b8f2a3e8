use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::interestrate::compounding::Compounding;
use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::nonparametriccurve::Point2D;
use crate::math::curve::nonparametriccurve::piecewisepolynomial::{
    InterpolationError,
    PiecewisePolynomial,
    PolynomialType
};
use crate::model::interestrate::interestratecurve::InterestRateCurve;
use crate::time::daycounter::daycounter::{
    DayCountConvention,
    DayCounter
};
use crate::time::utility::days_between;

pub type InterpolationMethod = PolynomialType;

/// Role a curve plays in a valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum CurveKind {
    /// Projects floating-rate fixings.
    Forecast,
    /// Converts future cash into present value.
    Discount
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Forecast => write!(f, "forecast"),
            CurveKind::Discount => write!(f, "discount")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("at least {required} observations are required, {given} given")]
    InsufficientData {
        required: usize,
        given: usize
    },
    #[error("more than one observation on {0}")]
    DuplicateDate(NaiveDate),
    #[error("observation on {date} precedes the curve date {curve_date}")]
    ObservationBeforeCurveDate {
        date: NaiveDate,
        curve_date: NaiveDate
    },
    #[error("non-finite rate observed on {0}")]
    NonFiniteRate(NaiveDate),
    #[error(transparent)]
    Interpolation(#[from] InterpolationError)
}

const MIN_OBSERVATIONS: usize = 2;

/// A zero-rate curve interpolated over whole-day offsets from its curve date.
///
/// Rates are read under `compounding` with year fractions from `day_counter`
/// when discounting. The interpolant continues its boundary pieces outside the
/// observed range, so extrapolated rates are unconstrained and can diverge.
#[derive(Clone)]
pub struct RateCurve {
    curve_date: NaiveDate,
    kind: CurveKind,
    observations: Vec<(i64, f64)>,
    interpolant: PiecewisePolynomial,
    day_counter: DayCounter,
    compounding: Compounding
}

impl RateCurve {
    /// Fits a not-a-knot cubic spline through `quotes`, given in any order.
    pub fn new<I>(curve_date: NaiveDate, kind: CurveKind, quotes: I) -> Result<RateCurve, CurveError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        RateCurve::with_interpolation(curve_date, kind, quotes, InterpolationMethod::default())
    }

    pub fn with_interpolation<I>(curve_date: NaiveDate,
                                 kind: CurveKind,
                                 quotes: I,
                                 interpolation: InterpolationMethod) -> Result<RateCurve, CurveError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut quotes: Vec<(NaiveDate, f64)> = quotes.into_iter().collect();
        if quotes.len() < MIN_OBSERVATIONS {
            return Err(CurveError::InsufficientData { required: MIN_OBSERVATIONS, given: quotes.len() });
        }

        quotes.sort_by_key(|(d, _)| *d);
        if let Some(w) = quotes.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(CurveError::DuplicateDate(w[0].0));
        }
        if quotes[0].0 < curve_date {
            return Err(CurveError::ObservationBeforeCurveDate { date: quotes[0].0, curve_date });
        }
        if let Some((d, _)) = quotes.iter().find(|(_, r)| !r.is_finite()) {
            return Err(CurveError::NonFiniteRate(*d));
        }

        let observations: Vec<(i64, f64)> = quotes
            .iter()
            .map(|(d, r)| (days_between(curve_date, *d), *r))
            .collect();
        let points: Vec<Point2D> = observations
            .iter()
            .map(|(x, y)| Point2D::new(*x as f64, *y))
            .collect();
        let interpolant = PiecewisePolynomial::new(interpolation, points)?;

        debug!(
            %curve_date,
            %kind,
            interpolation = ?interpolation,
            observations = observations.len(),
            "fitted rate curve"
        );

        Ok(RateCurve {
            curve_date,
            kind,
            observations,
            interpolant,
            day_counter: DayCountConvention::Actual365Fixed.day_counter(),
            compounding: Compounding::default()
        })
    }

    pub fn with_day_counter(mut self, day_counter: DayCounter) -> RateCurve {
        self.day_counter = day_counter;
        self
    }

    pub fn with_compounding(mut self, compounding: Compounding) -> RateCurve {
        self.compounding = compounding;
        self
    }

    pub fn curve_date(&self) -> NaiveDate {
        self.curve_date
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolant.polynomial_type()
    }

    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// `(offset_days, rate)` pairs with strictly increasing offsets.
    pub fn observations(&self) -> &[(i64, f64)] {
        &self.observations
    }

    pub fn min_offset(&self) -> i64 {
        self.observations[0].0
    }

    pub fn max_offset(&self) -> i64 {
        self.observations[self.observations.len() - 1].0
    }

    pub fn offset(&self, d: NaiveDate) -> i64 {
        days_between(self.curve_date, d)
    }

    pub fn is_extrapolated(&self, d: NaiveDate) -> bool {
        let offset = self.offset(d);
        offset < self.min_offset() || offset > self.max_offset()
    }

    /// Interpolated rate on `target_date`.
    pub fn get_rate(&self, target_date: NaiveDate) -> f64 {
        let offset = self.offset(target_date);
        if self.is_extrapolated(target_date) {
            trace!(%target_date, offset, kind = %self.kind, "extrapolating rate curve");
        }
        self.interpolant.value(offset as f64)
    }

    /// Simple forward rate over `[start_date, end_date]` for an accrual of
    /// `tau` years, falling back to the spot rate at `start_date` when `tau`
    /// is zero.
    pub fn forward_rate(&self, start_date: NaiveDate, end_date: NaiveDate, tau: f64) -> f64 {
        if tau == 0.0 {
            return self.get_rate(start_date);
        }
        (self.discount(start_date) / self.discount(end_date) - 1.0) / tau
    }
}

impl InterestRateCurve for RateCurve {
    fn day_counter(&self) -> &DayCounter {
        &self.day_counter
    }

    fn reference_date(&self) -> NaiveDate {
        self.curve_date
    }

    fn discount(&self, d: NaiveDate) -> f64 {
        let tau = self.day_counter.year_fraction(self.curve_date, d);
        self.compounding.discount_factor(self.get_rate(d), tau)
    }

    fn zero_rate(&self, d: NaiveDate) -> f64 {
        let tau = self.day_counter.year_fraction(self.curve_date, d);
        if tau == 0.0 {
            return self.get_rate(d);
        }
        Compounding::Continuous.implied_rate(1.0 / self.discount(d), tau)
    }
}

impl fmt::Debug for RateCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateCurve")
            .field("curve_date", &self.curve_date)
            .field("kind", &self.kind)
            .field("interpolation", &self.interpolation())
            .field("observations", &self.observations)
            .field("day_counter", &self.day_counter)
            .field("compounding", &self.compounding)
            .finish()
    }
}
