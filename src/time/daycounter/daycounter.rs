use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::constdaycounterdominator::ConstDayCounterDominator;
use super::isdaactualdaycounterdominator::ISDAActualDayCounterDominator;
use super::numerator::actualnumerator::ActualNumerator;
use super::numerator::thirtynumerator::{ThirtyNumerator, ThirtyVariant};

// ─────────────────────────────────────────────────────────────────────────────
// Traits
// ─────────────────────────────────────────────────────────────────────────────

/// Counts the days of an accrual period (actual days, 30-day months, ...).
pub trait DayCounterNumerator: Send + Sync {
    fn days_between(&self, d1: NaiveDate, d2: NaiveDate) -> f64;
}

/// Turns a day count into a year fraction.
pub trait DayCounterDominator: Send + Sync {
    fn year_fraction(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        numerator: &Arc<dyn DayCounterNumerator>,
    ) -> f64;
}

// ─────────────────────────────────────────────────────────────────────────────
// DayCountConvention
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DayCountError {
    #[error("unknown day count convention '{0}'")]
    UnknownConvention(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    /// 30/360 bond basis (ISDA 2006 4.16(f)).
    Thirty360,
    /// 30E/360 Eurobond basis.
    ThirtyE360,
    Actual360,
    Actual365Fixed,
    ActualActualISDA,
}

impl DayCountConvention {
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360 => "30/360",
            DayCountConvention::ThirtyE360 => "30E/360",
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Actual365Fixed => "ACT/365F",
            DayCountConvention::ActualActualISDA => "ACT/ACT ISDA",
        }
    }

    pub fn day_counter(&self) -> DayCounter {
        let actual: Arc<dyn DayCounterNumerator> = Arc::new(ActualNumerator::new());
        match self {
            DayCountConvention::Thirty360 => DayCounter::new(
                *self,
                Arc::new(ThirtyNumerator::new(ThirtyVariant::BondBasis)),
                Arc::new(ConstDayCounterDominator::new(360.0)),
            ),
            DayCountConvention::ThirtyE360 => DayCounter::new(
                *self,
                Arc::new(ThirtyNumerator::new(ThirtyVariant::Eurobond)),
                Arc::new(ConstDayCounterDominator::new(360.0)),
            ),
            DayCountConvention::Actual360 => DayCounter::new(
                *self,
                actual,
                Arc::new(ConstDayCounterDominator::new(360.0)),
            ),
            DayCountConvention::Actual365Fixed => DayCounter::new(
                *self,
                actual,
                Arc::new(ConstDayCounterDominator::new(365.0)),
            ),
            DayCountConvention::ActualActualISDA => DayCounter::new(
                *self,
                actual,
                Arc::new(ISDAActualDayCounterDominator::new()),
            ),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = DayCountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '/' | '_' | '-'))
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "30360" | "THIRTY360" | "BONDBASIS" => Ok(DayCountConvention::Thirty360),
            "30E360" | "THIRTYE360" | "EUROBOND" => Ok(DayCountConvention::ThirtyE360),
            "ACT360" | "ACTUAL360" => Ok(DayCountConvention::Actual360),
            "ACT365" | "ACT365F" | "ACTUAL365" | "ACTUAL365FIXED" => Ok(DayCountConvention::Actual365Fixed),
            "ACTACT" | "ACTACTISDA" | "ACTUALACTUAL" | "ACTUALACTUALISDA" => Ok(DayCountConvention::ActualActualISDA),
            _ => Err(DayCountError::UnknownConvention(s.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for DayCountConvention {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DayCounter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DayCounter {
    convention: DayCountConvention,
    numerator: Arc<dyn DayCounterNumerator>,
    dominator: Arc<dyn DayCounterDominator>,
}

impl DayCounter {
    pub fn new(
        convention: DayCountConvention,
        numerator: Arc<dyn DayCounterNumerator>,
        dominator: Arc<dyn DayCounterDominator>,
    ) -> DayCounter {
        DayCounter {
            convention,
            numerator,
            dominator,
        }
    }

    pub fn convention(&self) -> DayCountConvention {
        self.convention
    }

    pub fn day_count(&self, d1: NaiveDate, d2: NaiveDate) -> f64 {
        self.numerator.days_between(d1, d2)
    }

    /// Year fraction from `d1` to `d2`, negative when `d2` precedes `d1`.
    pub fn year_fraction(&self, d1: NaiveDate, d2: NaiveDate) -> f64 {
        if d1 == d2 {
            0.0
        } else if d1 > d2 {
            -self.dominator.year_fraction(d2, d1, &self.numerator)
        } else {
            self.dominator.year_fraction(d1, d2, &self.numerator)
        }
    }
}

impl fmt::Debug for DayCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DayCounter")
            .field("convention", &self.convention)
            .finish()
    }
}
