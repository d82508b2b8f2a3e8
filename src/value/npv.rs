use std::fmt;
use std::ops::{
    Add,
    Mul,
    Neg,
    Sub
};

use chrono::NaiveDate;
use thiserror::Error;


/// A present value expressed as of `valuation_date`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Npv {
    amount: f64,
    valuation_date: NaiveDate
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NpvArithmeticError {
    #[error("cannot combine values as of {lhs} and {rhs}")]
    ValuationDateMismatch {
        lhs: NaiveDate,
        rhs: NaiveDate
    }
}

impl Npv {
    pub fn new(amount: f64, valuation_date: NaiveDate) -> Npv {
        Npv {
            amount: amount,
            valuation_date: valuation_date
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }
}

impl fmt::Display for Npv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} as of {}", self.amount, self.valuation_date)
    }
}


fn arithmetic_operation(lhs: Npv, rhs: Npv, op: fn(f64, f64) -> f64) -> Result<Npv, NpvArithmeticError> {
    if lhs.valuation_date != rhs.valuation_date {
        Err(NpvArithmeticError::ValuationDateMismatch { lhs: lhs.valuation_date, rhs: rhs.valuation_date })
    } else {
        Ok(Npv::new(op(lhs.amount, rhs.amount), lhs.valuation_date))
    }
}

impl Add<Self> for Npv {
    type Output = Result<Self, NpvArithmeticError>;

    fn add(self, rhs: Self) -> Self::Output {
        arithmetic_operation(self, rhs, Add::add)
    }
}

impl Sub<Self> for Npv {
    type Output = Result<Self, NpvArithmeticError>;

    fn sub(self, rhs: Self) -> Self::Output {
        arithmetic_operation(self, rhs, Sub::sub)
    }
}

impl Mul<f64> for Npv {
    type Output = Npv;

    fn mul(self, rhs: f64) -> Self::Output {
        Npv::new(self.amount * rhs, self.valuation_date)
    }
}

impl Neg for Npv {
    type Output = Npv;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn arithmetic_on_same_date() {
        let d = ymd(2023, 1, 1);
        let total = (Npv::new(10.0, d) - Npv::new(4.0, d)).unwrap();
        assert_eq!(total, Npv::new(6.0, d));
        assert_eq!((-total).amount(), -6.0);
        assert_eq!((total * 0.5).amount(), 3.0);
    }

    #[test]
    fn mismatched_dates_are_refused() {
        let err = (Npv::new(1.0, ymd(2023, 1, 1)) + Npv::new(1.0, ymd(2023, 1, 2))).unwrap_err();
        assert_eq!(err, NpvArithmeticError::ValuationDateMismatch { lhs: ymd(2023, 1, 1), rhs: ymd(2023, 1, 2) });
    }
}
