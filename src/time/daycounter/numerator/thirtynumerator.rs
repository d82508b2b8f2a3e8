use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::time::daycounter::daycounter::DayCounterNumerator;

#[derive(Clone, Copy)]
struct YMD {
    y: i32,
    m: i32,
    d: i32
}

impl YMD {
    pub fn from_naive_date(date: NaiveDate) -> YMD {
        YMD { y: date.year(), m: date.month() as i32, d: date.day() as i32 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ThirtyVariant {
    /// D1 = 31 becomes 30; D2 = 31 becomes 30 only when D1 is 30 or 31.
    BondBasis,
    /// Both D1 = 31 and D2 = 31 become 30.
    Eurobond
}

fn bond_basis(mut ymd1: YMD, mut ymd2: YMD) -> (YMD, YMD) {
    if ymd1.d == 31 {
        ymd1.d = 30;
    }
    if ymd2.d == 31 && ymd1.d == 30 {
        ymd2.d = 30;
    }
    (ymd1, ymd2)
}

fn eurobond(mut ymd1: YMD, mut ymd2: YMD) -> (YMD, YMD) {
    ymd1.d = ymd1.d.min(30);
    ymd2.d = ymd2.d.min(30);
    (ymd1, ymd2)
}

pub struct ThirtyNumerator {
    variant: ThirtyVariant,
    adjustment_impl: fn(YMD, YMD) -> (YMD, YMD)
}

impl ThirtyNumerator {
    pub fn new(variant: ThirtyVariant) -> ThirtyNumerator {
        let adjustment_impl = match variant {
            ThirtyVariant::BondBasis => bond_basis,
            ThirtyVariant::Eurobond => eurobond
        };
        ThirtyNumerator { variant, adjustment_impl }
    }

    pub fn variant(&self) -> ThirtyVariant {
        self.variant
    }
}

impl DayCounterNumerator for ThirtyNumerator {
    fn days_between(&self, d1: NaiveDate, d2: NaiveDate) -> f64 {
        let (ymd1, ymd2) = (self.adjustment_impl)(YMD::from_naive_date(d1), YMD::from_naive_date(d2));
        (360 * (ymd2.y - ymd1.y) + 30 * (ymd2.m - ymd1.m) + (ymd2.d - ymd1.d)) as f64
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bond_basis_keeps_end_31_after_short_start() {
        let numerator = ThirtyNumerator::new(ThirtyVariant::BondBasis);
        assert_eq!(numerator.days_between(ymd(2023, 1, 15), ymd(2023, 3, 31)), 76.0);
        assert_eq!(numerator.days_between(ymd(2023, 1, 30), ymd(2023, 3, 31)), 60.0);
        assert_eq!(numerator.days_between(ymd(2023, 1, 31), ymd(2023, 2, 28)), 28.0);
    }

    #[test]
    fn eurobond_caps_both_ends() {
        let numerator = ThirtyNumerator::new(ThirtyVariant::Eurobond);
        assert_eq!(numerator.days_between(ymd(2023, 1, 15), ymd(2023, 3, 31)), 75.0);
        assert_eq!(numerator.variant(), ThirtyVariant::Eurobond);
    }
}
