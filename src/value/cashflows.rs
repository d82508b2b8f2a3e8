use std::collections::BTreeMap;
use std::ops::{AddAssign, Index, MulAssign, SubAssign};
use std::ops::{
    Add,
    Mul,
    Neg,
    Sub
};

use chrono::NaiveDate;

use crate::model::interestrate::interestratecurve::InterestRateCurve;
use crate::pricingcondition::PricingCondition;


/// Amounts keyed by payment date; flows on the same date are netted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlows {
    flows: BTreeMap<NaiveDate, f64>
}


impl CashFlows {
    pub fn new() -> CashFlows {
        CashFlows { flows: BTreeMap::new() }
    }

    pub fn add_flow(&mut self, payment_date: NaiveDate, amount: f64) {
        *self.flows.entry(payment_date).or_insert(0.0) += amount;
    }

    /// Payment dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.flows.keys().copied().collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.flows.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.flows.iter().map(|(d, v)| (*d, *v))
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.flows.values().sum()
    }

    /// Value as of the pricing horizon of the flows still outstanding there.
    ///
    /// Each flow is discounted to the curve's reference date and the total is
    /// carried forward to the horizon, so a horizon on the reference date
    /// gives the plain discounted sum.
    pub fn npv(&self,
               discount_curve: &dyn InterestRateCurve,
               pricing_condition: &PricingCondition) -> f64 {
        let total: f64 = self.flows.iter()
            .filter(|(date, _)| pricing_condition.is_outstanding(**date))
            .map(|(date, amount)| amount * discount_curve.discount(*date))
            .sum();

        let horizon = pricing_condition.horizon();
        if horizon == discount_curve.reference_date() {
            total
        } else {
            total / discount_curve.discount(horizon)
        }
    }
}

impl FromIterator<(NaiveDate, f64)> for CashFlows {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, f64)>>(iter: T) -> Self {
        let mut cash_flows = CashFlows::new();
        for (payment_date, amount) in iter {
            cash_flows.add_flow(payment_date, amount);
        }
        cash_flows
    }
}


impl Index<&NaiveDate> for CashFlows {
    type Output = f64;
    fn index(&self, date: &NaiveDate) -> &f64 {
        static ZERO: f64 = 0.0;
        self.flows.get(date).unwrap_or(&ZERO)
    }
}

macro_rules! impl_cashflows_arithmetic {
    ($trait_op:ident, $method_op:ident, $trait_assign:ident, $method_assign:ident, $op:tt) => {
        impl $trait_assign<CashFlows> for CashFlows {
            fn $method_assign(&mut self, rhs: CashFlows) {
                for (date, value) in rhs.flows {
                    let entry = self.flows.entry(date).or_insert(0.0);
                    *entry $op value;
                }
            }
        }

        impl $trait_op<CashFlows> for CashFlows {
            type Output = CashFlows;

            fn $method_op(mut self, rhs: CashFlows) -> Self::Output {
                self.$method_assign(rhs);
                self
            }
        }
    };
}

impl_cashflows_arithmetic!(Add, add, AddAssign, add_assign, +=);
impl_cashflows_arithmetic!(Sub, sub, SubAssign, sub_assign, -=);


impl MulAssign<f64> for CashFlows {
    fn mul_assign(&mut self, rhs: f64) {
        for val in self.flows.values_mut() {
            *val *= rhs;
        }
    }
}

impl Mul<f64> for CashFlows {
    type Output = CashFlows;
    fn mul(mut self, rhs: f64) -> Self::Output {
        self *= rhs;
        self
    }
}

impl Neg for CashFlows {
    type Output = CashFlows;

    fn neg(mut self) -> Self::Output {
        self *= -1.0;
        self
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::model::interestrate::ratecurve::{CurveKind, RateCurve};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flat_curve() -> RateCurve {
        RateCurve::new(ymd(2023, 1, 1), CurveKind::Discount, vec![(ymd(2024, 1, 1), 0.05), (ymd(2025, 1, 1), 0.05)]).unwrap()
    }

    #[test]
    fn same_date_flows_are_netted() {
        let mut flows: CashFlows = vec![(ymd(2023, 6, 1), 100.0), (ymd(2023, 12, 1), 50.0)].into_iter().collect();
        flows.add_flow(ymd(2023, 6, 1), -30.0);
        assert_eq!(flows[&ymd(2023, 6, 1)], 70.0);
        assert_eq!(flows[&ymd(2024, 6, 1)], 0.0);
        assert_eq!(flows.dates(), vec![ymd(2023, 6, 1), ymd(2023, 12, 1)]);
        assert_eq!(flows.sum(), 120.0);
    }

    #[test]
    fn arithmetic_operators() {
        let a: CashFlows = vec![(ymd(2023, 6, 1), 10.0)].into_iter().collect();
        let b: CashFlows = vec![(ymd(2023, 6, 1), 4.0), (ymd(2023, 7, 1), 1.0)].into_iter().collect();
        let diff = a.clone() - b.clone();
        assert_eq!(diff.values(), vec![6.0, -1.0]);
        assert_eq!((a + b).sum(), 15.0);
        assert_eq!((-(diff * 2.0)).values(), vec![-12.0, 2.0]);
    }

    #[test]
    fn npv_skips_flows_before_the_horizon() {
        let curve = flat_curve();
        let flows: CashFlows = vec![(ymd(2023, 1, 1), 5.0), (ymd(2024, 1, 1), 100.0)].into_iter().collect();

        let at_curve_date = flows.npv(&curve, &PricingCondition::at(ymd(2023, 1, 1)));
        assert_abs_diff_eq!(at_curve_date, 5.0 + 100.0 * (-0.05f64).exp(), epsilon = 1e-12);

        let exclusive = flows.npv(&curve, &PricingCondition::new(ymd(2023, 1, 1), false));
        assert_abs_diff_eq!(exclusive, 100.0 * (-0.05f64).exp(), epsilon = 1e-12);

        let forward = flows.npv(&curve, &PricingCondition::at(ymd(2024, 1, 1)));
        assert_abs_diff_eq!(forward, 100.0, epsilon = 1e-12);
    }
}
