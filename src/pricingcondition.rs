use chrono::NaiveDate;
use serde::Deserialize;


/// Valuation horizon and whether a flow paid on the horizon still counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PricingCondition {
    horizon: NaiveDate,
    #[serde(default = "include_horizon_flow_default")]
    include_horizon_flow: bool
}

fn include_horizon_flow_default() -> bool {
    true
}

impl PricingCondition {
    pub fn new(horizon: NaiveDate, include_horizon_flow: bool) -> PricingCondition {
        PricingCondition {
            horizon: horizon,
            include_horizon_flow: include_horizon_flow
        }
    }

    /// Flows on `horizon` are included.
    pub fn at(horizon: NaiveDate) -> PricingCondition {
        PricingCondition::new(horizon, include_horizon_flow_default())
    }

    pub fn horizon(&self) -> NaiveDate {
        self.horizon
    }

    pub fn include_horizon_flow(&self) -> bool {
        self.include_horizon_flow
    }

    /// True when a flow paid on `payment_date` is still to be valued.
    pub fn is_outstanding(&self, payment_date: NaiveDate) -> bool {
        if self.include_horizon_flow {
            payment_date >= self.horizon
        } else {
            payment_date > self.horizon
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn horizon_flow_inclusion() {
        let inclusive = PricingCondition::at(ymd(2023, 7, 3));
        let exclusive = PricingCondition::new(ymd(2023, 7, 3), false);
        assert!(inclusive.is_outstanding(ymd(2023, 7, 3)));
        assert!(!exclusive.is_outstanding(ymd(2023, 7, 3)));
        assert!(!inclusive.is_outstanding(ymd(2023, 7, 2)));
        assert!(exclusive.is_outstanding(ymd(2023, 7, 4)));
    }

    #[test]
    fn deserializes_with_default_inclusion() {
        let condition: PricingCondition = serde_json::from_str(r#"{"horizon": "2023-01-01"}"#).unwrap();
        assert_eq!(condition, PricingCondition::at(ymd(2023, 1, 1)));
    }
}
