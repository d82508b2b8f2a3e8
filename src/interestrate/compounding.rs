use serde::Deserialize;

/// Convention under which a quoted rate grows one unit of money over `tau` years.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Compounding {
    Simple,
    #[default]
    Continuous,
    Annual,
    Semiannual,
    Quarterly,
    Monthly,
    Daily
}

impl Compounding {
    /// Compounding periods per year for the periodic conventions.
    pub fn periods_per_year(&self) -> Option<f64> {
        match self {
            Compounding::Annual => Some(1.0),
            Compounding::Semiannual => Some(2.0),
            Compounding::Quarterly => Some(4.0),
            Compounding::Monthly => Some(12.0),
            Compounding::Daily => Some(365.0),
            Compounding::Simple | Compounding::Continuous => None
        }
    }

    pub fn future_value(&self, rate: f64, tau: f64) -> f64 {
        match (self, self.periods_per_year()) {
            (Compounding::Simple, _) => 1.0 + rate * tau,
            (_, Some(freq)) => (1.0 + rate / freq).powf(tau * freq),
            _ => (rate * tau).exp()
        }
    }

    pub fn discount_factor(&self, rate: f64, tau: f64) -> f64 {
        1.0 / self.future_value(rate, tau)
    }

    /// Inverse of [`Compounding::future_value`]; `tau` must be non-zero.
    pub fn implied_rate(&self, future_value: f64, tau: f64) -> f64 {
        match (self, self.periods_per_year()) {
            (Compounding::Simple, _) => (future_value - 1.0) / tau,
            (_, Some(freq)) => (future_value.powf(1.0 / (tau * freq)) - 1.0) * freq,
            _ => future_value.ln() / tau
        }
    }
}
