use chrono::NaiveDate;
use serde::Deserialize;


/// Side of a swap seen from the fixed leg.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Position {
    #[default]
    ReceiveFixed = 1,
    PayFixed = -1
}

impl Position {
    pub fn sign(&self) -> f64 {
        *self as i32 as f64
    }
}


pub trait Instrument {
    fn position(&self) -> Position;

    /// Last date on which the instrument pays.
    fn max_date(&self) -> NaiveDate;
}
