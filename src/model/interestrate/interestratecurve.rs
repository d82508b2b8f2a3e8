use chrono::NaiveDate;

use crate::time::daycounter::daycounter::DayCounter;

/// A curve that can discount cash paid on a date.
///
/// `Send + Sync` so curves can be shared as `Arc<dyn InterestRateCurve>`.
pub trait InterestRateCurve: Send + Sync {
    fn day_counter(&self) -> &DayCounter;

    fn reference_date(&self) -> NaiveDate;

    fn discount(&self, d: NaiveDate) -> f64;

    /// Continuously compounded zero rate implied by [`InterestRateCurve::discount`].
    fn zero_rate(&self, d: NaiveDate) -> f64 {
        let t = self.day_counter().year_fraction(self.reference_date(), d);
        -self.discount(d).ln() / t
    }
}
