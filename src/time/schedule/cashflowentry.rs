use chrono::NaiveDate;


/// One accrual period of a swap leg.
///
/// `period_start` and `period_end` are business-day adjusted, except that the
/// last entry of a schedule always ends on the leg's end date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashflowEntry {
    period_start: NaiveDate,
    period_end: NaiveDate,
    payment_date: NaiveDate,
    accrual_fraction: f64,
    is_stub: bool
}

impl CashflowEntry {
    pub fn new(period_start: NaiveDate,
               period_end: NaiveDate,
               payment_date: NaiveDate,
               accrual_fraction: f64,
               is_stub: bool) -> CashflowEntry {
        CashflowEntry {
            period_start,
            period_end,
            payment_date,
            accrual_fraction,
            is_stub
        }
    }

    pub fn period_start(&self) -> NaiveDate {
        self.period_start
    }

    pub fn period_end(&self) -> NaiveDate {
        self.period_end
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }

    pub fn accrual_fraction(&self) -> f64 {
        self.accrual_fraction
    }

    /// True when the period was cut at the end date before a full interval.
    pub fn is_stub(&self) -> bool {
        self.is_stub
    }
}
