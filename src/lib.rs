pub mod configuration;

pub mod instrument {
    pub mod instrument;

    pub mod interestrate {
        pub mod interestrateswap;
    }
}

pub mod interestrate {
    pub mod compounding;
}

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod curve {
        pub mod curve;
        pub mod nonparametriccurve {
            pub mod nonparametriccurve;
            pub mod piecewisepolynomial;
        }
    }
}

pub mod model {
    pub mod interestrate {
        pub mod interestratecurve;
        pub mod ratecurve;
    }
}

pub mod pricingcondition;

pub mod time {
    pub mod utility;
    pub mod period;
    pub mod businessdayadjuster;

    pub mod recurringholiday {
        pub mod recurringholiday;
        pub mod weekendadjustment;
        pub mod fixeddateholiday;
        pub mod nthweekdayholiday;
        pub mod easterrelatedholiday;
        pub mod weekdayonorafterholiday;
        pub mod holidayrun;
    }

    pub mod calendar {
        pub mod holidaycalendar;
        pub mod simplecalendar;
        pub mod jointcalendar;
        pub mod jurisdiction;
    }

    pub mod schedule {
        pub mod frequency;
        pub mod cashflowentry;
        pub mod calculationperiodgenerator;
        pub mod schedule;
    }

    pub mod daycounter {
        pub mod daycounter;
        pub mod constdaycounterdominator;
        pub mod isdaactualdaycounterdominator;
        pub mod numerator {
            pub mod actualnumerator;
            pub mod thirtynumerator;
        }
    }
}

pub mod value {
    pub mod cashflows;
    pub mod npv;
}
