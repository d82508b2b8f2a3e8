use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::time::period::Period;
use super::schedule::ScheduleError;

/// Payment frequency of a swap leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Monthly,
    Quarterly,
    SemiAnnually,
    Annually
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::SemiAnnually,
        Frequency::Annually
    ];

    pub fn months(&self) -> i32 {
        match self {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::SemiAnnually => 6,
            Frequency::Annually => 12
        }
    }

    pub fn period(&self) -> Period {
        Period::months(self.months())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::SemiAnnually => "semi-annually",
            Frequency::Annually => "annually"
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    /// Accepts frequency names (`quarterly`, `semi-annually`, ...) or the
    /// equivalent month tenors (`3M`, `6M`, `1Y`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let by_name = match lowered.as_str() {
            "monthly" => Some(Frequency::Monthly),
            "quarterly" => Some(Frequency::Quarterly),
            "semi-annually" | "semiannually" | "semi-annual" | "semiannual" => Some(Frequency::SemiAnnually),
            "annually" | "annual" | "yearly" => Some(Frequency::Annually),
            _ => None
        };
        if let Some(frequency) = by_name {
            return Ok(frequency);
        }

        Period::parse(&lowered)
            .ok()
            .and_then(|p| p.total_months())
            .and_then(|months| Frequency::ALL.into_iter().find(|f| f.months() == months))
            .ok_or_else(|| ScheduleError::InvalidFrequency(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_tenors() {
        assert_eq!("quarterly".parse::<Frequency>().unwrap(), Frequency::Quarterly);
        assert_eq!("Semi-Annually".parse::<Frequency>().unwrap(), Frequency::SemiAnnually);
        assert_eq!("MONTHLY".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("6M".parse::<Frequency>().unwrap(), Frequency::SemiAnnually);
        assert_eq!("12M".parse::<Frequency>().unwrap(), Frequency::Annually);
        assert_eq!("1Y".parse::<Frequency>().unwrap(), Frequency::Annually);
    }

    #[test]
    fn rejects_unknown_frequencies() {
        for s in ["biweekly", "2M", "1W", "", "daily"] {
            assert!(matches!(s.parse::<Frequency>(), Err(ScheduleError::InvalidFrequency(_))), "{}", s);
        }
    }

    #[test]
    fn months_per_period() {
        assert_eq!(Frequency::Quarterly.period(), Period::months(3));
        assert_eq!(Frequency::SemiAnnually.months(), 6);
    }
}
