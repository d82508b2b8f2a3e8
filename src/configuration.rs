use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::instrument::interestrate::interestrateswap::{
    InterestRateSwap,
    SwapTerms,
    SwapValuation
};
use crate::interestrate::compounding::Compounding;
use crate::manager::managererror::ManagerError;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::model::interestrate::ratecurve::{
    CurveKind,
    InterpolationMethod,
    RateCurve
};
use crate::pricingcondition::PricingCondition;
use crate::time::daycounter::daycounter::DayCountConvention;


#[derive(Deserialize)]
struct QuoteJsonProp {
    date: NaiveDate,
    rate: f64
}

#[derive(Deserialize)]
struct CurveJsonProp {
    name: String,
    kind: CurveKind,
    curve_date: NaiveDate,
    #[serde(default)]
    interpolation: InterpolationMethod,
    #[serde(default)]
    day_count: Option<DayCountConvention>,
    #[serde(default)]
    compounding: Compounding,
    quotes: Vec<QuoteJsonProp>
}

fn curve_from_json(json_value: serde_json::Value) -> Result<Arc<RateCurve>, ManagerError> {
    let prop: CurveJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let quotes = prop.quotes.iter().map(|q| (q.date, q.rate));
    let mut curve = RateCurve::with_interpolation(prop.curve_date, prop.kind, quotes, prop.interpolation)
        .map_err(|source| ManagerError::CurveError { name: prop.name.clone(), source })?
        .with_compounding(prop.compounding);
    if let Some(day_count) = prop.day_count {
        curve = curve.with_day_counter(day_count.day_counter());
    }
    Ok(Arc::new(curve))
}

/// Swap terms together with the names of the curves that value them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfiguredSwap {
    #[serde(flatten)]
    terms: SwapTerms,
    forecast_curve: String,
    discount_curve: String
}

impl ConfiguredSwap {
    pub fn terms(&self) -> &SwapTerms {
        &self.terms
    }

    pub fn forecast_curve(&self) -> &str {
        &self.forecast_curve
    }

    pub fn discount_curve(&self) -> &str {
        &self.discount_curve
    }
}

fn swap_from_json(json_value: serde_json::Value) -> Result<ConfiguredSwap, ManagerError> {
    ManagerError::from_json_or_json_parse_error(json_value)
}

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    curves: Vec<serde_json::Value>,
    #[serde(default)]
    swaps: Vec<serde_json::Value>,
    #[serde(default)]
    pricing_condition: Option<PricingCondition>
}

/// Curves and swaps of a valuation run, loaded from one JSON document.
pub struct Configuration {
    curve_manager: Manager<Arc<RateCurve>>,
    swap_manager: Manager<ConfiguredSwap>,
    pricing_condition: Option<PricingCondition>
}


impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            curve_manager: Manager::new(curve_from_json),
            swap_manager: Manager::new(swap_from_json),
            pricing_condition: None
        }
    }

    pub fn curve_manager(&self) -> &Manager<Arc<RateCurve>> {
        &self.curve_manager
    }

    pub fn swap_manager(&self) -> &Manager<ConfiguredSwap> {
        &self.swap_manager
    }

    /// Horizon set in the document; swaps are otherwise valued on their
    /// discount curve date.
    pub fn pricing_condition(&self) -> Option<PricingCondition> {
        self.pricing_condition
    }

    pub fn from_reader<P: AsRef<Path>>(file_path: P) -> Result<Configuration, ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        Configuration::from_json(json_value)
    }

    pub fn from_json(json_value: serde_json::Value) -> Result<Configuration, ManagerError> {
        let json_prop: ConfigurationJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
        let mut configuration = Configuration::new();
        configuration.curve_manager.insert_obj_from_json_vec(&json_prop.curves)?;
        configuration.swap_manager.insert_obj_from_json_vec(&json_prop.swaps)?;
        configuration.pricing_condition = json_prop.pricing_condition;
        info!(
            curves = configuration.curve_manager.len(),
            swaps = configuration.swap_manager.len(),
            "loaded configuration"
        );
        Ok(configuration)
    }

    pub fn swap(&self, name: &str) -> Result<(InterestRateSwap, Arc<RateCurve>, Arc<RateCurve>), ManagerError> {
        let configured = self.swap_manager.get(name)?;
        let forecast_curve = self.curve_manager.get(configured.forecast_curve())?;
        let discount_curve = self.curve_manager.get(configured.discount_curve())?;
        let swap = InterestRateSwap::new(configured.terms)?;
        Ok((swap, forecast_curve, discount_curve))
    }

    pub fn value_swap(&self, name: &str) -> Result<SwapValuation, ManagerError> {
        let (swap, forecast_curve, discount_curve) = self.swap(name)?;
        let pricing_condition = self
            .pricing_condition
            .unwrap_or_else(|| PricingCondition::at(discount_curve.curve_date()));
        Ok(swap.value_swap_at(&forecast_curve, &discount_curve, &pricing_condition)?)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
