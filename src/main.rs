use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swapval::configuration::Configuration;
use swapval::instrument::instrument::Instrument;
use swapval::manager::manager::IManager;
use swapval::manager::managererror::ManagerError;

fn value_all(config_path: &str) -> Result<(), ManagerError> {
    let config = Configuration::from_reader(config_path)?;

    for name in config.swap_manager().names() {
        let (swap, forecast_curve, _) = config.swap(&name)?;
        info!(swap = %name, position = ?swap.position(), maturity = %swap.max_date(), "valuing swap");

        for flow in swap.floating_leg_flows(&forecast_curve)? {
            let entry = flow.entry();
            info!(
                swap = %name,
                start = %entry.period_start(),
                end = %entry.period_end(),
                payment = %entry.payment_date(),
                accrual = entry.accrual_fraction(),
                rate = flow.rate(),
                amount = flow.amount(),
                "floating period"
            );
        }

        let valuation = config.value_swap(&name)?;
        info!(
            swap = %name,
            fixed_leg = valuation.fixed_leg().amount(),
            floating_leg = valuation.floating_leg().amount(),
            npv = %valuation.npv(),
            "swap valued"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(config_path) = std::env::args().nth(1) else {
        error!("usage: swapval <config.json>");
        return ExitCode::FAILURE;
    };

    match value_all(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, config = %config_path, "valuation failed");
            ExitCode::FAILURE
        }
    }
}
