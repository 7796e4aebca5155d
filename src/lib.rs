pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::OutputFormat;
use crate::core::config::AppConfig;
use crate::core::orchestrator::{RunOptions, merge_currencies, parse_currency_args};
use crate::core::{DayCount, RunResult};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Fetches and prints rates for the configured base currencies plus `extra_currencies`.
pub async fn run_with_config(
    config: &AppConfig,
    days: DayCount,
    extra_currencies: &[String],
    today: NaiveDate,
    format: OutputFormat,
) -> Result<RunResult> {
    let extra = parse_currency_args(extra_currencies);
    let currencies = merge_currencies(&config.base_currencies, &extra);
    let provider = providers::PrivatBankProvider::new(&config.providers.privatbank)?;

    Ok(cli::rates::run(
        &provider,
        &currencies,
        days,
        today,
        &RunOptions::from(config),
        format,
    )
    .await)
}

pub async fn run(
    days: DayCount,
    extra_currencies: &[String],
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<RunResult> {
    info!("Exchange rates starting...");

    let config = load_config(config_path)?;
    let today = chrono::Local::now().date_naive();
    run_with_config(&config, days, extra_currencies, today, format).await
}
