//! Runs the aggregator once per requested currency

use super::aggregator::get_exchange;
use super::config::{AppConfig, LookupPolicy};
use super::provider::DayRatesProvider;
use super::rates::{CurrencyCode, CurrencyOutcome, DayCount, ExchangeQuery, RunResult};
use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub lookup_policy: LookupPolicy,
    pub parallel_currencies: bool,
}

impl From<&AppConfig> for RunOptions {
    fn from(config: &AppConfig) -> Self {
        RunOptions {
            lookup_policy: config.lookup_policy,
            parallel_currencies: config.parallel_currencies,
        }
    }
}

/// Base currencies first, then extras in the order given. Each code appears once.
pub fn merge_currencies(base: &[CurrencyCode], extra: &[CurrencyCode]) -> Vec<CurrencyCode> {
    let mut merged: Vec<CurrencyCode> = Vec::with_capacity(base.len() + extra.len());
    for code in base.iter().chain(extra) {
        if !merged.contains(code) {
            merged.push(code.clone());
        }
    }
    merged
}

/// Parses extra currency arguments, dropping the ones that are not currency codes.
pub fn parse_currency_args<S: AsRef<str>>(args: &[S]) -> Vec<CurrencyCode> {
    args.iter()
        .filter_map(|arg| match arg.as_ref().parse::<CurrencyCode>() {
            Ok(code) => Some(code),
            Err(e) => {
                warn!(error = %e, "Ignoring currency argument");
                None
            }
        })
        .collect()
}

async fn run_currency(
    provider: &(dyn DayRatesProvider + Send + Sync),
    currency: &CurrencyCode,
    days: DayCount,
    today: NaiveDate,
    policy: LookupPolicy,
) -> CurrencyOutcome {
    let query = ExchangeQuery::new(currency.clone(), days);
    let result = get_exchange(provider, &query, today, policy).await;
    if let Err(e) = &result {
        warn!(%currency, error = %e, "Failed to get currency rates");
    }
    CurrencyOutcome {
        currency: currency.clone(),
        result,
    }
}

/// Collects rates for every currency. A lookup failure only affects its own currency.
pub async fn get_currency_rates(
    provider: &(dyn DayRatesProvider + Send + Sync),
    currencies: &[CurrencyCode],
    days: DayCount,
    today: NaiveDate,
    options: &RunOptions,
) -> RunResult {
    info!(
        currencies = currencies.len(),
        %days,
        parallel = options.parallel_currencies,
        "Fetching currency rates"
    );

    if options.parallel_currencies {
        let futures = currencies
            .iter()
            .map(|currency| run_currency(provider, currency, days, today, options.lookup_policy));
        return join_all(futures).await;
    }

    let mut results = Vec::with_capacity(currencies.len());
    for currency in currencies {
        results.push(run_currency(provider, currency, days, today, options.lookup_policy).await);
    }
    results
}
