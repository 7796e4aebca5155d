//! Per-currency fan-out over the requested days

use super::config::LookupPolicy;
use super::dates::date_range;
use super::error::LookupError;
use super::provider::DayRatesProvider;
use super::rates::{AggregateResult, ExchangeQuery};
use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, instrument, warn};

/// Fetches every requested day concurrently and formats one line per day that has the currency.
///
/// Lines come out newest date first, whatever order the requests complete in. Days the
/// provider could not deliver are skipped. A day without exactly one record for the
/// currency is handled according to `policy`.
#[instrument(skip_all, fields(currency = %query.currency, days = %query.days))]
pub async fn get_exchange(
    provider: &(dyn DayRatesProvider + Send + Sync),
    query: &ExchangeQuery,
    today: NaiveDate,
    policy: LookupPolicy,
) -> Result<AggregateResult, LookupError> {
    let dates = date_range(today, query.days.get());
    let responses = join_all(dates.iter().map(|date| provider.fetch_day(*date))).await;

    let mut lines = Vec::with_capacity(responses.len());
    for (date, response) in dates.iter().zip(responses) {
        let Some(day) = response else {
            debug!(%date, "No response for day, skipping");
            continue;
        };

        match (day.format_line(&query.currency), policy) {
            (Ok(line), _) => lines.push(line),
            (Err(e), LookupPolicy::FailCurrency) => return Err(e),
            (Err(e), LookupPolicy::SkipDay) => {
                warn!(error = %e, "Skipping day without a usable rate");
            }
        }
    }

    if lines.is_empty() {
        Ok(AggregateResult::NotFound)
    } else {
        Ok(AggregateResult::Lines(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dates::format_api_date;
    use crate::core::rates::{DayCount, DayRates};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned days, optionally finishing older dates first.
    struct StubProvider {
        days: HashMap<NaiveDate, DayRates>,
        reverse_latency: bool,
        calls: Mutex<Vec<NaiveDate>>,
    }

    impl StubProvider {
        fn new(days: Vec<(NaiveDate, String)>) -> Self {
            Self {
                days: days
                    .into_iter()
                    .map(|(date, body)| (date, serde_json::from_str(&body).unwrap()))
                    .collect(),
                reverse_latency: false,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DayRatesProvider for StubProvider {
        async fn fetch_day(&self, date: NaiveDate) -> Option<DayRates> {
            self.calls.lock().unwrap().push(date);
            if self.reverse_latency {
                let age = (today() - date).num_days() as u64;
                tokio::time::sleep(Duration::from_millis(50 - age * 10)).await;
            }
            self.days.get(&date).cloned()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn body(date: NaiveDate, records: &str) -> String {
        format!(
            r#"{{"date": "{}", "bank": "PB", "exchangeRate": [{records}]}}"#,
            format_api_date(date)
        )
    }

    fn usd(buy: &str, sale: &str) -> String {
        format!(r#"{{"currency": "USD", "purchaseRateNB": {buy}, "saleRateNB": {sale}}}"#)
    }

    fn query(code: &str, days: usize) -> ExchangeQuery {
        ExchangeQuery::new(code.parse().unwrap(), DayCount::new(days).unwrap())
    }

    #[tokio::test]
    async fn test_lines_are_newest_first() {
        let d0 = today();
        let d1 = d0.pred_opt().unwrap();
        let d2 = d1.pred_opt().unwrap();
        let (b0, b1, b2) = (
            body(d0, &usd("41.1", "41.2")),
            body(d1, &usd("41.3", "41.4")),
            body(d2, &usd("41.5", "41.6")),
        );
        let mut provider = StubProvider::new(vec![(d2, b2), (d0, b0), (d1, b1)]);
        provider.reverse_latency = true;

        let result = get_exchange(&provider, &query("USD", 3), today(), LookupPolicy::FailCurrency)
            .await
            .unwrap();

        assert_eq!(
            result.text_lines(),
            vec![
                "USD: buy: 41.1, sale: 41.2. Date: 18.10.2026",
                "USD: buy: 41.3, sale: 41.4. Date: 17.10.2026",
                "USD: buy: 41.5, sale: 41.6. Date: 16.10.2026",
            ]
        );
        assert_eq!(provider.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_days_are_skipped() {
        let d1 = today().pred_opt().unwrap();
        let b1 = body(d1, &usd("41.3", "41.4"));
        let provider = StubProvider::new(vec![(d1, b1)]);

        let result = get_exchange(&provider, &query("USD", 2), today(), LookupPolicy::FailCurrency)
            .await
            .unwrap();

        assert_eq!(
            result.text_lines(),
            vec!["USD: buy: 41.3, sale: 41.4. Date: 17.10.2026"]
        );
    }

    #[tokio::test]
    async fn test_all_days_failing_returns_not_found() {
        let provider = StubProvider::new(vec![]);

        let result = get_exchange(&provider, &query("EUR", 5), today(), LookupPolicy::FailCurrency)
            .await
            .unwrap();

        assert_eq!(result, AggregateResult::NotFound);
        assert_eq!(result.to_string(), "Data was not found");
        assert_eq!(provider.calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_unmatched_currency_fails_whole_currency() {
        let d0 = today();
        let d1 = d0.pred_opt().unwrap();
        let (b0, b1) = (body(d0, &usd("41.1", "41.2")), body(d1, ""));
        let provider = StubProvider::new(vec![(d0, b0), (d1, b1)]);

        let result =
            get_exchange(&provider, &query("USD", 2), today(), LookupPolicy::FailCurrency).await;

        assert_eq!(
            result,
            Err(LookupError::Missing {
                currency: "USD".to_string(),
                date: "17.10.2026".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_unmatched_currency_skips_day() {
        let d0 = today();
        let d1 = d0.pred_opt().unwrap();
        let duplicated = format!("{},{}", usd("1", "2"), usd("3", "4"));
        let (b0, b1) = (body(d0, &usd("41.1", "41.2")), body(d1, &duplicated));
        let provider = StubProvider::new(vec![(d0, b0), (d1, b1)]);

        let result = get_exchange(&provider, &query("USD", 2), today(), LookupPolicy::SkipDay)
            .await
            .unwrap();

        assert_eq!(
            result.text_lines(),
            vec!["USD: buy: 41.1, sale: 41.2. Date: 18.10.2026"]
        );
    }

    #[tokio::test]
    async fn test_skip_day_with_no_matches_is_not_found() {
        let d0 = today();
        let b0 = body(d0, &usd("41.1", "41.2"));
        let provider = StubProvider::new(vec![(d0, b0)]);

        let result = get_exchange(&provider, &query("GBP", 1), today(), LookupPolicy::SkipDay)
            .await
            .unwrap();

        assert_eq!(result, AggregateResult::NotFound);
    }
}
