//! Daily rates source abstraction

use super::rates::DayRates;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait DayRatesProvider: Send + Sync {
    /// Fetches the rates published for `date`. `None` means the day is unavailable.
    async fn fetch_day(&self, date: NaiveDate) -> Option<DayRates>;
}
