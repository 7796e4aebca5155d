//! Calendar range and request URLs for the daily rates endpoint

use chrono::NaiveDate;

const API_DATE_FORMAT: &str = "%d.%m.%Y";

pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_DATE_FORMAT).to_string()
}

/// Returns `count` dates starting at `today` and walking backwards one day at a time.
pub fn date_range(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    std::iter::successors(Some(today), |date| date.pred_opt())
        .take(count)
        .collect()
}

pub fn day_url(base_url: &str, date: NaiveDate) -> String {
    format!(
        "{}/p24api/exchange_rates?json&date={}",
        base_url.trim_end_matches('/'),
        format_api_date(date)
    )
}
