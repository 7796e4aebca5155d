use crate::core::config::PrivatBankProviderConfig;
use crate::core::dates::day_url;
use crate::core::provider::DayRatesProvider;
use crate::core::rates::DayRates;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Client for the PrivatBank archive endpoint, one GET per day.
pub struct PrivatBankProvider {
    base_url: String,
    client: reqwest::Client,
}

impl PrivatBankProvider {
    pub fn new(config: &PrivatBankProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxdays/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(PrivatBankProvider {
            base_url: config.base_url.clone(),
            client,
        })
    }

    /// GETs `url` and returns the JSON body. Every failure is logged and reported as `None`.
    pub async fn fetch_json(&self, url: &str) -> Option<Value> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, %url, "Connection error");
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            error!(status = status.as_u16(), %url, "Error status");
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                error!(error = %e, %url, "Failed to parse response body");
                None
            }
        }
    }
}

#[async_trait]
impl DayRatesProvider for PrivatBankProvider {
    #[instrument(name = "PrivatBankDayFetch", skip(self), fields(date = %date))]
    async fn fetch_day(&self, date: NaiveDate) -> Option<DayRates> {
        let url = day_url(&self.base_url, date);
        debug!("Requesting rates from {}", url);

        let body = self.fetch_json(&url).await?;
        match serde_json::from_value::<DayRates>(body) {
            Ok(day) => {
                debug!(records = day.exchange_rate.len(), "Received day rates");
                Some(day)
            }
            Err(e) => {
                error!(error = %e, %url, "Unexpected response shape");
                None
            }
        }
    }
}
