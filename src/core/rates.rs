//! Exchange rate types shared by the fetcher, aggregator and orchestrator

use super::error::{InputError, LookupError};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt::Display;
use std::str::FromStr;

/// Upper bound on the number of trailing days a single run may request.
pub const MAX_DAYS: usize = 10;

/// Placeholder shown when no day yielded a matching rate.
pub const NOT_FOUND_MESSAGE: &str = "Data was not found";

/// Number of trailing calendar days to fetch, today included. Always within `1..=MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount(usize);

impl DayCount {
    pub fn new(days: usize) -> Result<Self, InputError> {
        match days {
            0 => Err(InputError::MissingDays),
            n if n > MAX_DAYS => Err(InputError::TooManyDays {
                requested: n,
                max: MAX_DAYS,
            }),
            n => Ok(DayCount(n)),
        }
    }

    /// Validates the raw positional argument as typed by the user.
    pub fn parse_input(input: Option<&str>) -> Result<Self, InputError> {
        let raw = input.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(InputError::MissingDays);
        }
        let days = raw
            .parse::<usize>()
            .map_err(|_| InputError::InvalidValue {
                value: raw.to_string(),
            })?;
        Self::new(days)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Display for DayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-letter currency code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code.to_ascii_uppercase()))
        } else {
            Err(InputError::InvalidCurrency {
                value: s.to_string(),
            })
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeQuery {
    pub currency: CurrencyCode,
    pub days: DayCount,
}

impl ExchangeQuery {
    pub fn new(currency: CurrencyCode, days: DayCount) -> Self {
        Self { currency, days }
    }
}

/// Parsed body of one `exchange_rates` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DayRates {
    pub date: String,
    #[serde(rename = "exchangeRate", default)]
    pub exchange_rate: Vec<RateRecord>,
}

/// One currency entry of a day response. The UAH base entry carries no `currency`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateRecord {
    pub currency: Option<String>,
    #[serde(rename = "purchaseRateNB")]
    pub purchase_rate_nb: Option<Number>,
    #[serde(rename = "saleRateNB")]
    pub sale_rate_nb: Option<Number>,
}

#[derive(Debug, Clone, Copy)]
pub enum RateLookup<'a> {
    Found(&'a RateRecord),
    NotFound,
    Ambiguous(usize),
}

impl DayRates {
    /// Finds the single record for `currency`. Records without both NB rates are ignored.
    pub fn lookup(&self, currency: &CurrencyCode) -> RateLookup<'_> {
        let mut matches = self.exchange_rate.iter().filter(|record| {
            record.currency.as_deref() == Some(currency.as_str())
                && record.purchase_rate_nb.is_some()
                && record.sale_rate_nb.is_some()
        });

        match (matches.next(), matches.count()) {
            (None, _) => RateLookup::NotFound,
            (Some(record), 0) => RateLookup::Found(record),
            (Some(_), rest) => RateLookup::Ambiguous(rest + 1),
        }
    }

    /// Builds the rate line for `currency`, or reports why the day has none.
    pub fn format_line(&self, currency: &CurrencyCode) -> Result<FormattedLine, LookupError> {
        match self.lookup(currency) {
            RateLookup::Found(RateRecord {
                purchase_rate_nb: Some(buy),
                sale_rate_nb: Some(sale),
                ..
            }) => Ok(FormattedLine {
                currency: currency.clone(),
                buy: buy.clone(),
                sale: sale.clone(),
                date: self.date.clone(),
            }),
            RateLookup::Found(_) | RateLookup::NotFound => Err(LookupError::Missing {
                currency: currency.to_string(),
                date: self.date.clone(),
            }),
            RateLookup::Ambiguous(count) => Err(LookupError::Ambiguous {
                currency: currency.to_string(),
                date: self.date.clone(),
                count,
            }),
        }
    }
}

/// One currency on one day. The date is the one the response reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub currency: CurrencyCode,
    pub buy: Number,
    pub sale: Number,
    pub date: String,
}

impl Display for FormattedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: buy: {}, sale: {}. Date: {}",
            self.currency, self.buy, self.sale, self.date
        )
    }
}

/// Rates collected for one currency across the requested days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateResult {
    /// Newest date first.
    Lines(Vec<FormattedLine>),
    NotFound,
}

impl AggregateResult {
    pub fn text_lines(&self) -> Vec<String> {
        match self {
            AggregateResult::Lines(lines) => lines.iter().map(ToString::to_string).collect(),
            AggregateResult::NotFound => vec![NOT_FOUND_MESSAGE.to_string()],
        }
    }
}

impl Display for AggregateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text_lines().join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyOutcome {
    pub currency: CurrencyCode,
    pub result: Result<AggregateResult, LookupError>,
}

impl CurrencyOutcome {
    pub fn failure_message(&self) -> String {
        format!("Failed to get currency rates for {}", self.currency)
    }
}

impl Display for CurrencyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.result {
            Ok(result) => write!(f, "{result}"),
            Err(_) => f.write_str(&self.failure_message()),
        }
    }
}

/// One outcome per requested currency, in request order.
pub type RunResult = Vec<CurrencyOutcome>;

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    const DAY_JSON: &str = r#"{
        "date": "17.10.2026",
        "bank": "PB",
        "baseCurrency": 980,
        "baseCurrencyLit": "UAH",
        "exchangeRate": [
            {"baseCurrency": "UAH", "saleRateNB": 1.0, "purchaseRateNB": 1.0},
            {"baseCurrency": "UAH", "currency": "EUR", "saleRateNB": 48.2104, "purchaseRateNB": 48.2104, "saleRate": 48.9, "purchaseRate": 47.9},
            {"baseCurrency": "UAH", "currency": "USD", "saleRateNB": 41.5, "purchaseRateNB": 41.0},
            {"baseCurrency": "UAH", "currency": "PLN", "saleRateNB": 11.3},
            {"baseCurrency": "UAH", "currency": "CHF", "saleRateNB": 51.1, "purchaseRateNB": 51.1},
            {"baseCurrency": "UAH", "currency": "CHF", "saleRateNB": 51.2, "purchaseRateNB": 51.2}
        ]
    }"#;

    fn day() -> DayRates {
        serde_json::from_str(DAY_JSON).unwrap()
    }

    #[test]
    fn test_day_count_bounds() {
        assert_eq!(DayCount::new(1).unwrap().get(), 1);
        assert_eq!(DayCount::new(MAX_DAYS).unwrap().get(), 10);
        assert_eq!(DayCount::new(0), Err(InputError::MissingDays));
        assert!(matches!(
            DayCount::new(11),
            Err(InputError::TooManyDays { requested: 11, .. })
        ));
    }

    #[test]
    fn test_day_count_parse_input() {
        assert_eq!(DayCount::parse_input(Some("2")).unwrap().get(), 2);
        assert_eq!(DayCount::parse_input(Some(" 7 ")).unwrap().get(), 7);
        assert_eq!(DayCount::parse_input(None), Err(InputError::MissingDays));
        assert_eq!(DayCount::parse_input(Some("")), Err(InputError::MissingDays));
        assert_eq!(DayCount::parse_input(Some("0")), Err(InputError::MissingDays));
        assert!(matches!(
            DayCount::parse_input(Some("abc")),
            Err(InputError::InvalidValue { .. })
        ));
        assert!(matches!(
            DayCount::parse_input(Some("-3")),
            Err(InputError::InvalidValue { .. })
        ));
        assert_eq!(
            DayCount::parse_input(Some("25")).unwrap_err().to_string(),
            "You cannot get currency rates for more then 10 days"
        );
    }

    #[test]
    fn test_currency_code_normalises_case() {
        assert_eq!(code("gbp").as_str(), "GBP");
        assert!("GB".parse::<CurrencyCode>().is_err());
        assert!("US1".parse::<CurrencyCode>().is_err());
        assert!("EURO".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_lookup_found() {
        let day = day();
        match day.lookup(&code("EUR")) {
            RateLookup::Found(record) => assert_eq!(record.currency.as_deref(), Some("EUR")),
            other => panic!("Expected a match, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_missing_and_incomplete() {
        let day = day();
        assert!(matches!(day.lookup(&code("GBP")), RateLookup::NotFound));
        // PLN has no purchase rate
        assert!(matches!(day.lookup(&code("PLN")), RateLookup::NotFound));
    }

    #[test]
    fn test_lookup_ambiguous() {
        assert!(matches!(
            day().lookup(&code("CHF")),
            RateLookup::Ambiguous(2)
        ));
    }

    #[test]
    fn test_format_line_uses_response_date_and_raw_numbers() {
        let day = day();
        assert_eq!(
            day.format_line(&code("EUR")).unwrap().to_string(),
            "EUR: buy: 48.2104, sale: 48.2104. Date: 17.10.2026"
        );
        assert_eq!(
            day.format_line(&code("USD")).unwrap().to_string(),
            "USD: buy: 41.0, sale: 41.5. Date: 17.10.2026"
        );
    }

    #[test]
    fn test_format_line_errors() {
        let day = day();
        assert_eq!(
            day.format_line(&code("GBP")),
            Err(LookupError::Missing {
                currency: "GBP".to_string(),
                date: "17.10.2026".to_string()
            })
        );
        assert!(matches!(
            day.format_line(&code("CHF")),
            Err(LookupError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_outcome_display() {
        let failed = CurrencyOutcome {
            currency: code("EUR"),
            result: Err(LookupError::Missing {
                currency: "EUR".to_string(),
                date: "17.10.2026".to_string(),
            }),
        };
        assert_eq!(failed.to_string(), "Failed to get currency rates for EUR");

        let empty = CurrencyOutcome {
            currency: code("USD"),
            result: Ok(AggregateResult::NotFound),
        };
        assert_eq!(empty.to_string(), "Data was not found");
    }
}
