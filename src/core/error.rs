//! Domain errors surfaced to the command line or isolated per currency

use thiserror::Error;

/// Rejections of the command-line input. These are raised before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please, enter amount of days")]
    MissingDays,
    #[error("You cannot get currency rates for more then {max} days")]
    TooManyDays { requested: usize, max: usize },
    #[error("Wrong Value")]
    InvalidValue { value: String },
    #[error("currency must be a 3-letter code: '{value}'")]
    InvalidCurrency { value: String },
}

/// A day response that does not carry exactly one usable record for a currency.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("no {currency} rate in response for {date}")]
    Missing { currency: String, date: String },
    #[error("{count} {currency} rates in response for {date}")]
    Ambiguous {
        currency: String,
        date: String,
        count: usize,
    },
}
