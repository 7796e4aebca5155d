//! Core business logic abstractions

pub mod aggregator;
pub mod config;
pub mod dates;
pub mod error;
pub mod log;
pub mod orchestrator;
pub mod provider;
pub mod rates;

// Re-export main types for cleaner imports
pub use error::{InputError, LookupError};
pub use provider::DayRatesProvider;
pub use rates::{
    AggregateResult, CurrencyCode, CurrencyOutcome, DayCount, FormattedLine, RunResult,
};
