use super::ui;
use crate::core::orchestrator::{RunOptions, get_currency_rates};
use crate::core::rates::{DayRates, NOT_FOUND_MESSAGE};
use crate::core::{AggregateResult, CurrencyCode, DayCount, DayRatesProvider, RunResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use comfy_table::Cell;
use indicatif::ProgressBar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One block of lines per currency
    #[default]
    Text,
    /// A single table with one row per currency and day
    Table,
}

/// Ticks the progress bar as each day request completes.
struct ProgressProvider<'a> {
    inner: &'a (dyn DayRatesProvider + Send + Sync),
    pb: ProgressBar,
}

#[async_trait]
impl<'a> DayRatesProvider for ProgressProvider<'a> {
    async fn fetch_day(&self, date: NaiveDate) -> Option<DayRates> {
        let day = self.inner.fetch_day(date).await;
        self.pb.inc(1);
        day
    }
}

pub async fn run(
    provider: &(dyn DayRatesProvider + Send + Sync),
    currencies: &[CurrencyCode],
    days: DayCount,
    today: NaiveDate,
    options: &RunOptions,
    format: OutputFormat,
) -> RunResult {
    let pb = ui::new_progress_bar((currencies.len() * days.get()) as u64);
    pb.set_message("Fetching rates...");
    let tracked = ProgressProvider {
        inner: provider,
        pb: pb.clone(),
    };

    let results = get_currency_rates(&tracked, currencies, days, today, options).await;
    pb.finish_and_clear();

    let output = match format {
        OutputFormat::Text => render_text(&results),
        OutputFormat::Table => render_table(&results),
    };
    println!("{output}");

    results
}

pub fn render_text(results: &RunResult) -> String {
    results
        .iter()
        .map(|outcome| {
            let mut block = vec![ui::style_text(
                outcome.currency.as_str(),
                ui::StyleType::Title,
            )];
            match &outcome.result {
                Ok(AggregateResult::Lines(lines)) => {
                    block.extend(lines.iter().map(ToString::to_string));
                }
                Ok(AggregateResult::NotFound) => {
                    block.push(ui::style_text(NOT_FOUND_MESSAGE, ui::StyleType::Subtle));
                }
                Err(_) => {
                    block.push(ui::style_text(
                        &outcome.failure_message(),
                        ui::StyleType::Error,
                    ));
                }
            }
            block.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_table(results: &RunResult) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Date"),
        ui::header_cell("Buy"),
        ui::header_cell("Sale"),
    ]);

    for outcome in results {
        match &outcome.result {
            Ok(AggregateResult::Lines(lines)) => {
                for line in lines {
                    table.add_row(vec![
                        Cell::new(line.currency.as_str()),
                        Cell::new(&line.date),
                        ui::rate_cell(&line.buy),
                        ui::rate_cell(&line.sale),
                    ]);
                }
            }
            Ok(AggregateResult::NotFound) => {
                table.add_row(vec![
                    Cell::new(outcome.currency.as_str()),
                    ui::na_cell(NOT_FOUND_MESSAGE, false),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
            Err(_) => {
                table.add_row(vec![
                    Cell::new(outcome.currency.as_str()),
                    ui::na_cell(&outcome.failure_message(), true),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
        }
    }

    table.to_string()
}
