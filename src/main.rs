use anyhow::Result;
use clap::{Parser, Subcommand};
use fxdays::cli::OutputFormat;
use fxdays::core::DayCount;
use fxdays::core::log::init_logging;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(
    version,
    about,
    args_conflicts_with_subcommands = true,
    allow_negative_numbers = true
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Number of trailing days to fetch, today included (1-10)
    days: Option<String>,

    /// Extra currency codes to report besides the base set
    currencies: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let start = Instant::now();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Some(Commands::Setup) = cli.command {
        fxdays::cli::setup::setup()?;
        return Ok(ExitCode::SUCCESS);
    }

    let days = match DayCount::parse_input(cli.days.as_deref()) {
        Ok(days) => days,
        Err(e) => {
            println!("{e}");
            print_elapsed(start);
            return Ok(ExitCode::from(2));
        }
    };

    let result = fxdays::run(
        days,
        &cli.currencies,
        cli.config_path.as_deref(),
        cli.format,
    )
    .await;
    print_elapsed(start);

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            Err(e)
        }
    }
}

fn print_elapsed(start: Instant) {
    println!("Total time: {:.3}s", start.elapsed().as_secs_f64());
}
