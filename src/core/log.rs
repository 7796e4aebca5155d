use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Logs at WARN and above, or DEBUG with `verbose`. A `RUST_LOG` directive replaces both.
pub fn init_logging(verbose: bool) {
    let (env_filter, app_filter) = filters(verbose, EnvFilter::try_from_default_env().ok());

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(env_filter)
        .with(app_filter)
        .init();
}

fn filters(verbose: bool, env_filter: Option<EnvFilter>) -> (Option<EnvFilter>, Option<Targets>) {
    match env_filter {
        Some(env_filter) => (Some(env_filter), None),
        None => {
            let level = if verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::WARN
            };
            (None, Some(Targets::new().with_target("fxdays", level)))
        }
    }
}
