//! Logging initialization.
//!
//! Logs go to stderr so they never mix with command output; `RUST_LOG`
//! takes precedence over the configured level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber with `level` as the default filter.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from `[logging]`, with `-v` and `--json-logs` winning.
pub fn init_from_config(config: &infobar_core::Config, verbose: bool, json_logs: bool) {
    let (level, json) = resolve(&config.logging, verbose, json_logs);
    init(level, json);
}

fn resolve(logging: &infobar_core::config::LoggingConfig, verbose: bool, json_logs: bool) -> (&str, bool) {
    let level = if verbose && !matches!(logging.level.as_str(), "trace") {
        "debug"
    } else {
        logging.level.as_str()
    };
    (level, json_logs || logging.format == "json")
}
