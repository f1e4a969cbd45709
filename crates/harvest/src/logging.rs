//! Logging initialization.
//!
//! Logs go to stderr so stdout stays clean for the JSON/JSONL report.

use harvest_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem at `level`.
///
/// `RUST_LOG` overrides the level chosen here.
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

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(config: &Config, verbose: bool, json_logs: bool) {
    let json_format = json_logs || config.logging.format.eq_ignore_ascii_case("json");
    init(&effective_level(config, verbose), json_format);
}

/// Resolve the filter level: `--verbose` raises the configured level to at
/// least `debug`.
fn effective_level(config: &Config, verbose: bool) -> String {
    let configured = config.logging.level.to_ascii_lowercase();
    if verbose && configured != "trace" {
        "debug".to_string()
    } else {
        configured
    }
}
