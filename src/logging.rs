//! Tracing setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;

/// Environment variable that overrides the configured level.
pub const LOG_ENV: &str = "NOTABILI_LOG";

/// Install the global subscriber. `NOTABILI_LOG` wins over the config.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init();

    if installed.is_ok() {
        tracing::debug!(level = %config.level, "logging initialized");
    }
}
