//! Logging setup for one-shot commands.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! `RUST_LOG` wins over the `-q`/`-v` flags when it is set.

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Build the log filter for a configuration
#[must_use]
pub fn filter_for(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.default_filter()))
}

/// Install the global subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init(config: &CliConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.color.should_color()).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
