//! Tracing subscriber initialisation
//!
//! Logs go to stderr so commands that print JSON keep stdout clean.
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Build the env filter for a logging config
///
/// `verbose` forces `debug` regardless of the configured level, but an
/// explicit `RUST_LOG` still wins.
pub fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { config.level.as_str() };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber
///
/// Fails if a global subscriber has already been set.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialise tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_level_falls_back() {
        let config = LoggingConfig {
            level: "not a [level".to_string(),
        };
        // Must not panic on an unparsable directive
        let _ = build_filter(&config, false);
    }
}
