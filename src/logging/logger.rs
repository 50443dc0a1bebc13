// file: src/logging/logger.rs
// version: 2.0.0
// guid: j0k1l2m3-n4o5-6789-0123-456789jklmno

//! Logger initialization and configuration

use crate::{DevctlError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither a flag nor `RUST_LOG` picks one
const DEFAULT_LEVEL: &str = "warn";

/// Filter for the given flags; `RUST_LOG` wins when neither flag is set
pub fn build_filter(debug: bool, quiet: bool) -> EnvFilter {
    if quiet {
        EnvFilter::new("error")
    } else if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

/// Initialize the logging system; logs go to stderr so command results stay on stdout
pub fn init_logger(debug: bool, quiet: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(debug, quiet))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| DevctlError::config(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_debug() {
        assert_eq!(build_filter(true, true).to_string(), "error");
    }

    #[test]
    fn test_debug_filter() {
        assert_eq!(build_filter(true, false).to_string(), "debug");
    }

    #[test]
    fn test_init_logger_twice_fails_gracefully() {
        // The global subscriber can only be set once per process
        let _ = init_logger(false, false);
        let second = init_logger(false, false);
        assert!(second.is_err());
    }
}
