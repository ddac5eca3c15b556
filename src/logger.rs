//! Logging setup for binaries and tests.

use std::sync::Once;

use env_logger::{Builder, Env};

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Guards the one-time logger installation.
static INIT: Once = Once::new();

/// Installs an `env_logger` backend for the `log` macros used across the crate.
///
/// `RUST_LOG` selects the filter and `RUST_LOG_STYLE` the coloring; without
/// them every target logs at `Info`. Safe to call more than once.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let env = Env::default().default_filter_or(DEFAULT_FILTER);
        let mut builder = Builder::from_env(env);
        builder.format_timestamp_millis();

        match builder.try_init() {
            Ok(()) => log::debug!("logging at {} and above", log::max_level()),
            // The host application installed its own logger first.
            Err(err) => log::debug!("keeping existing logger: {err}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use log::{Level, LevelFilter, info, log_enabled};

    use super::*;

    #[test]
    fn test_default_level_is_info() {
        initialize_logger();
        initialize_logger();
        info!("logger ready");

        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(log::max_level(), LevelFilter::Info);
            assert!(log_enabled!(target: "bid_index", Level::Info));
            assert!(!log_enabled!(target: "bid_index", Level::Debug));
        }
    }
}
