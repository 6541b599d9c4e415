//! Logger setup for the binary.
//!
//! Diagnostics go to stderr through `env_logger`. `RUST_LOG` always wins
//! over the level picked from `--verbose`.

use log::LevelFilter;

pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Initialise the global logger. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level(verbose))
        .format_timestamp(None)
        .format_target(verbose)
        .parse_default_env();

    if let Err(e) = builder.try_init() {
        log::debug!("logger already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), LevelFilter::Debug);
        assert_eq!(default_level(false), LevelFilter::Warn);
    }

    #[test]
    fn test_init_twice() {
        init_logging(false);
        init_logging(true);
    }
}
