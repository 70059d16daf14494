//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use log::LevelFilter;

/// Initialize the logging system with the default `info` level
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system
///
/// `RUST_LOG` still applies per-module filters on top of `level`. Calling this
/// more than once is harmless; later calls keep the first logger.
pub fn init_with_level(level: &str) {
    let filter = parse_level(level);
    let _ = env_logger::Builder::from_default_env()
        .filter_level(filter)
        .try_init();
}

/// Parse a log level name, falling back to `info` for unknown names
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Unknown log level '{level}', using info");
        LevelFilter::Info
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("chatty"), LevelFilter::Info);
    }

    #[test]
    fn test_repeated_init() {
        init_with_level("debug");
        init_with_level("trace");
    }
}
