//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or resolving `almanac.toml`.
///
/// All of them are fatal at initialization: no rebuild runs on a config
/// that failed here.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("unrecognized time zone `{0}` (expected `UTC` or an offset like `+09:00`)")]
    TimeZone(String),

    #[error("[summary_separator] is not a valid regular expression")]
    SummarySeparator(#[source] regex::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("almanac.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("almanac.toml"));

        let validation_err = ConfigError::Validation("[per_page] must be at least 1".to_string());
        assert!(validation_err.to_string().contains("per_page"));

        let tz_err = ConfigError::TimeZone("Mars/Olympus".into());
        assert!(tz_err.to_string().contains("Mars/Olympus"));
    }
}
