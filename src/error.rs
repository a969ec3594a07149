//! Error types for squat-sentinel

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Date was not a real calendar date in `YYYY-MM-DD` form
    #[error("Invalid date format: {0:?}\nPlease enter a valid date in YYYY-MM-DD format.")]
    InvalidDateFormat(String),

    /// Load was not `<positive number> <kg|lb>`
    #[error("Invalid weight format: {0:?}\nPlease enter the weight in the format '100 kg' or '225 lb'.")]
    InvalidWeightFormat(String),

    /// Video path missing on disk or not a known video extension
    #[error("Invalid video file: {path}: {reason}")]
    InvalidVideoPath {
        /// Path as entered
        path: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Operator input ended before a valid answer was given
    #[error("Input closed before a valid {0} was entered")]
    InputClosed(&'static str),

    /// Config file could not be parsed or serialized
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session log write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_expected_format() {
        let err = Error::InvalidDateFormat("2024-13-40".into());
        assert!(err.to_string().contains("YYYY-MM-DD"));

        let err = Error::InvalidWeightFormat("100 stones".into());
        assert!(err.to_string().contains("'100 kg'"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
