/// Error types shared across the application.

use thiserror::Error;

/// Failure of a single round trip to the scoring service.
///
/// Carried inside UI messages, so every variant holds owned strings and
/// the type is `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, TLS error, body read error...
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with anything other than exactly 200
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body was neither a sample, a completion notice nor the sentinel
    #[error("could not decode reply: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Top-level error returned from `main` and the queue helper
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("UI error: {0}")]
    Ui(#[from] iced::Error),

    #[error("{0}")]
    Usage(String),
}

impl From<pico_args::Error> for AppError {
    fn from(err: pico_args::Error) -> Self {
        AppError::Usage(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
