use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    ValidationError(String),
    ParseError(String),
    MethodNotAllowed(String),
    ConfigurationError(String),
    UpstreamError(String),
}

impl AppError {
    /// HTTP status the append endpoint answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::ValidationError(_) | AppError::ParseError(_) => 400,
            AppError::MethodNotAllowed(_) => 405,
            AppError::UpstreamError(_) => 502,
            AppError::ConfigurationError(_) => 500,
        }
    }

    /// The bare message shown to the caller, without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::ParseError(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::ConfigurationError(msg)
            | AppError::UpstreamError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::MethodNotAllowed(msg) => write!(f, "Method error: {}", msg),
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

pub type Result<T> = std::result::Result<T, AppError>;
