// crates/auth-lib/src/error.rs

//! Central error type for session and advice operations.
use thiserror::Error;

use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("User already exists")]
    DuplicateUser,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Corrupt stored value under `{key}`: {reason}")]
    StoreParse { key: String, reason: String },

    #[error("Advice service error: {0}")]
    AdviceService(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::DuplicateUser => "AUTH_001",
            AppError::InvalidCredentials => "AUTH_002",
            AppError::StoreParse { .. } => "STORE_001",
            AppError::AdviceService(_) => "ADVICE_001",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a single human-readable message suitable for the presentation layer
    pub fn user_message(&self) -> String {
        match self {
            AppError::DuplicateUser | AppError::InvalidCredentials => self.to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::StoreParse { .. } => {
                "Stored session data was corrupt and has been reset".to_string()
            }
            AppError::AdviceService(_) => "AI insights are unavailable right now".to_string(),
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }

    pub fn store_parse(key: &str, err: impl std::fmt::Display) -> Self {
        AppError::StoreParse {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
