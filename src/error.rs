// src/error.rs

//! Unified error handling for the triage pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for triage operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// AWS S3 error
    #[error("S3 error: {0}")]
    S3(String),

    /// Amazon Bedrock invocation failed
    #[error("Bedrock error: {0}")]
    Bedrock(String),

    /// Amazon SNS publish failed
    #[error("SNS error: {0}")]
    Sns(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Log object is not valid UTF-8
    #[error("Log is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Delimited text could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Trigger event did not name an object
    #[error("Invalid trigger event: {0}")]
    Event(String),

    /// A log row held a value the filter cannot interpret
    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Inference response did not have the expected shape
    #[error("Malformed inference response: {0}")]
    Inference(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a trigger event error.
    pub fn event(message: impl Into<String>) -> Self {
        Self::Event(message.into())
    }

    /// Create a row parse error with the file line it came from.
    pub fn parse(line: u64, message: impl fmt::Display) -> Self {
        Self::Parse {
            line,
            message: message.to_string(),
        }
    }

    /// Create a malformed inference response error.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }
}
