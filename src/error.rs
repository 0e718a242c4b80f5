//! Error types for dailies
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (unknown task id, bad argument)
//! - 3: Invalid configuration (malformed catalog or timer definition)
//! - 4: Operation failed (persistence I/O, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the dailies CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for dailies operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Configuration errors (exit code 3)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist {}", .0.display())]
    Persist(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UnknownTask(_) | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::InvalidConfig(_) => exit_codes::CONFIG_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::Persist(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable kind for JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UnknownTask(_) => "unknown_task",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::InvalidConfig(_) => "invalid_config",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Persist(_) => "persist",
            Error::OperationFailed(_) => "operation_failed",
        }
    }
}

/// Result type alias for dailies operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    pub kind: &'static str,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
        }
    }
}
