//! Error types for the Taskpulse Core library

use thiserror::Error;

/// Result type alias for taskpulse operations
pub type Result<T> = std::result::Result<T, TaskpulseError>;

/// Main error type for taskpulse operations
#[derive(Error, Debug)]
pub enum TaskpulseError {
    /// No valid session; every task operation fails closed on this
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Covers both "does not exist" and "exists but belongs to someone
    /// else" so that callers cannot probe other owners' data
    #[error("Task not found: {uuid}")]
    TaskNotFound { uuid: String },

    #[error("Subtask not found: {uuid}")]
    SubtaskNotFound { uuid: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TaskpulseError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a task-not-found error
    pub fn task_not_found(uuid: impl ToString) -> Self {
        Self::TaskNotFound {
            uuid: uuid.to_string(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for TaskpulseError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
