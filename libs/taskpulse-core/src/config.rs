//! Configuration for the taskpulse service

use crate::error::{Result, TaskpulseError};
use std::path::{Path, PathBuf};
use taskpulse_common::{DATABASE_FILENAME, DEFAULT_SERVER_PORT};

/// Runtime configuration: where the database lives, how sessions are
/// verified, and where the server binds
#[derive(Debug, Clone)]
pub struct TaskpulseConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// HS256 secret used to verify session tokens
    pub jwt_secret: String,
    /// Port the API server binds to
    pub port: u16,
}

impl TaskpulseConfig {
    /// Create a configuration with an explicit database path and secret
    #[must_use]
    pub fn new<P: AsRef<Path>>(database_path: P, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            jwt_secret: jwt_secret.into(),
            port: DEFAULT_SERVER_PORT,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads `TASKPULSE_DATABASE_PATH`, `TASKPULSE_JWT_SECRET` and
    /// `TASKPULSE_PORT`.
    ///
    /// # Errors
    /// Returns a configuration error if the JWT secret is unset (the
    /// server must not start with sessions it cannot verify) or the
    /// port is not a number.
    pub fn from_env() -> Result<Self> {
        let database_path = std::env::var("TASKPULSE_DATABASE_PATH")
            .map_or_else(|_| PathBuf::from(DATABASE_FILENAME), PathBuf::from);

        let jwt_secret = std::env::var("TASKPULSE_JWT_SECRET").map_err(|_| {
            TaskpulseError::configuration("TASKPULSE_JWT_SECRET is required but not set")
        })?;

        let port = match std::env::var("TASKPULSE_PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| {
                TaskpulseError::configuration(format!("invalid TASKPULSE_PORT: {value}"))
            })?,
            Err(_) => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            database_path,
            jwt_secret,
            port,
        })
    }

    /// Override the server port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Create configuration for testing with a temporary database
    ///
    /// # Errors
    /// Returns `TaskpulseError::Io` if the temporary file cannot be
    /// created
    pub fn for_testing() -> Result<Self> {
        use tempfile::NamedTempFile;
        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file.path().to_path_buf();
        Ok(Self::new(db_path, "test-secret"))
    }
}
