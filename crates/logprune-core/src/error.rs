//! Error types for logprune

use thiserror::Error;

/// Result type alias using PruneError
pub type Result<T> = std::result::Result<T, PruneError>;

/// Error type alias for convenience
pub type Error = PruneError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
    pub const DATA_INTEGRITY: i32 = 4;
}

/// Main error type for logprune
#[derive(Debug, Error)]
pub enum PruneError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The id range of a table could not be read.
    #[error("Cannot read id range of {table}: {reason}")]
    Range { table: String, reason: String },

    /// A probed boundary row has no timestamp. Never retried.
    #[error("{table}: timestamp is NULL or row is missing at pk={id}")]
    MissingTimestamp { table: String, id: i64 },

    #[error("{table}: unreadable timestamp {value:?} at pk={id}")]
    InvalidTimestamp {
        table: String,
        id: i64,
        value: String,
    },

    /// The delete statement itself failed. Blocks deleted before it stay deleted.
    #[error("{table}: delete through pk={end_id} failed: {message}")]
    Execution {
        table: String,
        end_id: i64,
        message: String,
    },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PruneError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::ProfileNotFound(_)
            | Self::InvalidIdentifier(_)
            | Self::InvalidInput(_) => exit_codes::INVALID_INPUT,
            Self::MissingTimestamp { .. } | Self::InvalidTimestamp { .. } => {
                exit_codes::DATA_INTEGRITY
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// True for errors that point at corrupt rows rather than the environment.
    pub fn is_data_integrity(&self) -> bool {
        self.exit_code() == exit_codes::DATA_INTEGRITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let err = PruneError::MissingTimestamp {
            table: "access_log".to_string(),
            id: 42,
        };
        assert_eq!(err.exit_code(), exit_codes::DATA_INTEGRITY);
        assert!(err.is_data_integrity());

        let err = PruneError::ProfileNotFound("batch".to_string());
        assert_eq!(err.exit_code(), exit_codes::INVALID_INPUT);

        let err = PruneError::Execution {
            table: "access_log".to_string(),
            end_id: 10,
            message: "database is locked".to_string(),
        };
        assert_eq!(err.exit_code(), exit_codes::GENERAL_ERROR);
        assert!(!err.is_data_integrity());
    }

    #[test]
    fn test_missing_timestamp_message() {
        let err = PruneError::MissingTimestamp {
            table: "access_log".to_string(),
            id: 7,
        };
        assert_eq!(
            err.to_string(),
            "access_log: timestamp is NULL or row is missing at pk=7"
        );
    }
}
