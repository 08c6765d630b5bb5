//! Error handling for name checking runs.
//!
//! Only run-level failures live here. A lookup that fails transiently is not an
//! error of the run: it is reported through [`crate::resolver::Outcome`] and the
//! affected pair simply produces no verdict.

use std::fmt;

/// Main error type for dn-check operations.
#[derive(Debug, Clone)]
pub enum DnCheckError {
    /// Configuration errors (invalid settings, empty TLD list, etc.)
    Config { message: String },

    /// File I/O errors when reading name lists or config files
    FileError { path: String, message: String },

    /// A probe task could not be scheduled or did not run to completion.
    ///
    /// This aborts the whole run; no partial result set is returned.
    TaskFailed { message: String },

    /// Results could not be written to their destination
    Output { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl DnCheckError {
    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new task failure error.
    pub fn task_failed<M: Into<String>>(message: M) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }

    /// Create a new output error.
    pub fn output<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Output {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the run was aborted while probes were in flight.
    pub fn is_incomplete_run(&self) -> bool {
        matches!(self, Self::TaskFailed { .. })
    }
}

impl fmt::Display for DnCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message } => write!(f, "Configuration error: {}", message),
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::TaskFailed { message } => {
                write!(f, "Run aborted, results are incomplete: {}", message)
            }
            Self::Output { path, message } => {
                write!(f, "Failed to write results to '{}': {}", path, message)
            }
            Self::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for DnCheckError {}

impl From<std::io::Error> for DnCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<serde_json::Error> for DnCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for DnCheckError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

impl From<tokio::task::JoinError> for DnCheckError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            Self::task_failed(format!("probe task panicked: {}", err))
        } else {
            Self::task_failed(format!("probe task was cancelled: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DnCheckError::config("TLD list cannot be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: TLD list cannot be empty"
        );

        let err = DnCheckError::file_error("names.txt", "not found");
        assert_eq!(err.to_string(), "File error at 'names.txt': not found");
    }

    #[test]
    fn test_task_failure_marks_run_incomplete() {
        assert!(DnCheckError::task_failed("semaphore closed").is_incomplete_run());
        assert!(!DnCheckError::config("bad").is_incomplete_run());
        assert!(DnCheckError::task_failed("x")
            .to_string()
            .contains("incomplete"));
    }

    #[test]
    fn test_toml_error_becomes_config_error() {
        let err: DnCheckError = toml::from_str::<toml::Value>("= nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, DnCheckError::Config { .. }));
    }
}
