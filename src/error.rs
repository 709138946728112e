//! Structured error handling and exit codes.

use serde::Serialize;

use crate::config::ConfigError;
use crate::scanner::PathError;

/// Exit codes for the clean-files application.
///
/// - 0: Success (every flagged item was handled)
/// - 1: General error (unexpected failure)
/// - 2: Configuration or path error (nothing was scanned)
/// - 3: Partial success (some files could not be read or changed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: All active rules completed without per-file failures.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Config error: The configuration or a directory argument is invalid.
    ConfigError = 2,
    /// Partial success: Rules completed but some files failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CF000",
            Self::GeneralError => "CF001",
            Self::ConfigError => "CF002",
            Self::PartialSuccess => "CF003",
        }
    }

    /// Exit code for a fatal application error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<ConfigError>().is_some() || err.downcast_ref::<PathError>().is_some()
        {
            Self::ConfigError
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "CF002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
