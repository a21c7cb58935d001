//! # CLI Error Type
//!
//! Unified error type for every subcommand.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Flow in quote-cli                            │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<String, CliError>                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  File problem?    ─── SourceError::Read/Parse ────────┐                 │
//! │         │                                             │                 │
//! │         ▼                                             ▼                 │
//! │  Quote refused?   ─── QuoteRejection ──────────── CliError ──► stderr   │
//! │         │                                             │                 │
//! │         ▼                                             ▼                 │
//! │  Success ──► stdout                             exit status by code     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A refused quote is an expected outcome, so it gets its own exit status and
//! the plain customer-facing message.

use serde::Serialize;

use freight_core::{CoreError, QuoteRejection, RuleSetError};

use crate::sources::SourceError;

/// Error reported by a subcommand.
///
/// ## Serialization
/// With `--format json` a failure is printed as:
/// ```json
/// {
///   "code": "QUOTE_REJECTED",
///   "message": "Sorry, a rate for POM to ZZZ is not available."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, each mapped to a process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The quote request was refused (no weight, same ends, no rate)
    QuoteRejected,

    /// Bad command-line input
    InvalidInput,

    /// Missing or invalid configuration (rates path, rule set)
    ConfigError,

    /// A file could not be read or parsed
    SourceError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub const fn exit_code(self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::QuoteRejected => 2,
            ErrorCode::InvalidInput => 3,
            ErrorCode::ConfigError => 4,
            ErrorCode::SourceError => 5,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::InvalidInput, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

impl From<QuoteRejection> for CliError {
    fn from(err: QuoteRejection) -> Self {
        CliError::new(ErrorCode::QuoteRejected, err.to_string())
    }
}

impl From<RuleSetError> for CliError {
    fn from(err: RuleSetError) -> Self {
        CliError::config(format!("Invalid charge rules: {}", err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Rejected(e) => e.into(),
            CoreError::RuleSet(e) => e.into(),
            CoreError::Validation(e) => CliError::invalid_input(e.to_string()),
        }
    }
}

impl From<SourceError> for CliError {
    fn from(err: SourceError) -> Self {
        tracing::error!(error = %err, "Failed to load source file");
        CliError::new(ErrorCode::SourceError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Failed to encode output: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}
