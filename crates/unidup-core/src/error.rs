//! Error types and exit codes for unidup
//!
//! Exit codes:
//! - 0: Success (including clean cancellation and "no duplicates found")
//! - 1: Generic failure (including a group with no retrievable payload)
//! - 2: Usage error (bad flags/args, missing confirmation)
//! - 3: Data/store error (missing store, unknown asset, unknown schema)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes per the unidup CLI contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, unknown asset (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for UnidupError {
    fn from(err: rusqlite::Error) -> Self {
        UnidupError::Other(err.to_string())
    }
}

/// Errors that can occur during unidup operations
#[derive(Error, Debug)]
pub enum UnidupError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("refusing to run destructive steps without confirmation")]
    NotConfirmed,

    // Data/store errors (exit code 3)
    #[error("store not found at {search_root:?}")]
    StoreNotFound { search_root: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    #[error("asset not found: {id}")]
    AssetNotFound { id: i64 },

    #[error("asset {id} has no eligible version history")]
    NoEligibleVersion { id: i64 },

    #[error("schema not found: {name}")]
    SchemaNotFound { name: String },

    // Generic failures (exit code 1)
    #[error("none of the duplicate assets for {fingerprint} has a payload that actually exists")]
    AllCandidatesInvalid { fingerprint: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl UnidupError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        UnidupError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed operation against a named target
    pub fn target_operation(
        operation: &str,
        target: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        UnidupError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: target.to_string(),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            UnidupError::UnknownFormat(_)
            | UnidupError::UsageError(_)
            | UnidupError::NotConfirmed => ExitCode::Usage,

            UnidupError::StoreNotFound { .. }
            | UnidupError::InvalidStore { .. }
            | UnidupError::AssetNotFound { .. }
            | UnidupError::NoEligibleVersion { .. }
            | UnidupError::SchemaNotFound { .. } => ExitCode::Data,

            UnidupError::AllCandidatesInvalid { .. }
            | UnidupError::Io(_)
            | UnidupError::Json(_)
            | UnidupError::Toml(_)
            | UnidupError::FailedOperation { .. }
            | UnidupError::FailedOperationWithTarget { .. }
            | UnidupError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier used in JSON output
    fn error_type(&self) -> &'static str {
        match self {
            UnidupError::UnknownFormat(_) => "unknown_format",
            UnidupError::UsageError(_) => "usage_error",
            UnidupError::NotConfirmed => "not_confirmed",
            UnidupError::StoreNotFound { .. } => "store_not_found",
            UnidupError::InvalidStore { .. } => "invalid_store",
            UnidupError::AssetNotFound { .. } => "asset_not_found",
            UnidupError::NoEligibleVersion { .. } => "no_eligible_version",
            UnidupError::SchemaNotFound { .. } => "schema_not_found",
            UnidupError::AllCandidatesInvalid { .. } => "all_candidates_invalid",
            UnidupError::Io(_) => "io_error",
            UnidupError::Json(_) => "json_error",
            UnidupError::Toml(_) => "toml_error",
            UnidupError::FailedOperation { .. } => "failed_operation",
            UnidupError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            UnidupError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for unidup operations
pub type Result<T> = std::result::Result<T, UnidupError>;
