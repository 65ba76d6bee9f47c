//! Error types and error code constants for ctxize.
//!
//! This module provides a unified error type (`CtxizeError`) that bridges
//! domain-specific errors from the loader, the spec parser and the rewrite
//! operation into a common format suitable for CLI and JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (malformed variable or function specification)
//! - `3`: Resolution errors (package, type or function not found, ambiguous)
//! - `4`: Apply errors (failed to write changes, file changed on disk)
//! - `5`: Load failed (syntax or type errors in the loaded program)
//! - `10`: Internal errors (invariant violations, formatting failures)
//!
//! ## Design
//!
//! - **Unified type**: `CtxizeError` is the single error type for CLI output
//! - **Bridging**: `impl From<X> for CtxizeError` lives in the root crate
//! - **Code mapping**: `OutputErrorCode` provides stable integer codes for JSON

use std::fmt;

use thiserror::Error;

pub use crate::types::Location;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad spec strings, bad flags).
    InvalidArguments = 2,
    /// Resolution errors (package, type or function not found, ambiguous).
    ResolutionError = 3,
    /// Apply errors (failed to write changes, snapshot mismatch).
    ApplyError = 4,
    /// The program could not be loaded (syntax or type errors).
    LoadFailed = 5,
    /// Internal errors (bugs, unexpected source shape).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
///
/// All subsystem errors are converted to this type before being rendered as
/// text or JSON. Each variant carries enough context for a helpful message.
#[derive(Debug, Error)]
pub enum CtxizeError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A requested package is not part of the loaded program.
    #[error("package not found: {path}")]
    PackageNotFound { path: String },

    /// The function, method or type named by a spec does not exist.
    #[error("{what} not found: {name}")]
    SymbolNotFound { what: String, name: String },

    /// More than one declaration matches a spec.
    #[error("ambiguous function spec {spec}: {} declarations match", candidates.len())]
    AmbiguousSymbol {
        spec: String,
        candidates: Vec<Location>,
    },

    /// Loading or type-checking the program failed.
    #[error("load failed: {message}")]
    LoadFailed {
        message: String,
        location: Option<Location>,
    },

    /// Failed to apply changes.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (invariant violation or unexpected state).
    #[error("internal error: {message}")]
    InternalError {
        message: String,
        location: Option<Location>,
    },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&CtxizeError> for OutputErrorCode {
    fn from(err: &CtxizeError) -> Self {
        match err {
            CtxizeError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            CtxizeError::PackageNotFound { .. } => OutputErrorCode::ResolutionError,
            CtxizeError::SymbolNotFound { .. } => OutputErrorCode::ResolutionError,
            CtxizeError::AmbiguousSymbol { .. } => OutputErrorCode::ResolutionError,
            CtxizeError::LoadFailed { .. } => OutputErrorCode::LoadFailed,
            CtxizeError::ApplyError { .. } => OutputErrorCode::ApplyError,
            CtxizeError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<CtxizeError> for OutputErrorCode {
    fn from(err: CtxizeError) -> Self {
        OutputErrorCode::from(&err)
    }
}

impl From<std::io::Error> for CtxizeError {
    fn from(err: std::io::Error) -> Self {
        CtxizeError::ApplyError {
            message: format!("IO error: {}", err),
            file: None,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl CtxizeError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        CtxizeError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an invalid arguments error with JSON details.
    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        CtxizeError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a symbol not found error.
    pub fn symbol_not_found(what: impl Into<String>, name: impl Into<String>) -> Self {
        CtxizeError::SymbolNotFound {
            what: what.into(),
            name: name.into(),
        }
    }

    /// Create an apply error for a specific file.
    pub fn apply(message: impl Into<String>, file: Option<String>) -> Self {
        CtxizeError::ApplyError {
            message: message.into(),
            file,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CtxizeError::InternalError {
            message: message.into(),
            location: None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn invalid_arguments_maps_to_invalid_arguments() {
            let err = CtxizeError::invalid_args("malformed var spec");
            assert_eq!(
                OutputErrorCode::from(&err),
                OutputErrorCode::InvalidArguments
            );
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn symbol_not_found_maps_to_resolution_error() {
            let err = CtxizeError::symbol_not_found("function", "foo.F");
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn ambiguous_symbol_maps_to_resolution_error() {
            let err = CtxizeError::AmbiguousSymbol {
                spec: "foo.F".to_string(),
                candidates: vec![],
            };
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        }

        #[test]
        fn package_not_found_maps_to_resolution_error() {
            let err = CtxizeError::PackageNotFound {
                path: "example.com/missing".to_string(),
            };
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        }

        #[test]
        fn load_failed_maps_to_load_failed() {
            let err = CtxizeError::LoadFailed {
                message: "undefined: x".to_string(),
                location: None,
            };
            assert_eq!(err.error_code().code(), 5);
        }

        #[test]
        fn apply_error_maps_to_apply_error() {
            let err = CtxizeError::apply("file changed on disk", Some("a.go".to_string()));
            assert_eq!(OutputErrorCode::from(&err), OutputErrorCode::ApplyError);
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn io_error_maps_to_apply_error() {
            let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
            let err = CtxizeError::from(io);
            assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
        }

        #[test]
        fn internal_error_maps_to_internal_error() {
            let err = CtxizeError::internal("use of F outside a call");
            assert_eq!(OutputErrorCode::from(&err), OutputErrorCode::InternalError);
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn symbol_not_found_display() {
            let err = CtxizeError::symbol_not_found("type", "context.Ctx");
            assert_eq!(err.to_string(), "type not found: context.Ctx");
        }

        #[test]
        fn ambiguous_display_counts_candidates() {
            let err = CtxizeError::AmbiguousSymbol {
                spec: "foo.T.M".to_string(),
                candidates: vec![Location::new("a.go", 1, 1), Location::new("b.go", 2, 1)],
            };
            assert_eq!(
                err.to_string(),
                "ambiguous function spec foo.T.M: 2 declarations match"
            );
        }

        #[test]
        fn invalid_arguments_display() {
            let err = CtxizeError::invalid_args("missing function spec");
            assert_eq!(err.to_string(), "invalid arguments: missing function spec");
        }
    }

    #[test]
    fn code_values_are_stable() {
        assert_eq!(OutputErrorCode::InvalidArguments.code(), 2);
        assert_eq!(OutputErrorCode::ResolutionError.code(), 3);
        assert_eq!(OutputErrorCode::ApplyError.code(), 4);
        assert_eq!(OutputErrorCode::LoadFailed.code(), 5);
        assert_eq!(OutputErrorCode::InternalError.code(), 10);
        assert_eq!(format!("{}", OutputErrorCode::InternalError), "10");
    }
}
