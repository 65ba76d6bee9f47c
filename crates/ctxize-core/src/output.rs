//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input, same output (field order, array ordering)
//! 3. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{CtxizeError, OutputErrorCode};
use crate::hash::ContentHash;

pub use crate::types::Location;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Rewrite Response
// ============================================================================

/// One file touched by a rewrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileChange {
    /// Path relative to the working directory when possible.
    pub path: String,
    /// Hash of the contents as loaded.
    pub before_hash: ContentHash,
    /// Hash of the rewritten contents.
    pub after_hash: ContentHash,
    /// Unified diff, present in dry-run mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Response for a successful rewrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// The function spec that was rewritten, as given.
    pub function: String,
    /// The variable spec that was threaded through.
    pub variable: String,
    /// Whether files were written (false in dry-run mode).
    pub applied: bool,
    /// Modified files in load order.
    pub files: Vec<FileChange>,
}

impl RewriteResponse {
    /// Create a success response.
    pub fn new(
        function: impl Into<String>,
        variable: impl Into<String>,
        applied: bool,
        files: Vec<FileChange>,
    ) -> Self {
        RewriteResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            function: function.into(),
            variable: variable.into(),
            applied,
            files,
        }
    }
}

// ============================================================================
// Error Response
// ============================================================================

/// Error information in a JSON error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Where the error occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ErrorInfo {
    /// Create from a CtxizeError.
    pub fn from_error(err: &CtxizeError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let (details, location) = match err {
            CtxizeError::InvalidArguments { details, .. } => (details.clone(), None),
            CtxizeError::PackageNotFound { path } => {
                (Some(serde_json::json!({ "path": path })), None)
            }
            CtxizeError::AmbiguousSymbol { candidates, .. } => (
                Some(serde_json::json!({ "candidates": candidates })),
                None,
            ),
            CtxizeError::LoadFailed { location, .. } => (None, location.clone()),
            CtxizeError::ApplyError { file, .. } => {
                let details = file.as_ref().map(|f| serde_json::json!({ "file": f }));
                (details, None)
            }
            CtxizeError::InternalError { location, .. } => (None, location.clone()),
            CtxizeError::SymbolNotFound { .. } => (None, None),
        };

        ErrorInfo {
            code,
            message,
            details,
            location,
        }
    }
}

/// Error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a CtxizeError.
    pub fn from_error(err: &CtxizeError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_response_status_first() {
        let response = RewriteResponse::new(
            "foo.F",
            "ctx context.Context = context.TODO()",
            false,
            vec![FileChange {
                path: "foo/foo.go".to_string(),
                before_hash: ContentHash::compute(b"a"),
                after_hash: ContentHash::compute(b"b"),
                diff: None,
            }],
        );
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.starts_with("{\"status\":\"ok\""));
        assert!(json.contains("\"path\":\"foo/foo.go\""));
        assert!(!json.contains("\"diff\""));
    }

    #[test]
    fn error_response_carries_code_and_location() {
        let err = CtxizeError::LoadFailed {
            message: "undefined: x".to_string(),
            location: Some(Location::new("bar/bar.go", 4, 2)),
        };
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.status, "error");
        assert_eq!(response.error.code, 5);
        assert_eq!(response.error.location, Some(Location::new("bar/bar.go", 4, 2)));
    }

    #[test]
    fn ambiguous_error_lists_candidates() {
        let err = CtxizeError::AmbiguousSymbol {
            spec: "foo.F".to_string(),
            candidates: vec![Location::new("a.go", 3, 6)],
        };
        let info = ErrorInfo::from_error(&err);
        let details = info.details.unwrap();
        assert_eq!(details["candidates"][0]["file"], "a.go");
        assert_eq!(details["candidates"][0]["line"], 3);
    }

    #[test]
    fn emit_response_writes_trailing_newline() {
        let err = CtxizeError::invalid_args("bad");
        let mut buf = Vec::new();
        emit_response(&ErrorResponse::from_error(&err), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"code\": 2"));
    }
}
