//! Error bridge implementations for Go front-end errors.
//!
//! This module provides `impl From<X> for CtxizeError` conversions from the
//! spec parser, the loader and the rewrite operation to the unified
//! `CtxizeError` type.
//!
//! These bridges live here rather than in `ctxize-core` because they depend
//! on `ctxize-go` types that core does not know about.

use ctxize_core::error::{CtxizeError, Location};
use crate::loader::LoadError;
use crate::ops::RewriteError;
use crate::spec::SpecError;

// ============================================================================
// Bridge: SpecError -> CtxizeError
// ============================================================================

impl From<SpecError> for CtxizeError {
    fn from(err: SpecError) -> Self {
        let input = match &err {
            SpecError::InvalidVarSpec { input } | SpecError::InvalidFuncSpec { input } => {
                input.clone()
            }
        };
        CtxizeError::invalid_args_with_details(err.to_string(), serde_json::json!({ "input": input }))
    }
}

// ============================================================================
// Bridge: LoadError -> CtxizeError
// ============================================================================

impl From<LoadError> for CtxizeError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::PackageNotFound { path } => CtxizeError::PackageNotFound { path },
            LoadError::TypeCheck { position, message } => CtxizeError::LoadFailed {
                message: format!("{}: {}", position, message),
                location: Location::parse(&position),
            },
            other => CtxizeError::LoadFailed {
                message: other.to_string(),
                location: None,
            },
        }
    }
}

// ============================================================================
// Bridge: RewriteError -> CtxizeError
// ============================================================================

impl From<RewriteError> for CtxizeError {
    fn from(err: RewriteError) -> Self {
        match err {
            RewriteError::Spec(e) => CtxizeError::from(e),
            RewriteError::Load(e) => CtxizeError::from(e),
            RewriteError::PackageNotFound { path } => CtxizeError::PackageNotFound { path },
            RewriteError::TypeNotFound { path, name } => {
                CtxizeError::symbol_not_found("type", format!("{}.{}", path, name))
            }
            RewriteError::FunctionNotFound { spec } => {
                CtxizeError::symbol_not_found("function", spec)
            }
            RewriteError::AmbiguousFunction { spec, positions } => {
                let mut candidates: Vec<Location> =
                    positions.iter().filter_map(|p| Location::parse(p)).collect();
                candidates.sort();
                CtxizeError::AmbiguousSymbol { spec, candidates }
            }
            RewriteError::InitExpr { .. } => CtxizeError::invalid_args(err.to_string()),
            RewriteError::Emit { ref path, .. } => {
                let file = Some(path.clone());
                CtxizeError::apply(err.to_string(), file)
            }
            RewriteError::Invariant(_) | RewriteError::Format { .. } | RewriteError::NotLoaded => {
                CtxizeError::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxize_core::error::OutputErrorCode;
    use std::io;

    #[test]
    fn spec_errors_are_invalid_arguments() {
        let err = CtxizeError::from(SpecError::InvalidFuncSpec {
            input: "F".to_string(),
        });
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
        match err {
            CtxizeError::InvalidArguments { details, .. } => {
                assert_eq!(details, Some(serde_json::json!({ "input": "F" })));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn type_errors_carry_their_location() {
        let err = CtxizeError::from(LoadError::TypeCheck {
            position: "p/p.go:4:2".to_string(),
            message: "undefined: missing".to_string(),
        });
        assert_eq!(err.error_code(), OutputErrorCode::LoadFailed);
        match err {
            CtxizeError::LoadFailed { location, message } => {
                assert_eq!(location, Some(Location::new("p/p.go", 4, 2)));
                assert_eq!(message, "p/p.go:4:2: undefined: missing");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn resolution_errors() {
        let err = CtxizeError::from(RewriteError::FunctionNotFound {
            spec: "foo.G".to_string(),
        });
        assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
        assert_eq!(err.to_string(), "function not found: foo.G");

        let err = CtxizeError::from(RewriteError::AmbiguousFunction {
            spec: "foo.F".to_string(),
            positions: vec!["a.go:3:6".to_string(), "b.go:3:6".to_string()],
        });
        match err {
            CtxizeError::AmbiguousSymbol { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(candidates[1].file, "b.go");
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = CtxizeError::from(RewriteError::Load(LoadError::PackageNotFound {
            path: "nowhere".to_string(),
        }));
        assert_eq!(err.error_code().code(), 3);
    }

    #[test]
    fn emit_and_invariant_errors() {
        let err = CtxizeError::from(RewriteError::Emit {
            path: "a.go".to_string(),
            source: io::Error::other("read-only file system"),
        });
        assert_eq!(err.error_code(), OutputErrorCode::ApplyError);

        let err = CtxizeError::from(RewriteError::Invariant("F is used as a value".to_string()));
        assert_eq!(err.error_code().code(), 10);
    }
}
