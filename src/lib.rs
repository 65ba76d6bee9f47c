//! ctxize: thread a context parameter through a Go function and its callers.
//!
//! The rewrite itself lives in `ctxize-go`, along with the conversions from
//! its errors to the unified `CtxizeError`; this crate adds the command-line
//! front door.

// Core infrastructure - re-exported from ctxize-core
pub use ctxize_core::diff;
pub use ctxize_core::error;
pub use ctxize_core::hash;
pub use ctxize_core::output;
pub use ctxize_core::text;
pub use ctxize_core::types;

// Go front end
pub use ctxize_go as go;

// Front door
pub mod cli;
