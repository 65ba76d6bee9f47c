//! Go support for ctxize.
//!
//! This crate loads Go packages and rewrites them. It includes:
//! - Function and variable specs (`pkg.Type.Method`, `ctx context.Context = ...`)
//! - Package loading from a module, GOPATH or in-memory overlay
//! - Type checking sufficient to resolve calls and interface satisfaction
//! - Import editing
//! - The ctxize rewrite itself

pub(crate) mod checker;
mod error_bridges;
pub mod imports;
pub mod loader;
pub mod ops;
pub mod program;
pub mod spec;
pub mod stdlib;
pub mod types;

pub use loader::{load, LoadConfig, LoadError};
pub use ops::{App, RenderedFile, RewriteError};
pub use program::{FileId, PackageKind, Program};
pub use spec::{FuncSpec, SpecError, VarSpec};
