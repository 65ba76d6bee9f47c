//! Rewrite operations over a loaded program.

pub mod ctxize;

pub use ctxize::{App, RenderedFile, RewriteError};
