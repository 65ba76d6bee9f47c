//! Core infrastructure for ctxize.
//!
//! This crate provides the language-agnostic pieces shared by the Go front end
//! and the CLI:
//! - Error types and error codes
//! - JSON output types for CLI responses
//! - Content hashing for on-disk snapshots
//! - Text utilities and diff generation

pub mod diff;
pub mod error;
pub mod hash;
pub mod output;
pub mod text;
pub mod types;
