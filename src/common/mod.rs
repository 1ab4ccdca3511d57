//! Common types and utilities shared across the crate.
//!
//! This module provides the unified error type, the diagnostics channel for
//! recoverable parse/render failures, and length-unit conversions for the
//! EMU-based geometry used by presentation packages.

// Submodule declarations
pub mod diag;
pub mod error;
pub mod unit;

// Re-exports for convenience
pub use diag::{DiagKind, DiagSink, Diagnostic, Severity};
pub use error::{Error, Result};
