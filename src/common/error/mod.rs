//! Unified error types for the longan library.
//!
//! Only container-level corruption aborts a parse; every other failure mode
//! degrades at part, slide, or shape granularity and is reported through the
//! diagnostics channel instead of an `Err` return.

use thiserror::Error;

/// Result type alias using the unified error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for parsing and rendering presentation packages.
#[derive(Error, Debug)]
pub enum Error {
    /// OPC container error (corrupt archive, missing part, malformed XML)
    #[error("package error: {0}")]
    Opc(#[from] crate::opc::OpcError),

    /// The archive opened, but no presentation part could be located
    #[error("not a presentation package: {0}")]
    NotAPresentation(String),

    /// Rasterization error
    #[cfg(feature = "render")]
    #[error("render error: {0}")]
    Render(#[from] crate::render::RenderError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
