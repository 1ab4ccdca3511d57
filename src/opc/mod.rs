/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the package-level plumbing for Office Open XML
/// presentations:
///
/// - Package structure (parts, relationships)
/// - Content type management
/// - ZIP-based physical packaging
///
/// # Performance Features
///
/// - Uses `atoi_simd` for fast integer parsing
/// - Uses `quick-xml` for efficient streaming XML parsing
/// - Inflates the archive once, then serves all lookups from hash maps

pub mod constants;
pub mod container;
pub mod content_types;
pub mod error;
pub mod packuri;
pub mod rel;

// Re-export commonly used types
pub use container::Container;
pub use content_types::ContentTypes;
pub use error::OpcError;
pub use packuri::PackURI;
pub use rel::{Relationship, Relationships};
