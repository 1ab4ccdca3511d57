//! Presentation model.
//!
//! This module holds the structured result of parsing: the presentation
//! with its slides, shapes, rich text, media table, and accumulated
//! diagnostics. Everything here is plain owned data, serializable with
//! serde, and safe to share across threads once built.
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::Presentation;
//!
//! let pres = Presentation::open("presentation.pptx")?;
//!
//! // Extract all text
//! println!("{}", pres.flatten("\n\n"));
//!
//! // Walk the structure
//! for slide in &pres.slides {
//!     for shape in slide.renderable_shapes() {
//!         println!("{:?} at {:?}", shape.placeholder, shape.frame);
//!     }
//! }
//! # Ok::<(), longan::common::Error>(())
//! ```

// Submodule declarations
mod prs;
mod slide;
mod types;

// Re-exports
pub use prs::Presentation;
pub use slide::{Slide, SlideText};
pub use types::{
    BulletKind, Frame, Paragraph, PlaceholderKind, Run, Shape, ShapeContent, SlideSize, TextAlign,
    TextBody, VerticalAnchor, first_defined, DEFAULT_SLIDE_HEIGHT_EMU, DEFAULT_SLIDE_WIDTH_EMU,
};
