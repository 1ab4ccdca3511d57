//! Longan - A Rust library for parsing and rendering presentation archives
//!
//! This library parses zip-packaged presentation files (.pptx), resolves the
//! slide/layout/master inheritance chain behind every shape, and rasterizes
//! slides into RGBA pixel buffers.
//!
//! # Features
//!
//! - **Package navigation**: Parts located through the relationship graph
//!   and content types, never by guessed paths
//! - **Style inheritance**: Geometry, font sizes, and colors resolved
//!   through slide, layout, master, and theme layers
//! - **Text extraction**: Flattened deck text with slide headers, or
//!   structured per-slide records
//! - **Damage tolerance**: A corrupt slide degrades to a placeholder and a
//!   diagnostic; only an unreadable archive is a hard error
//! - **Slide rendering**: Slides composited over SVG and painted to pixels
//!   (`render` feature, on by default)
//!
//! # Example - Extracting text
//!
//! ```no_run
//! use longan::Presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pres = Presentation::open("quarterly.pptx")?;
//!
//! // Extract all text
//! println!("{}", pres.flatten("\n\n"));
//!
//! // Or work with one record per slide
//! for entry in pres.per_slide() {
//!     println!("slide {}: {:?}", entry.index + 1, entry.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Walking the slide model
//!
//! ```no_run
//! use longan::Presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pres = Presentation::open("quarterly.pptx")?;
//!
//! for slide in &pres.slides {
//!     println!("slide {} ({:?})", slide.index + 1, slide.title);
//!     for shape in slide.renderable_shapes() {
//!         println!("  {:?} at {:?}", shape.placeholder, shape.frame);
//!     }
//! }
//!
//! // Anything that went wrong during parsing, without failing the parse
//! for diag in &pres.diagnostics {
//!     eprintln!("warning: {diag}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Rendering slides
//!
//! ```no_run
//! use longan::render::{RenderOptions, rasterize_all};
//! use longan::Presentation;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pres = Presentation::open("quarterly.pptx")?;
//!
//! let options = RenderOptions {
//!     width: 1920,
//!     ..RenderOptions::default()
//! };
//! for (i, image) in rasterize_all(&pres, &options, None).await?.iter().enumerate() {
//!     std::fs::write(format!("slide{}.png", i + 1), image.encode_png()?)?;
//! }
//! # Ok(())
//! # }
//! ```

/// Shared infrastructure: error types, diagnostics, unit conversion
pub mod common;

/// Open Packaging Conventions container access
///
/// Zip archive reading, part naming, content types, and the relationship
/// graph that links parts together.
pub mod opc;

/// Presentation part parsing
///
/// Walks the package parts (presentation, slides, layouts, masters,
/// themes, media) and assembles the slide model.
pub mod pptx;

/// The parsed presentation model
pub mod presentation;

/// Slide compositing and rasterization
#[cfg(feature = "render")]
pub mod render;

// Re-export commonly used types for convenience
pub use common::error::{Error, Result};
pub use presentation::{Presentation, Slide, SlideText};

#[cfg(feature = "render")]
pub use render::{RasterImage, RenderOptions};
