//! Slide compositing and rasterization.
//!
//! Rendering runs in three stages. [`layout`] flattens one slide into a
//! [`VisualTree`]: absolutely-positioned paint boxes in document order,
//! already scaled to the requested output size. The SVG builder serializes
//! a tree into a standalone document with images inlined as data URIs.
//! [`rasterize`] parses that document and paints it into an RGBA pixel
//! buffer.
//!
//! The pipeline is lossy by intent: wrapping, kerning, and hyphenation are
//! whatever the SVG text engine produces, and anything the model does not
//! capture is simply not drawn. Shape-level failures (an image that cannot
//! be decoded in time, an unknown font) degrade to empty boxes or
//! substituted typefaces; the errors below are reserved for failures that
//! make the requested output impossible.
//!
//! # Examples
//!
//! ```rust,no_run
//! use longan::render::{RenderOptions, rasterize_slide};
//! use longan::Presentation;
//!
//! # async fn demo() -> Result<(), longan::common::Error> {
//! let pres = Presentation::open("deck.pptx")?;
//! let image = rasterize_slide(&pres, 0, &RenderOptions::default()).await?;
//! std::fs::write("slide1.png", image.encode_png()?)?;
//! # Ok(())
//! # }
//! ```

mod layout;
mod raster;
mod svg;

pub use layout::{PaintBox, PaintContent, VisualTree, layout};
pub use raster::{RasterImage, rasterize, rasterize_all, rasterize_slide};
pub use svg::svg_document;

use thiserror::Error;

/// Errors that abort a rendering call.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The requested output geometry has no drawable area
    #[error("output size {width}x{height} has no drawable area")]
    EmptyTree { width: u32, height: u32 },

    /// A slide index beyond the end of the deck
    #[error("slide index {index} out of range for a deck of {count} slides")]
    SlideOutOfRange { index: usize, count: usize },

    /// The composited SVG document failed to parse
    #[error("SVG compositing failed: {0}")]
    Svg(String),

    /// The pixel surface could not be allocated
    #[error("cannot allocate a {width}x{height} pixel surface")]
    PixmapAlloc { width: u32, height: u32 },

    /// PNG serialization failed
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// A background render task was cancelled or panicked
    #[error("render task failed: {0}")]
    Join(String),
}

/// Options for one rasterization pass.
///
/// The scale factor applied to every coordinate and font size is
/// `width / canvas_width_px`, so doubling `width` doubles the whole
/// drawing. `density` supersamples on top of that without changing
/// layout, for crisper output on high-DPI displays.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels; follows the slide aspect ratio when unset
    pub height: Option<u32>,

    /// Supersampling multiplier applied to both axes at paint time
    pub density: f32,

    /// Paint this color ("#RRGGBB") instead of the slide's own background
    pub background: Option<String>,

    /// Use this color for every text run and bullet instead of the
    /// resolved run colors
    pub font_color: Option<String>,

    /// Base font family for runs that do not name one; the deck's body
    /// typeface when unset
    pub font_family: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 960,
            height: None,
            density: 1.0,
            background: None,
            font_color: None,
            font_family: None,
        }
    }
}

impl RenderOptions {
    /// Output options at a given width, height following the slide aspect.
    pub fn with_width(width: u32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }
}
