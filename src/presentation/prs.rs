//! Top-level presentation model.

use std::path::Path;

use serde::Serialize;

use crate::common::diag::{Diagnostic, Severity};
use crate::common::Result;
use crate::pptx::media::MediaAsset;
use crate::pptx::metadata::Metadata;
use super::slide::{Slide, SlideText};
use super::types::SlideSize;

/// A parsed presentation.
///
/// This is the top-level result of parsing. It is immutable once built;
/// re-rendering with different options operates on copies of the slide
/// data, never on the model itself.
///
/// # Examples
///
/// ```rust,no_run
/// use longan::Presentation;
///
/// let pres = Presentation::open("quarterly.pptx")?;
/// println!("{} slides", pres.slide_count);
///
/// // All text with one header per slide
/// println!("{}", pres.flatten("\n\n"));
/// # Ok::<(), longan::common::Error>(())
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    /// Source filename, as supplied by the caller
    pub filename: String,

    /// Number of slides the presentation declares. Always equal to
    /// `slides.len()`, including slides that failed to extract.
    pub slide_count: usize,

    /// Slide canvas dimensions
    pub slide_size: SlideSize,

    /// Slides in deck order; `slides[i].index == i`
    pub slides: Vec<Slide>,

    /// Shared media table; image shapes reference entries by id
    pub media: Vec<MediaAsset>,

    /// Core document properties
    pub metadata: Metadata,

    /// The theme's body typeface (minor latin), when the deck declares
    /// one. Rendering uses it as the base font family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_font: Option<String>,

    /// Recoverable problems encountered while parsing
    pub diagnostics: Vec<Diagnostic>,
}

impl Presentation {
    /// Parse a presentation from a file path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use longan::Presentation;
    ///
    /// let pres = Presentation::open("slides.pptx")?;
    /// for slide in &pres.slides {
    ///     println!("slide {}: {:?}", slide.index + 1, slide.title);
    /// }
    /// # Ok::<(), longan::common::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::pptx::package::open(path)
    }

    /// Parse a presentation from an in-memory byte buffer.
    ///
    /// `filename` is carried through to the model for callers that track
    /// provenance; it is not used to locate anything.
    pub fn from_bytes(bytes: Vec<u8>, filename: &str) -> Result<Self> {
        crate::pptx::package::from_bytes(bytes, filename)
    }

    /// Get a slide by its 0-based index.
    #[inline]
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Flatten the whole deck to text, one header per slide.
    ///
    /// Each slide contributes `--- Slide N: <title> ---` (or `--- Slide N
    /// ---` when it has no title) followed by its text; slides are joined
    /// by `separator`.
    pub fn flatten(&self, separator: &str) -> String {
        let mut sections = Vec::with_capacity(self.slides.len());
        for slide in &self.slides {
            let header = match &slide.title {
                Some(title) => format!("--- Slide {}: {} ---", slide.index + 1, title),
                None => format!("--- Slide {} ---", slide.index + 1),
            };
            if slide.text.is_empty() {
                sections.push(header);
            } else {
                sections.push(format!("{}\n{}", header, slide.text));
            }
        }
        sections.join(separator)
    }

    /// Per-slide text records for consumers that page through the deck.
    pub fn per_slide(&self) -> Vec<SlideText> {
        self.slides
            .iter()
            .map(|slide| SlideText {
                index: slide.index,
                title: slide.title.clone(),
                text: slide.text.clone(),
            })
            .collect()
    }

    /// Look up a media asset by id.
    pub fn media_asset(&self, id: &str) -> Option<&MediaAsset> {
        self.media.iter().find(|asset| asset.id == id)
    }

    /// Number of warning-level diagnostics recorded during parsing.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}
