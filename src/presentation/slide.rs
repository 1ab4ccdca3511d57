//! Slide model.

use serde::Serialize;

use super::types::{Shape, ShapeContent};

/// One slide of a presentation.
///
/// Shapes are held in document order (back to front). The flattened text
/// is computed once at extraction time so text-only consumers never walk
/// the shape tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Slide {
    /// 0-based position within the deck, stable across the document
    pub index: usize,

    /// First title-placeholder text, else the first text found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Resolved background color ("#RRGGBB"), from the slide, its layout,
    /// or its master
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    pub shapes: Vec<Shape>,

    /// All run text of all shapes, paragraphs joined by newlines
    pub text: String,

    /// Speaker notes, when a notes part is attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    /// Build the error stand-in used when a slide part is missing or its
    /// XML cannot be read. The deck keeps its length; only this entry is
    /// degraded.
    pub fn error_placeholder(index: usize) -> Self {
        Self {
            index,
            title: Some(format!("Slide {} (Error)", index + 1)),
            ..Default::default()
        }
    }

    /// Shapes that will actually paint something.
    pub fn renderable_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.is_renderable())
    }

    /// Iterate the media ids referenced by image shapes.
    pub fn media_ids(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match &s.content {
            ShapeContent::Image {
                media_id: Some(id),
            } => Some(id.as_str()),
            _ => None,
        })
    }
}

/// Per-slide text extraction record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideText {
    /// 0-based slide index
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::types::{Frame, TextBody};

    #[test]
    fn test_error_placeholder_titles_are_one_based() {
        let slide = Slide::error_placeholder(2);
        assert_eq!(slide.index, 2);
        assert_eq!(slide.title.as_deref(), Some("Slide 3 (Error)"));
        assert!(slide.shapes.is_empty());
        assert!(slide.text.is_empty());
    }

    #[test]
    fn test_media_ids_skip_dangling_references() {
        let slide = Slide {
            shapes: vec![
                Shape {
                    name: None,
                    frame: Frame::ZERO,
                    fill: None,
                    placeholder: None,
                    content: ShapeContent::Image {
                        media_id: Some("image1.png".to_string()),
                    },
                },
                Shape {
                    name: None,
                    frame: Frame::ZERO,
                    fill: None,
                    placeholder: None,
                    content: ShapeContent::Image { media_id: None },
                },
                Shape {
                    name: None,
                    frame: Frame::ZERO,
                    fill: None,
                    placeholder: None,
                    content: ShapeContent::Text(TextBody::default()),
                },
            ],
            ..Default::default()
        };

        let ids: Vec<&str> = slide.media_ids().collect();
        assert_eq!(ids, ["image1.png"]);
    }
}
