//! Slide flattening: model shapes to scaled, absolutely-positioned paint
//! boxes.
//!
//! Layout is pure and synchronous. It applies the output scale, resolves
//! render-time overrides, and drops shapes that cannot paint anything, so
//! the later stages only ever see boxes worth drawing.

use crate::pptx::media::MediaAsset;
use crate::presentation::{
    Frame, Paragraph, Run, Shape, ShapeContent, Slide, SlideSize, VerticalAnchor,
};

use super::RenderOptions;

/// Font size, in points, for runs that never resolved one.
pub const DEFAULT_FONT_PT: f32 = 18.0;

/// One slide flattened to paint boxes, scaled to the output size.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTree {
    /// 0-based slide index, carried into log records
    pub index: usize,

    /// Output canvas width in pixels
    pub width: f32,

    /// Output canvas height in pixels
    pub height: f32,

    /// The uniform factor applied to every coordinate and font size
    pub scale: f32,

    /// Canvas fill ("#RRGGBB"); white when `None`
    pub background: Option<String>,

    /// Base font family for runs that do not name one
    pub base_font: Option<String>,

    /// Paint boxes in document order, backmost first
    pub boxes: Vec<PaintBox>,
}

impl VisualTree {
    /// Ids of the media assets this tree draws, in paint order.
    pub fn media_ids(&self) -> Vec<&str> {
        self.boxes
            .iter()
            .filter_map(|b| match &b.content {
                PaintContent::Image { media_id } => Some(media_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A positioned paint operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintBox {
    /// Box bounds in output pixels
    pub frame: Frame,

    /// Fill painted behind the content ("#RRGGBB")
    pub fill: Option<String>,

    pub content: PaintContent,
}

/// What a box paints inside its frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintContent {
    /// Styled paragraphs; every run carries a concrete, scaled font size
    Text {
        paragraphs: Vec<Paragraph>,
        anchor: VerticalAnchor,
    },

    /// An embedded image, scaled to fit the frame with aspect preserved
    Image { media_id: String },

    /// Nothing beyond the fill
    Empty,
}

/// Flatten `slide` into scaled paint boxes.
///
/// The scale factor is `options.width / canvas_width_px`, applied
/// uniformly to geometry and font sizes, so requesting twice the width
/// doubles the whole drawing. Shapes that paint nothing are dropped. A
/// slide left with no box at all synthesizes a plain paragraph stack from
/// its flattened text, so a damaged deck still produces legible output.
pub fn layout(
    slide: &Slide,
    canvas: SlideSize,
    media: &[MediaAsset],
    options: &RenderOptions,
) -> VisualTree {
    let scale = options.width as f32 / canvas.width_px().max(1.0);
    let width = options.width as f32;
    let height = options
        .height
        .map(|h| h as f32)
        .unwrap_or_else(|| canvas.height_px() * scale);

    let mut boxes: Vec<PaintBox> = slide
        .shapes
        .iter()
        .filter(|shape| shape.is_renderable())
        .filter_map(|shape| paint_box(shape, media, scale, options))
        .collect();

    if boxes.is_empty()
        && let Some(stack) = fallback_stack(slide, width, height, scale, options)
    {
        boxes.push(stack);
    }

    VisualTree {
        index: slide.index,
        width,
        height,
        scale,
        background: options.background.clone().or_else(|| slide.background.clone()),
        base_font: options.font_family.clone(),
        boxes,
    }
}

fn paint_box(
    shape: &Shape,
    media: &[MediaAsset],
    scale: f32,
    options: &RenderOptions,
) -> Option<PaintBox> {
    let content = match &shape.content {
        ShapeContent::Text(body) if !body.plain_text().trim().is_empty() => PaintContent::Text {
            paragraphs: body
                .paragraphs
                .iter()
                .map(|para| styled_paragraph(para, scale, options))
                .collect(),
            anchor: body.anchor,
        },
        ShapeContent::Text(_) => PaintContent::Empty,
        // A dangling or absent asset paints as an empty box, never an error.
        ShapeContent::Image { media_id } => match media_id {
            Some(id) if media.iter().any(|asset| asset.id == *id) => PaintContent::Image {
                media_id: id.clone(),
            },
            _ => PaintContent::Empty,
        },
        ShapeContent::Generic => PaintContent::Empty,
    };

    if matches!(content, PaintContent::Empty) && shape.fill.is_none() {
        return None;
    }

    Some(PaintBox {
        frame: scale_frame(shape.frame, scale),
        fill: shape.fill.clone(),
        content,
    })
}

/// Scale a paragraph's metrics and apply render-time overrides.
///
/// Every run leaves with a concrete font size so downstream stages never
/// need the scale factor to measure text.
fn styled_paragraph(para: &Paragraph, scale: f32, options: &RenderOptions) -> Paragraph {
    let mut out = para.clone();
    out.space_before = para.space_before.map(|pt| pt * scale);
    out.space_after = para.space_after.map(|pt| pt * scale);
    for run in &mut out.runs {
        run.size = Some(run.size.unwrap_or(DEFAULT_FONT_PT) * scale);
        if let Some(color) = &options.font_color {
            run.color = Some(color.clone());
        }
    }
    out
}

#[inline]
fn scale_frame(frame: Frame, scale: f32) -> Frame {
    Frame {
        x: frame.x * scale,
        y: frame.y * scale,
        width: frame.width * scale,
        height: frame.height * scale,
    }
}

/// Last-resort content for a slide whose shapes all dropped out: a plain
/// top-anchored stack of its flattened text lines.
fn fallback_stack(
    slide: &Slide,
    width: f32,
    height: f32,
    scale: f32,
    options: &RenderOptions,
) -> Option<PaintBox> {
    if slide.text.trim().is_empty() {
        return None;
    }

    let paragraphs: Vec<Paragraph> = slide
        .text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Paragraph {
            runs: vec![Run {
                text: line.to_string(),
                size: Some(DEFAULT_FONT_PT * scale),
                color: options.font_color.clone(),
                ..Default::default()
            }],
            ..Default::default()
        })
        .collect();

    let margin = width * 0.05;
    Some(PaintBox {
        frame: Frame {
            x: margin,
            y: margin,
            width: width - margin * 2.0,
            height: height - margin * 2.0,
        },
        fill: None,
        content: PaintContent::Text {
            paragraphs,
            anchor: VerticalAnchor::Top,
        },
    })
}
