//! SVG document assembly.
//!
//! A [`VisualTree`] serializes to a standalone SVG document: one `<rect>`
//! for the canvas, then one group of elements per paint box in document
//! order. Images arrive here already decoded and normalized to PNG and are
//! inlined as base64 data URIs, so the document is self-contained.
//!
//! Text is laid out line by line. Fonts were scaled during layout; this
//! stage only converts points to pixels, stacks lines at a fixed spacing,
//! and anchors the resulting block inside its frame.

use std::collections::HashMap;

use aho_corasick::AhoCorasick;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use once_cell::sync::Lazy;

use crate::common::unit::{BASE_DPI, pt_to_px};
use crate::presentation::{Frame, Paragraph, Run, TextAlign, VerticalAnchor};

use super::layout::{DEFAULT_FONT_PT, PaintBox, PaintContent, VisualTree};

/// Line height as a multiple of the font size.
const LINE_SPACING: f32 = 1.2;

/// Fraction of the line box above the baseline.
const ASCENT_RATIO: f32 = 0.8;

/// Horizontal offset per indent level at scale 1.0.
const INDENT_STEP_PX: f32 = 36.0;

static MARKUP_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">", "\"", "'"]).expect("Failed to build markup escaper")
});

/// Escape text and attribute values for embedding in markup.
fn escape(text: &str) -> String {
    MARKUP_ESCAPER.replace_all(text, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Shortest round-trip decimal form of a coordinate.
fn fx(value: f32) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_string()
}

/// Serialize a visual tree into a standalone SVG document.
///
/// `images` maps media ids to decoded PNG bytes. A box whose image is not
/// in the map paints nothing, which is how decode failures degrade.
pub fn svg_document(tree: &VisualTree, images: &HashMap<String, Vec<u8>>) -> String {
    let (width, height) = (fx(tree.width), fx(tree.height));
    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));
    out.push('\n');

    // The canvas itself: white unless the slide or an override says otherwise
    let canvas = tree.background.as_deref().unwrap_or("#FFFFFF");
    out.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        escape(canvas)
    ));
    out.push('\n');

    for paint in &tree.boxes {
        push_box(&mut out, paint, tree, images);
    }

    out.push_str("</svg>\n");
    out
}

fn push_box(
    out: &mut String,
    paint: &PaintBox,
    tree: &VisualTree,
    images: &HashMap<String, Vec<u8>>,
) {
    if let Some(fill) = &paint.fill {
        out.push_str(&rect_element(paint.frame, fill));
        out.push('\n');
    }
    match &paint.content {
        PaintContent::Text { paragraphs, anchor } => {
            push_text_block(out, paint.frame, paragraphs, *anchor, tree);
        },
        PaintContent::Image { media_id } => {
            if let Some(png) = images.get(media_id) {
                out.push_str(&image_element(paint.frame, png));
                out.push('\n');
            }
        },
        PaintContent::Empty => {},
    }
}

fn rect_element(frame: Frame, fill: &str) -> String {
    format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        fx(frame.x),
        fx(frame.y),
        fx(frame.width),
        fx(frame.height),
        escape(fill)
    )
}

fn image_element(frame: Frame, png: &[u8]) -> String {
    format!(
        r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" href="data:image/png;base64,{}"/>"#,
        fx(frame.x),
        fx(frame.y),
        fx(frame.width),
        fx(frame.height),
        BASE64_ENGINE.encode(png)
    )
}

/// One visual line of a paragraph with its measured font size in pixels.
struct Line {
    runs: Vec<Run>,
    font_px: f32,
}

fn push_text_block(
    out: &mut String,
    frame: Frame,
    paragraphs: &[Paragraph],
    anchor: VerticalAnchor,
    tree: &VisualTree,
) {
    let default_px = pt_to_px(DEFAULT_FONT_PT * tree.scale, BASE_DPI);

    // Measure the whole block first so it can be anchored vertically.
    let mut measured: Vec<Vec<Line>> = Vec::with_capacity(paragraphs.len());
    let mut block_height = 0.0;
    for para in paragraphs {
        let lines: Vec<Line> = split_lines(&para.runs)
            .into_iter()
            .map(|runs| {
                let font_px = runs
                    .iter()
                    .filter_map(|run| run.size.map(|pt| pt_to_px(pt, BASE_DPI)))
                    .fold(0.0_f32, f32::max);
                Line {
                    runs,
                    font_px: if font_px > 0.0 { font_px } else { default_px },
                }
            })
            .collect();
        block_height += spacing_px(para.space_before) + spacing_px(para.space_after);
        block_height += lines.iter().map(|l| l.font_px * LINE_SPACING).sum::<f32>();
        measured.push(lines);
    }

    let mut cursor = match anchor {
        VerticalAnchor::Top => frame.y,
        VerticalAnchor::Middle => frame.y + (frame.height - block_height) / 2.0,
        VerticalAnchor::Bottom => frame.y + frame.height - block_height,
    };

    for (para, lines) in paragraphs.iter().zip(measured) {
        cursor += spacing_px(para.space_before);
        let indent = para.indent as f32 * INDENT_STEP_PX * tree.scale;
        let (x, text_anchor) = match para.align {
            Some(TextAlign::Center) => (frame.x + frame.width / 2.0, "middle"),
            Some(TextAlign::Right) => (frame.x + frame.width, "end"),
            _ => (frame.x + indent, "start"),
        };

        for (line_index, line) in lines.iter().enumerate() {
            let baseline = cursor + line.font_px * ASCENT_RATIO;
            let leads_with_bullet = line_index == 0 && para.bullet_glyph().is_some();
            if !line.runs.is_empty() || leads_with_bullet {
                out.push_str(&format!(
                    r#"<text x="{}" y="{}" text-anchor="{}" xml:space="preserve">"#,
                    fx(x),
                    fx(baseline),
                    text_anchor
                ));
                if line_index == 0
                    && let Some(glyph) = para.bullet_glyph()
                {
                    out.push_str(&run_tspan(&bullet_run(para, glyph), tree, default_px));
                }
                for run in &line.runs {
                    out.push_str(&run_tspan(run, tree, default_px));
                }
                out.push_str("</text>\n");
            }
            cursor += line.font_px * LINE_SPACING;
        }
        cursor += spacing_px(para.space_after);
    }
}

/// The bullet inherits the styling of the paragraph's leading run, so an
/// override applied to the runs colors the bullet too.
fn bullet_run(para: &Paragraph, glyph: &str) -> Run {
    let lead = para.runs.first();
    Run {
        text: format!("{glyph} "),
        size: lead.and_then(|run| run.size),
        color: lead.and_then(|run| run.color.clone()),
        font: lead.and_then(|run| run.font.clone()),
        ..Default::default()
    }
}

fn run_tspan(run: &Run, tree: &VisualTree, default_px: f32) -> String {
    let size_px = run
        .size
        .map(|pt| pt_to_px(pt, BASE_DPI))
        .unwrap_or(default_px);
    let family = match run.font.as_deref().or(tree.base_font.as_deref()) {
        Some(name) => format!("{name}, sans-serif"),
        None => "sans-serif".to_string(),
    };

    let mut attrs = format!(
        r#" font-size="{}" font-family="{}" fill="{}""#,
        fx(size_px),
        escape(&family),
        escape(run.color.as_deref().unwrap_or("#000000"))
    );
    if run.bold == Some(true) {
        attrs.push_str(r#" font-weight="bold""#);
    }
    if run.italic == Some(true) {
        attrs.push_str(r#" font-style="italic""#);
    }
    if run.underline == Some(true) {
        attrs.push_str(r#" text-decoration="underline""#);
    }

    format!("<tspan{}>{}</tspan>", attrs, escape(&run.text))
}

#[inline]
fn spacing_px(spacing_pt: Option<f32>) -> f32 {
    spacing_pt.map_or(0.0, |pt| pt_to_px(pt, BASE_DPI))
}

/// Split a paragraph's runs into visual lines at explicit breaks.
///
/// Breaks arrive as standalone `"\n"` runs, but a newline embedded in
/// ordinary run text splits the same way.
fn split_lines(runs: &[Run]) -> Vec<Vec<Run>> {
    let mut lines: Vec<Vec<Run>> = Vec::new();
    let mut current: Vec<Run> = Vec::new();
    for run in runs {
        for (i, segment) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(std::mem::take(&mut current));
            }
            if !segment.is_empty() {
                current.push(Run {
                    text: segment.to_string(),
                    ..run.clone()
                });
            }
        }
    }
    lines.push(current);
    lines
}
