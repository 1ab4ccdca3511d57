//! Core model types shared by slides and shapes.

use serde::Serialize;

use crate::common::unit::emu_to_px_96;

/// Default slide dimensions (10 x 7.5 inches, the classic 4:3 canvas).
pub const DEFAULT_SLIDE_WIDTH_EMU: i64 = 9_144_000;
pub const DEFAULT_SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// Slide canvas dimensions, from `sldSz` in the presentation part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlideSize {
    /// Width in EMUs
    pub width_emu: i64,
    /// Height in EMUs
    pub height_emu: i64,
}

impl SlideSize {
    /// Canvas width in pixels at the base 96 DPI.
    #[inline]
    pub fn width_px(&self) -> f32 {
        emu_to_px_96(self.width_emu)
    }

    /// Canvas height in pixels at the base 96 DPI.
    #[inline]
    pub fn height_px(&self) -> f32 {
        emu_to_px_96(self.height_emu)
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self {
            width_emu: DEFAULT_SLIDE_WIDTH_EMU,
            height_emu: DEFAULT_SLIDE_HEIGHT_EMU,
        }
    }
}

/// Shape bounding box in pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// A frame with no extent carries no drawable area.
    #[inline]
    pub fn is_zero_sized(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical anchoring of text within its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Bullet treatment of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletKind {
    /// Explicitly no bullet
    None,
    /// Glyph bullet
    Bullet,
    /// Auto-numbered
    Number,
    /// Nothing declared either way
    #[default]
    Unspecified,
}

/// One styled run of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Run {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Font size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    /// Resolved color ("#RRGGBB")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// One paragraph of runs with block-level styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    /// Indent level, 0-8
    pub indent: u8,
    pub bullet: BulletKind,
    /// Glyph for `BulletKind::Bullet`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_char: Option<String>,
    /// Space before the paragraph, in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_before: Option<f32>,
    /// Space after the paragraph, in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_after: Option<f32>,
}

impl Paragraph {
    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether this paragraph should be rendered with a bullet glyph.
    ///
    /// Indented paragraphs default to bulleted unless the XML suppressed
    /// the bullet outright.
    pub fn is_bulleted(&self) -> bool {
        match self.bullet {
            BulletKind::Bullet | BulletKind::Number => true,
            BulletKind::None => false,
            BulletKind::Unspecified => self.indent > 0,
        }
    }

    /// The glyph to draw in front of a bulleted paragraph.
    pub fn bullet_glyph(&self) -> Option<&str> {
        if !self.is_bulleted() {
            return None;
        }
        Some(self.bullet_char.as_deref().unwrap_or("\u{2022}"))
    }
}

/// Role of a placeholder shape, from `ph type` on masters, layouts, and
/// slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceholderKind {
    Title,
    CenteredTitle,
    Subtitle,
    Body,
    Footer,
    Date,
    SlideNumber,
    Picture,
    Other,
}

impl PlaceholderKind {
    /// Map a `ph type` attribute value. A placeholder without a declared
    /// type is a body placeholder.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None => Self::Body,
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenteredTitle,
            Some("subTitle") => Self::Subtitle,
            Some("body") => Self::Body,
            Some("ftr") => Self::Footer,
            Some("dt") => Self::Date,
            Some("sldNum") => Self::SlideNumber,
            Some("pic") => Self::Picture,
            Some(_) => Self::Other,
        }
    }

    /// Whether this placeholder carries the slide's title.
    #[inline]
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenteredTitle)
    }
}

/// Text content of a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextBody {
    pub paragraphs: Vec<Paragraph>,
    pub anchor: VerticalAnchor,
}

impl TextBody {
    /// All paragraphs joined by newlines.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for (i, para) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&para.plain_text());
        }
        out
    }
}

/// Shape payload variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeContent {
    Text(TextBody),
    Image {
        /// Media asset id, `None` when the relationship dangles
        media_id: Option<String>,
    },
    Generic,
}

/// One shape on a slide.
///
/// Shapes appear in document order, which is also paint order: the first
/// shape is the backmost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    /// Shape name from its non-visual properties, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub frame: Frame,

    /// Resolved fill color ("#RRGGBB")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    /// Placeholder role driving style inheritance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<PlaceholderKind>,

    #[serde(flatten)]
    pub content: ShapeContent,
}

impl Shape {
    /// Plain text carried by this shape, empty for non-text shapes.
    pub fn plain_text(&self) -> String {
        match &self.content {
            ShapeContent::Text(body) => body.plain_text(),
            _ => String::new(),
        }
    }

    /// A shape with no extent and no text contributes nothing to output
    /// and may be skipped without affecting its siblings.
    pub fn is_renderable(&self) -> bool {
        if !self.frame.is_zero_sized() {
            return true;
        }
        !self.plain_text().trim().is_empty()
    }
}

/// Resolve an override chain: the first layer that defines a value wins.
pub fn first_defined<T>(layers: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    layers.into_iter().flatten().next()
}
