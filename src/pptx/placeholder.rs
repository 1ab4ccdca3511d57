/// Placeholder inheritance tables built from masters and layouts.
///
/// Slide masters declare the default geometry and text styling of each
/// placeholder kind; layouts sit between masters and slides and may
/// override parts of it. A layout override only counts where it actually
/// says something: geometry with positive extent, a positive font size, a
/// declared color, alignment, or anchor. Slides then fill their own gaps
/// from the resulting table.
use std::collections::HashMap;

use crate::common::diag::{DiagKind, DiagSink};
use crate::common::unit::{centipt_to_pt, emu_to_px_96};
use crate::opc::Container;
use crate::opc::error::Result;
use crate::pptx::color::{ColorContext, ColorRef};
use crate::pptx::shape::{self, RawShapeKind, attr_value};
use crate::pptx::text::{parse_align, parse_anchor};
use crate::presentation::{Frame, PlaceholderKind, TextAlign, VerticalAnchor};

/// Inheritable defaults for one placeholder kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderStyle {
    pub frame: Option<Frame>,
    /// Default font size in points
    pub size: Option<f32>,
    /// Default text color as a `#RRGGBB` string
    pub color: Option<String>,
    pub align: Option<TextAlign>,
    pub anchor: Option<VerticalAnchor>,
}

impl PlaceholderStyle {
    /// Apply a layout-level override on top of this style.
    fn apply_override(&mut self, other: &PlaceholderStyle) {
        if let Some(frame) = other.frame
            && frame.width > 0.0
            && frame.height > 0.0
        {
            self.frame = Some(frame);
        }
        if let Some(size) = other.size
            && size > 0.0
        {
            self.size = Some(size);
        }
        if other.color.is_some() {
            self.color.clone_from(&other.color);
        }
        if other.align.is_some() {
            self.align = other.align;
        }
        if other.anchor.is_some() {
            self.anchor = other.anchor;
        }
    }

    fn is_vacant(&self) -> bool {
        self.frame.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.align.is_none()
            && self.anchor.is_none()
    }
}

/// Placeholder defaults keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderTable {
    styles: HashMap<PlaceholderKind, PlaceholderStyle>,
}

impl PlaceholderTable {
    /// Build the package-wide fallback table.
    ///
    /// Every master contributes first (the first master to define a kind
    /// wins), then every layout refines the result. Unreadable parts are
    /// recorded and skipped.
    pub fn build(container: &Container, colors: &ColorContext, diag: &DiagSink) -> Self {
        let mut table = Self::default();
        for uri in container.parts_under("/ppt/slideMasters/") {
            if let Some(xml) = container.part(&uri)
                && let Err(err) = table.absorb(xml, colors, false)
            {
                diag.warn(
                    DiagKind::MalformedXml,
                    None,
                    Some(uri.as_str()),
                    format!("cannot read master placeholders: {err}"),
                );
            }
        }
        for uri in container.parts_under("/ppt/slideLayouts/") {
            if let Some(xml) = container.part(&uri)
                && let Err(err) = table.absorb(xml, colors, true)
            {
                diag.warn(
                    DiagKind::MalformedXml,
                    None,
                    Some(uri.as_str()),
                    format!("cannot read layout placeholders: {err}"),
                );
            }
        }
        table
    }

    /// Build the table for one slide's actual layout and master parts.
    ///
    /// Either part may be absent; unreadable parts contribute nothing. The
    /// caller falls back to the package-wide table for kinds missing here.
    pub fn from_chain(
        master_xml: Option<&[u8]>,
        layout_xml: Option<&[u8]>,
        colors: &ColorContext,
    ) -> Self {
        let mut table = Self::default();
        if let Some(xml) = master_xml {
            let _ = table.absorb(xml, colors, false);
        }
        if let Some(xml) = layout_xml {
            let _ = table.absorb(xml, colors, true);
        }
        table
    }

    /// Fold one master or layout part into the table.
    fn absorb(&mut self, xml: &[u8], colors: &ColorContext, overriding: bool) -> Result<()> {
        for raw in shape::collect_shapes(xml)? {
            if raw.kind != RawShapeKind::Shape {
                continue;
            }
            let props = shape::parse_shape_props(&raw.xml);
            let Some(ph_type) = props.placeholder.as_ref() else {
                continue;
            };
            let kind = PlaceholderKind::from_attr(ph_type.as_deref());

            let mut style = probe_style(&raw.xml, colors);
            style.frame = props.frame_emu.map(|f| Frame {
                x: emu_to_px_96(f.x),
                y: emu_to_px_96(f.y),
                width: emu_to_px_96(f.cx),
                height: emu_to_px_96(f.cy),
            });
            if style.is_vacant() {
                continue;
            }

            if overriding {
                self.styles.entry(kind).or_default().apply_override(&style);
            } else {
                self.styles.entry(kind).or_insert(style);
            }
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, kind: PlaceholderKind) -> Option<&PlaceholderStyle> {
        self.styles.get(&kind)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Scan one placeholder shape for its declared text defaults.
///
/// The probe reads the first font size on an `rPr`/`defRPr`, the first
/// fill color inside such an element, the first top-level or level-one
/// alignment, and the body anchor. Geometry is handled by the caller.
fn probe_style(xml: &[u8], colors: &ColorContext) -> PlaceholderStyle {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut style = PlaceholderStyle::default();
    let mut in_run_props = false;
    let mut in_fill = false;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(_) => break,
        };
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"bodyPr" => {
                        if style.anchor.is_none() {
                            style.anchor =
                                attr_value(e, b"anchor").as_deref().and_then(parse_anchor);
                        }
                    },
                    b"pPr" | b"defPPr" | b"lvl1pPr" => {
                        if style.align.is_none()
                            && let Some(algn) = attr_value(e, b"algn")
                        {
                            style.align = parse_align(&algn);
                        }
                    },
                    b"rPr" | b"defRPr" => {
                        in_run_props = !empty;
                        if style.size.is_none()
                            && let Some(sz) = attr_value(e, b"sz")
                            && let Ok(centipt) = atoi_simd::parse::<i64>(sz.as_bytes())
                            && centipt > 0
                        {
                            style.size = Some(centipt_to_pt(centipt));
                        }
                    },
                    b"solidFill" if in_run_props => in_fill = true,
                    b"srgbClr" if in_fill && style.color.is_none() => {
                        if let Some(value) = attr_value(e, b"val") {
                            style.color = colors.resolve_css(&ColorRef::rgb(&value));
                        }
                    },
                    b"schemeClr" if in_fill && style.color.is_none() => {
                        if let Some(value) = attr_value(e, b"val") {
                            style.color = colors.resolve_css(&ColorRef::scheme(&value));
                        }
                    },
                    _ => {},
                }
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"rPr" | b"defRPr" => in_run_props = false,
                b"solidFill" => in_fill = false,
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    style
}
