/// Rich text extraction from `txBody` elements.
///
/// Produces the model's paragraphs and runs with block styling (alignment,
/// indent, bullets, spacing) and run styling (bold/italic/underline, size,
/// color, font). Colors and theme font tokens are resolved here, while
/// placeholder inheritance for missing values is applied by the slide
/// extractor afterwards.
use crate::common::unit::centipt_to_pt;
use crate::pptx::color::{ColorContext, ColorRef};
use crate::pptx::shape::attr_value;
use crate::pptx::theme::resolve_font_token;
use crate::presentation::{BulletKind, Paragraph, Run, TextAlign, VerticalAnchor};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parsed text body before placeholder inheritance.
#[derive(Debug, Clone, Default)]
pub struct RawTextBody {
    pub paragraphs: Vec<Paragraph>,
    /// Vertical anchor, only when the `bodyPr` declared one
    pub anchor: Option<VerticalAnchor>,
}

impl RawTextBody {
    /// Whether any run carries non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.paragraphs
            .iter()
            .flat_map(|p| &p.runs)
            .any(|r| !r.text.trim().is_empty())
    }
}

/// Spacing element currently being read (`spcBef` or `spcAft`).
#[derive(Clone, Copy)]
enum SpacingSlot {
    Before,
    After,
}

/// Parse the first `txBody` in a shape fragment.
///
/// Returns `None` when the fragment has no text body at all.
pub fn parse_text_body(xml: &[u8], colors: &ColorContext) -> Option<RawTextBody> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut body = RawTextBody::default();
    let mut found = false;

    let mut in_tx_body = false;
    let mut in_rpr = false;
    let mut in_rpr_fill = false;
    let mut in_t = false;
    let mut spacing: Option<SpacingSlot> = None;

    let mut para: Option<Paragraph> = None;
    let mut run: Option<Run> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(_) => break,
        };
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"txBody" => {
                        in_tx_body = true;
                        found = true;
                    },
                    b"bodyPr" if in_tx_body => {
                        body.anchor =
                            attr_value(e, b"anchor").as_deref().and_then(parse_anchor);
                    },
                    b"p" if in_tx_body => {
                        para = Some(Paragraph::default());
                    },
                    b"pPr" => {
                        if let Some(para) = para.as_mut() {
                            apply_paragraph_props(para, e);
                        }
                    },
                    b"buNone" => {
                        if let Some(para) = para.as_mut() {
                            para.bullet = BulletKind::None;
                        }
                    },
                    b"buChar" => {
                        if let Some(para) = para.as_mut() {
                            para.bullet = BulletKind::Bullet;
                            para.bullet_char = attr_value(e, b"char");
                        }
                    },
                    b"buAutoNum" => {
                        if let Some(para) = para.as_mut() {
                            para.bullet = BulletKind::Number;
                        }
                    },
                    b"spcBef" if para.is_some() => spacing = Some(SpacingSlot::Before),
                    b"spcAft" if para.is_some() => spacing = Some(SpacingSlot::After),
                    b"spcPts" => {
                        if let (Some(slot), Some(para)) = (spacing, para.as_mut())
                            && let Some(value) = attr_value(e, b"val")
                            && let Ok(centipt) = atoi_simd::parse::<i64>(value.as_bytes())
                        {
                            let pt = centipt_to_pt(centipt);
                            match slot {
                                SpacingSlot::Before => para.space_before = Some(pt),
                                SpacingSlot::After => para.space_after = Some(pt),
                            }
                        }
                    },
                    b"r" | b"fld" if para.is_some() && !empty => {
                        run = Some(Run::default());
                    },
                    b"br" if para.is_some() => {
                        if let Some(para) = para.as_mut() {
                            para.runs.push(Run::text("\n"));
                        }
                    },
                    b"rPr" => {
                        if let Some(run) = run.as_mut() {
                            in_rpr = !empty;
                            apply_run_props(run, e);
                        }
                    },
                    b"solidFill" if in_rpr => in_rpr_fill = true,
                    b"srgbClr" if in_rpr_fill => {
                        if let (Some(run), Some(value)) = (run.as_mut(), attr_value(e, b"val"))
                            && run.color.is_none()
                        {
                            run.color = colors.resolve_css(&ColorRef::rgb(&value));
                        }
                    },
                    b"schemeClr" if in_rpr_fill => {
                        if let (Some(run), Some(value)) = (run.as_mut(), attr_value(e, b"val"))
                            && run.color.is_none()
                        {
                            run.color = colors.resolve_css(&ColorRef::scheme(&value));
                        }
                    },
                    b"latin" if in_rpr => {
                        if let (Some(run), Some(typeface)) =
                            (run.as_mut(), attr_value(e, b"typeface"))
                        {
                            run.font = resolve_font_token(colors.themes(), &typeface)
                                .map(str::to_string);
                        }
                    },
                    b"t" if run.is_some() => in_t = !empty,
                    _ => {},
                }
            },
            Event::Text(ref e) if in_t => {
                if let (Some(run), Ok(text)) = (run.as_mut(), e.decode()) {
                    run.text.push_str(&text);
                }
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"txBody" => break,
                b"p" => {
                    if let Some(para) = para.take() {
                        body.paragraphs.push(para);
                    }
                },
                b"r" | b"fld" => {
                    if let (Some(run), Some(para)) = (run.take(), para.as_mut())
                        && !run.text.is_empty()
                    {
                        para.runs.push(run);
                    }
                },
                b"rPr" => in_rpr = false,
                b"solidFill" => in_rpr_fill = false,
                b"spcBef" | b"spcAft" => spacing = None,
                b"t" => in_t = false,
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    found.then_some(body)
}

/// EMU of left margin per indent level, the editor default.
const MARGIN_PER_LEVEL_EMU: i64 = 457_200;

fn apply_paragraph_props(para: &mut Paragraph, e: &BytesStart<'_>) {
    if let Some(algn) = attr_value(e, b"algn") {
        para.align = parse_align(&algn);
    }
    if let Some(lvl) = attr_value(e, b"lvl")
        && let Ok(level) = atoi_simd::parse::<u8>(lvl.as_bytes())
    {
        para.indent = level.min(8);
    } else if let Some(margin) = attr_value(e, b"marL")
        && let Ok(emu) = atoi_simd::parse::<i64>(margin.as_bytes())
        && emu > 0
    {
        // Some writers express nesting as a left margin without a level
        para.indent = (emu / MARGIN_PER_LEVEL_EMU).min(8) as u8;
    }
}

fn apply_run_props(run: &mut Run, e: &BytesStart<'_>) {
    for attr in e.attributes().flatten() {
        let Ok(value) = attr.unescape_value() else {
            continue;
        };
        match attr.key.as_ref() {
            b"b" => run.bold = Some(value.as_ref() == "1" || value.as_ref() == "true"),
            b"i" => run.italic = Some(value.as_ref() == "1" || value.as_ref() == "true"),
            b"u" => run.underline = Some(value.as_ref() != "none"),
            b"sz" => {
                if let Ok(centipt) = atoi_simd::parse::<i64>(value.as_bytes()) {
                    run.size = Some(centipt_to_pt(centipt));
                }
            },
            _ => {},
        }
    }
}

pub(crate) fn parse_align(value: &str) -> Option<TextAlign> {
    match value {
        "l" => Some(TextAlign::Left),
        "ctr" => Some(TextAlign::Center),
        "r" => Some(TextAlign::Right),
        "just" => Some(TextAlign::Justify),
        _ => None,
    }
}

pub(crate) fn parse_anchor(value: &str) -> Option<VerticalAnchor> {
    match value {
        "t" => Some(VerticalAnchor::Top),
        "ctr" => Some(VerticalAnchor::Middle),
        "b" => Some(VerticalAnchor::Bottom),
        _ => None,
    }
}

/// Extract all text content from a part.
///
/// This pulls the text of every `a:t` element, one line per element. Used
/// for notes parts and as the last-resort text view of damaged shapes.
pub fn extract_all_text(xml: &[u8]) -> String {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                }
            },
            Ok(Event::Text(ref e)) if in_text_element => {
                if let Ok(t) = e.decode() {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&t);
                }
            },
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = false;
                }
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    text
}
