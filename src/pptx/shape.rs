/// Shape discovery and per-shape property parsing.
///
/// The slide's shape tree is split into one XML fragment per top-level
/// shape first; each fragment is then scanned for the handful of
/// properties the model carries. Splitting up front keeps every later
/// pass bounded to one shape and makes the paint order explicit: fragment
/// order is document order.
use crate::opc::error::{OpcError, Result};
use crate::pptx::color::ColorRef;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Top-level shape element kinds recognized in a shape tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawShapeKind {
    /// `sp` - text shape
    Shape,
    /// `pic` - picture
    Picture,
    /// `graphicFrame` - table/chart container
    GraphicFrame,
    /// `grpSp` - group
    GroupShape,
    /// `cxnSp` - connector
    Connector,
}

/// One shape subtree, re-serialized from the part's XML.
#[derive(Debug, Clone)]
pub struct RawShape {
    pub kind: RawShapeKind,
    pub xml: Vec<u8>,
}

/// Split a slide-like part into its top-level shape fragments.
///
/// Group shapes are kept as a single fragment; their children are not
/// lifted out.
pub fn collect_shapes(xml: &[u8]) -> Result<Vec<RawShape>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut shapes = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let kind = match e.local_name().as_ref() {
                    b"sp" => Some(RawShapeKind::Shape),
                    b"pic" => Some(RawShapeKind::Picture),
                    b"graphicFrame" => Some(RawShapeKind::GraphicFrame),
                    b"grpSp" => Some(RawShapeKind::GroupShape),
                    b"cxnSp" => Some(RawShapeKind::Connector),
                    _ => None,
                };

                if let Some(kind) = kind {
                    let xml = extract_shape_xml(&mut reader, e)?;
                    shapes.push(RawShape { kind, xml });
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::malformed("shape tree", e)),
            _ => {},
        }
    }

    Ok(shapes)
}

/// Re-serialize one shape subtree, start tag included.
///
/// The start tag has already been consumed by the caller; depth tracking
/// stops at its matching end tag.
fn extract_shape_xml(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Vec<u8>> {
    let mut shape_xml = Vec::new();
    let mut depth = 1;

    write_start_tag(&mut shape_xml, start, false);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                write_start_tag(&mut shape_xml, &e, false);
            },
            Ok(Event::Empty(e)) => {
                write_start_tag(&mut shape_xml, &e, true);
            },
            Ok(Event::End(e)) => {
                shape_xml.extend_from_slice(b"</");
                shape_xml.extend_from_slice(e.name().as_ref());
                shape_xml.push(b'>');

                depth -= 1;
                if depth == 0 {
                    return Ok(shape_xml);
                }
            },
            Ok(Event::Text(e)) => {
                shape_xml.extend_from_slice(e.as_ref());
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::malformed("shape tree", e)),
            _ => {},
        }
    }

    Err(OpcError::MalformedXml {
        part: "shape tree".to_string(),
        detail: "unterminated shape element".to_string(),
    })
}

fn write_start_tag(out: &mut Vec<u8>, e: &BytesStart<'_>, empty: bool) {
    out.push(b'<');
    out.extend_from_slice(e.name().as_ref());
    for attr in e.attributes().flatten() {
        out.push(b' ');
        out.extend_from_slice(attr.key.as_ref());
        out.extend_from_slice(b"=\"");
        out.extend_from_slice(&attr.value);
        out.push(b'"');
    }
    if empty {
        out.extend_from_slice(b"/>");
    } else {
        out.push(b'>');
    }
}

/// Shape geometry in EMUs, from `a:xfrm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEmu {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// Properties scanned out of one shape fragment.
///
/// Everything is optional: a shape may omit its geometry (inherited from a
/// placeholder), its fill, or its name, and the scan never fails on
/// damaged fragments - it just stops early.
#[derive(Debug, Clone, Default)]
pub struct ShapeProps {
    /// Shape name from `cNvPr`
    pub name: Option<String>,

    /// `Some(type attr)` when the shape carries a `ph` element
    pub placeholder: Option<Option<String>>,

    /// Explicit geometry, when the shape declares its own `xfrm`
    pub frame_emu: Option<FrameEmu>,

    /// Shape fill color from `spPr > solidFill`, line fills excluded
    pub fill: Option<ColorRef>,

    /// Image relationship id from `blip r:embed`
    pub blip_rid: Option<String>,
}

/// Scan a shape fragment for its model-relevant properties.
pub fn parse_shape_props(xml: &[u8]) -> ShapeProps {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut props = ShapeProps::default();

    // Scoping flags: a solidFill is a shape fill only inside spPr and
    // outside both the outline (ln) and the text body (rPr colors).
    let mut in_sp_pr = false;
    let mut in_ln = false;
    let mut in_tx_body = false;
    let mut in_fill = false;
    let mut off: Option<(i64, i64)> = None;
    let mut ext: Option<(i64, i64)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(_) => break,
        };
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"cNvPr" if props.name.is_none() => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name"
                            && let Ok(value) = attr.unescape_value()
                            && !value.is_empty()
                        {
                            props.name = Some(value.into_owned());
                        }
                    }
                },
                b"ph" if props.placeholder.is_none() => {
                    let mut ph_type = None;
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"type"
                            && let Ok(value) = attr.unescape_value()
                        {
                            ph_type = Some(value.into_owned());
                        }
                    }
                    props.placeholder = Some(ph_type);
                },
                b"spPr" | b"grpSpPr" => in_sp_pr = true,
                b"ln" => in_ln = true,
                b"txBody" => in_tx_body = true,
                b"off" if in_sp_pr && props.frame_emu.is_none() => {
                    off = parse_point(e, b"x", b"y");
                },
                b"ext" if in_sp_pr && props.frame_emu.is_none() => {
                    ext = parse_point(e, b"cx", b"cy");
                    if let (Some((x, y)), Some((cx, cy))) = (off, ext) {
                        props.frame_emu = Some(FrameEmu { x, y, cx, cy });
                    }
                },
                b"solidFill" if in_sp_pr && !in_ln && !in_tx_body => in_fill = true,
                b"srgbClr" if in_fill && props.fill.is_none() => {
                    if let Some(value) = attr_value(e, b"val") {
                        props.fill = Some(ColorRef::rgb(&value));
                    }
                },
                b"schemeClr" if in_fill && props.fill.is_none() => {
                    if let Some(value) = attr_value(e, b"val") {
                        props.fill = Some(ColorRef::scheme(&value));
                    }
                },
                b"blip" if props.blip_rid.is_none() => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"r:embed"
                            && let Ok(value) = attr.unescape_value()
                        {
                            props.blip_rid = Some(value.into_owned());
                        }
                    }
                },
                _ => {},
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"spPr" | b"grpSpPr" => in_sp_pr = false,
                b"ln" => in_ln = false,
                b"txBody" => in_tx_body = false,
                b"solidFill" => in_fill = false,
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    props
}

/// Read a pair of integer attributes off an element.
fn parse_point(e: &BytesStart<'_>, first: &[u8], second: &[u8]) -> Option<(i64, i64)> {
    let mut a = None;
    let mut b = None;
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == first {
            a = atoi_simd::parse::<i64>(&attr.value).ok();
        } else if attr.key.as_ref() == second {
            b = atoi_simd::parse::<i64>(&attr.value).ok();
        }
    }
    Some((a?, b?))
}

/// Read one attribute as a string.
pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return attr.unescape_value().ok().map(|v| v.into_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SP_TREE: &[u8] = br#"<p:spTree>
        <p:sp>
            <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
            <p:spPr>
                <a:xfrm><a:off x="914400" y="457200"/><a:ext cx="7315200" cy="1143000"/></a:xfrm>
                <a:solidFill><a:srgbClr val="0070c0"/></a:solidFill>
                <a:ln><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></a:ln>
            </p:spPr>
            <p:txBody><a:p><a:r><a:t>Hi</a:t></a:r></a:p></p:txBody>
        </p:sp>
        <p:pic>
            <p:nvPicPr><p:cNvPr id="3" name="Picture 2"/></p:nvPicPr>
            <p:blipFill><a:blip r:embed="rId2"/></p:blipFill>
            <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm></p:spPr>
        </p:pic>
        <p:graphicFrame><a:graphic/></p:graphicFrame>
    </p:spTree>"#;

    #[test]
    fn test_collect_shapes_in_document_order() {
        let shapes = collect_shapes(SP_TREE).unwrap();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0].kind, RawShapeKind::Shape);
        assert_eq!(shapes[1].kind, RawShapeKind::Picture);
        assert_eq!(shapes[2].kind, RawShapeKind::GraphicFrame);
    }

    #[test]
    fn test_group_is_one_fragment() {
        let xml = br#"<p:spTree>
            <p:grpSp><p:sp><p:txBody/></p:sp><p:sp><p:spPr/></p:sp></p:grpSp>
            <p:sp><p:spPr/></p:sp>
        </p:spTree>"#;
        let shapes = collect_shapes(xml).unwrap();
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].kind, RawShapeKind::GroupShape);
        assert_eq!(shapes[1].kind, RawShapeKind::Shape);
        assert!(shapes[0].xml.windows(8).any(|w| w == b"p:txBody".as_slice()));
    }

    #[test]
    fn test_parse_title_shape_props() {
        let shapes = collect_shapes(SP_TREE).unwrap();
        let props = parse_shape_props(&shapes[0].xml);

        assert_eq!(props.name.as_deref(), Some("Title 1"));
        assert_eq!(props.placeholder, Some(Some("title".to_string())));

        let frame = props.frame_emu.unwrap();
        assert_eq!(frame.x, 914_400);
        assert_eq!(frame.cy, 1_143_000);

        // Fill comes from spPr, not from the outline
        assert_eq!(props.fill, Some(ColorRef::Rgb("0070C0".to_string())));
        assert_eq!(props.blip_rid, None);
    }

    #[test]
    fn test_parse_picture_props() {
        let shapes = collect_shapes(SP_TREE).unwrap();
        let props = parse_shape_props(&shapes[1].xml);

        assert_eq!(props.blip_rid.as_deref(), Some("rId2"));
        assert_eq!(props.placeholder, None);
        assert_eq!(props.fill, None);
    }

    #[test]
    fn test_shape_without_geometry() {
        let xml = br#"<p:sp>
            <p:nvSpPr><p:nvPr><p:ph type="body"/></p:nvPr></p:nvSpPr>
            <p:spPr/>
        </p:sp>"#;
        let props = parse_shape_props(xml);
        assert_eq!(props.placeholder, Some(Some("body".to_string())));
        assert_eq!(props.frame_emu, None);
    }

    #[test]
    fn test_run_color_is_not_shape_fill() {
        let xml = br#"<p:sp><p:spPr/><p:txBody>
            <a:p><a:r><a:rPr><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill></a:rPr><a:t>x</a:t></a:r></a:p>
        </p:txBody></p:sp>"#;
        let props = parse_shape_props(xml);
        assert_eq!(props.fill, None);
    }

    #[test]
    fn test_truncated_fragment_errors() {
        let xml = br#"<p:spTree><p:sp><p:spPr>"#;
        assert!(collect_shapes(xml).is_err());
    }
}
