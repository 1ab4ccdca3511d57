/// Per-slide extraction: turns one slide part into a model [`Slide`].
///
/// Extraction never fails the deck. A missing or unreadable slide part is
/// substituted by an error placeholder, and every lesser problem (dangling
/// image relationship, absent layout, damaged ancestor) degrades to a
/// diagnostic plus the best content still derivable.
use crate::common::diag::{DiagKind, DiagSink};
use crate::common::unit::emu_to_px_96;
use crate::opc::constants::relationship_type;
use crate::opc::error::Result;
use crate::opc::{Container, PackURI, Relationships};
use crate::pptx::background::parse_background;
use crate::pptx::color::ColorContext;
use crate::pptx::media::MediaRegistry;
use crate::pptx::placeholder::{PlaceholderStyle, PlaceholderTable};
use crate::pptx::shape::{self, RawShape, RawShapeKind};
use crate::pptx::text::{RawTextBody, extract_all_text, parse_text_body};
use crate::presentation::{
    Frame, PlaceholderKind, Shape, ShapeContent, Slide, SlideSize, TextBody, first_defined,
};

/// Read-only inputs shared by every slide of one parse.
///
/// The tables are built before slide extraction begins and never change
/// afterwards, so one context can be handed to parallel per-slide tasks.
pub struct ExtractCtx<'a> {
    pub container: &'a Container,
    pub colors: &'a ColorContext<'a>,
    /// Package-wide placeholder table, the fallback behind the slide's own
    /// ancestor chain
    pub placeholders: &'a PlaceholderTable,
    pub media: &'a MediaRegistry,
    pub diag: &'a DiagSink,
    pub slide_size: SlideSize,
}

/// Extract one slide.
///
/// A missing part or unparseable XML yields [`Slide::error_placeholder`]
/// with a diagnostic; the deck keeps its slide count either way.
pub fn extract_slide(ctx: &ExtractCtx<'_>, index: usize, uri: &PackURI) -> Slide {
    let Some(xml) = ctx.container.part(uri) else {
        ctx.diag.warn(
            DiagKind::MissingPart,
            Some(index),
            Some(uri.as_str()),
            "slide part not found",
        );
        return Slide::error_placeholder(index);
    };

    match try_extract(ctx, index, uri, xml) {
        Ok(slide) => slide,
        Err(err) => {
            ctx.diag.warn(
                DiagKind::SlideExtractionFailed,
                Some(index),
                Some(uri.as_str()),
                format!("slide replaced by error placeholder: {err}"),
            );
            Slide::error_placeholder(index)
        },
    }
}

fn try_extract(ctx: &ExtractCtx<'_>, index: usize, uri: &PackURI, xml: &[u8]) -> Result<Slide> {
    let rels = Relationships::for_part(ctx.container, uri, ctx.diag);

    // Two-hop ancestor chain. Either hop may dangle; extraction continues
    // with whatever levels are present.
    let layout_uri = rels
        .first_of_type(relationship_type::SLIDE_LAYOUT)
        .and_then(|rel| rels.target_of(rel.r_id()));
    let layout_xml = layout_uri.as_ref().and_then(|u| ctx.container.part(u));
    let master_xml = layout_uri
        .as_ref()
        .map(|layout_uri| Relationships::for_part(ctx.container, layout_uri, ctx.diag))
        .and_then(|layout_rels| {
            layout_rels
                .first_of_type(relationship_type::SLIDE_MASTER)
                .and_then(|rel| layout_rels.target_of(rel.r_id()))
        })
        .and_then(|master_uri| ctx.container.part(&master_uri));

    // The slide's own chain is more precise than the package-wide table
    // when several layouts override the same placeholder kind.
    let chain = PlaceholderTable::from_chain(master_xml, layout_xml, ctx.colors);

    let background = first_defined([
        parse_background(xml),
        layout_xml.and_then(parse_background),
        master_xml.and_then(parse_background),
    ])
    .and_then(|color| ctx.colors.resolve_css(&color));

    let raw_shapes = shape::collect_shapes(xml)?;
    let mut shapes = Vec::with_capacity(raw_shapes.len());
    for (shape_index, raw) in raw_shapes.iter().enumerate() {
        shapes.push(extract_shape(ctx, index, &rels, &chain, raw, shape_index));
    }

    let title = derive_title(&shapes);
    let text = flatten_text(&shapes);
    let notes = extract_notes(ctx, &rels);

    Ok(Slide {
        index,
        title,
        background,
        shapes,
        text,
        notes,
    })
}

fn extract_shape(
    ctx: &ExtractCtx<'_>,
    slide_index: usize,
    rels: &Relationships,
    chain: &PlaceholderTable,
    raw: &RawShape,
    shape_index: usize,
) -> Shape {
    let props = shape::parse_shape_props(&raw.xml);

    let kind = props
        .placeholder
        .as_ref()
        .map(|ph_type| PlaceholderKind::from_attr(ph_type.as_deref()));
    let style = kind
        .map(|kind| inherited_style(kind, chain, ctx.placeholders))
        .unwrap_or_default();

    // Geometry tiers: the shape's own xfrm always wins; otherwise the
    // placeholder chain, then the package table, then a synthetic stack.
    let frame = props
        .frame_emu
        .map(|f| Frame {
            x: emu_to_px_96(f.x),
            y: emu_to_px_96(f.y),
            width: emu_to_px_96(f.cx),
            height: emu_to_px_96(f.cy),
        })
        .or(style.frame)
        .unwrap_or_else(|| synthetic_frame(ctx.slide_size, shape_index));

    let fill = props
        .fill
        .as_ref()
        .and_then(|color| ctx.colors.resolve_css(color));

    let content = match raw.kind {
        RawShapeKind::Picture => ShapeContent::Image {
            media_id: resolve_media(ctx, slide_index, rels, props.blip_rid.as_deref()),
        },
        RawShapeKind::Shape => match parse_text_body(&raw.xml, ctx.colors) {
            Some(body) => ShapeContent::Text(apply_inheritance(body, &style)),
            None => ShapeContent::Generic,
        },
        RawShapeKind::GraphicFrame | RawShapeKind::GroupShape | RawShapeKind::Connector => {
            ShapeContent::Generic
        },
    };

    Shape {
        name: props.name,
        frame,
        fill,
        placeholder: kind,
        content,
    }
}

/// Field-wise placeholder style resolution: the slide's live ancestor
/// chain wins wherever it defines a value, the package-wide table fills
/// the rest.
fn inherited_style(
    kind: PlaceholderKind,
    chain: &PlaceholderTable,
    global: &PlaceholderTable,
) -> PlaceholderStyle {
    let live = chain.get(kind).cloned().unwrap_or_default();
    let fallback = global.get(kind).cloned().unwrap_or_default();
    PlaceholderStyle {
        frame: first_defined([live.frame, fallback.frame]),
        size: first_defined([live.size, fallback.size]),
        color: first_defined([live.color, fallback.color]),
        align: first_defined([live.align, fallback.align]),
        anchor: first_defined([live.anchor, fallback.anchor]),
    }
}

/// Fill run and paragraph gaps from the shape's placeholder style.
fn apply_inheritance(raw: RawTextBody, style: &PlaceholderStyle) -> TextBody {
    let mut body = TextBody {
        paragraphs: raw.paragraphs,
        anchor: first_defined([raw.anchor, style.anchor]).unwrap_or_default(),
    };
    for para in &mut body.paragraphs {
        if para.align.is_none() {
            para.align = style.align;
        }
        for run in &mut para.runs {
            if run.size.is_none() {
                run.size = style.size;
            }
            if run.color.is_none() {
                run.color.clone_from(&style.color);
            }
        }
    }
    body
}

/// Resolve a picture's `r:embed` id to a media table entry.
///
/// A dangling relationship or an absent media part keeps the shape with an
/// empty reference; only a diagnostic is recorded.
fn resolve_media(
    ctx: &ExtractCtx<'_>,
    slide_index: usize,
    rels: &Relationships,
    blip_rid: Option<&str>,
) -> Option<String> {
    let rid = blip_rid?;
    let Some(target) = rels.target_of(rid) else {
        ctx.diag.warn(
            DiagKind::MissingPart,
            Some(slide_index),
            None,
            format!("image relationship '{rid}' not found"),
        );
        return None;
    };
    let id = target.filename();
    if ctx.media.contains(id) {
        Some(id.to_string())
    } else {
        ctx.diag.warn(
            DiagKind::MissingPart,
            Some(slide_index),
            Some(target.as_str()),
            "image part not found",
        );
        None
    }
}

/// Last-resort geometry when neither the shape nor any ancestor defines
/// one: a fixed left margin with shapes stacked downward by document
/// order. The stacking is a heuristic, not anything the format promises.
fn synthetic_frame(slide_size: SlideSize, shape_index: usize) -> Frame {
    Frame {
        x: 50.0,
        y: 50.0 + 60.0 * shape_index as f32,
        width: (slide_size.width_px() - 100.0).max(100.0),
        height: 50.0,
    }
}

/// First title-placeholder text, else the first non-empty text found.
fn derive_title(shapes: &[Shape]) -> Option<String> {
    shapes
        .iter()
        .filter(|s| s.placeholder.is_some_and(|k| k.is_title()))
        .map(Shape::plain_text)
        .find(|t| !t.trim().is_empty())
        .or_else(|| {
            shapes
                .iter()
                .map(Shape::plain_text)
                .find(|t| !t.trim().is_empty())
        })
}

fn flatten_text(shapes: &[Shape]) -> String {
    let mut out = String::new();
    for shape in shapes {
        let text = shape.plain_text();
        if text.trim().is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&text);
    }
    out
}

fn extract_notes(ctx: &ExtractCtx<'_>, rels: &Relationships) -> Option<String> {
    let rel = rels.first_of_type(relationship_type::NOTES_SLIDE)?;
    let uri = rels.target_of(rel.r_id())?;
    let xml = ctx.container.part(&uri)?;
    let text = extract_all_text(xml);
    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::colormap::ColorMap;
    use crate::pptx::theme::Theme;

    const SLIDE_XML: &[u8] = br#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
      <p:spPr/>
      <p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US"/><a:t>Quarterly Update</a:t></a:r></a:p></p:txBody>
    </p:sp>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>
      <p:spPr><a:xfrm><a:off x="914400" y="1828800"/><a:ext cx="4572000" cy="914400"/></a:xfrm></p:spPr>
      <p:txBody><a:bodyPr/><a:p><a:r><a:rPr sz="2000"/><a:t>Revenue grew</a:t></a:r></a:p></p:txBody>
    </p:sp>
    <p:pic>
      <p:nvPicPr><p:cNvPr id="4" name="Picture 3"/></p:nvPicPr>
      <p:blipFill><a:blip r:embed="rId2"/></p:blipFill>
      <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm></p:spPr>
    </p:pic>
  </p:spTree></p:cSld>
</p:sld>"#;

    const LAYOUT_XML: &[u8] = br#"<?xml version="1.0"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
      <p:spPr><a:xfrm><a:off x="685800" y="457200"/><a:ext cx="7772400" cy="1143000"/></a:xfrm></p:spPr>
      <p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></a:lstStyle><a:p/></p:txBody>
    </p:sp>
  </p:spTree></p:cSld>
</p:sldLayout>"#;

    const MASTER_XML: &[u8] = br#"<?xml version="1.0"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld>
    <p:bg><p:bgPr><a:solidFill><a:srgbClr val="1F4E79"/></a:solidFill></p:bgPr></p:bg>
    <p:spTree/>
  </p:cSld>
</p:sldMaster>"#;

    fn slide_rels() -> String {
        format!(
            r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="{}" Target="../media/image1.png"/>
</Relationships>"#,
            relationship_type::SLIDE_LAYOUT,
            relationship_type::IMAGE,
        )
    }

    fn layout_rels() -> String {
        format!(
            r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#,
            relationship_type::SLIDE_MASTER,
        )
    }

    fn sample_container() -> Container {
        let png = b"\x89PNG\r\n\x1a\n0000".to_vec();
        Container::from_parts(vec![
            ("/ppt/slides/slide1.xml".to_string(), SLIDE_XML.to_vec()),
            (
                "/ppt/slides/_rels/slide1.xml.rels".to_string(),
                slide_rels().into_bytes(),
            ),
            (
                "/ppt/slideLayouts/slideLayout1.xml".to_string(),
                LAYOUT_XML.to_vec(),
            ),
            (
                "/ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                layout_rels().into_bytes(),
            ),
            (
                "/ppt/slideMasters/slideMaster1.xml".to_string(),
                MASTER_XML.to_vec(),
            ),
            ("/ppt/media/image1.png".to_string(), png),
        ])
    }

    fn media_for(container: &Container) -> MediaRegistry {
        let mut registry = MediaRegistry::default();
        for uri in container.parts_under("/ppt/media/") {
            if let Some(bytes) = container.part(&uri) {
                registry.insert(crate::pptx::media::MediaAsset::new(&uri, bytes.to_vec()));
            }
        }
        registry
    }

    struct Fixture {
        container: Container,
        themes: Vec<Theme>,
        map: ColorMap,
        media: MediaRegistry,
        diag: DiagSink,
    }

    impl Fixture {
        fn new() -> Self {
            let container = sample_container();
            let media = media_for(&container);
            Self {
                container,
                themes: Vec::new(),
                map: ColorMap::standard(),
                media,
                diag: DiagSink::new(),
            }
        }

        fn extract(&self, index: usize, uri: &str) -> Slide {
            let colors = ColorContext::new(&self.themes, &self.map);
            let placeholders = PlaceholderTable::build(&self.container, &colors, &self.diag);
            let ctx = ExtractCtx {
                container: &self.container,
                colors: &colors,
                placeholders: &placeholders,
                media: &self.media,
                diag: &self.diag,
                slide_size: SlideSize::default(),
            };
            let uri = PackURI::new(uri).unwrap();
            extract_slide(&ctx, index, &uri)
        }
    }

    #[test]
    fn test_title_and_flattened_text() {
        let fixture = Fixture::new();
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        assert_eq!(slide.index, 0);
        assert_eq!(slide.title.as_deref(), Some("Quarterly Update"));
        assert_eq!(slide.text, "Quarterly Update\nRevenue grew");
        assert_eq!(slide.shapes.len(), 3);
    }

    #[test]
    fn test_title_size_inherited_from_layout() {
        let fixture = Fixture::new();
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        let ShapeContent::Text(body) = &slide.shapes[0].content else {
            panic!("title shape should carry text");
        };
        assert_eq!(body.paragraphs[0].runs[0].size, Some(44.0));
        // The explicit size on the body shape is untouched
        let ShapeContent::Text(body) = &slide.shapes[1].content else {
            panic!("body shape should carry text");
        };
        assert_eq!(body.paragraphs[0].runs[0].size, Some(20.0));
    }

    #[test]
    fn test_geometry_tiers() {
        let fixture = Fixture::new();
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        // Title: no explicit xfrm, inherited from the layout placeholder
        assert_eq!(slide.shapes[0].frame.x, 72.0);
        assert_eq!(slide.shapes[0].frame.width, 816.0);
        // Body: explicit xfrm wins
        assert_eq!(slide.shapes[1].frame.x, 96.0);
        assert_eq!(slide.shapes[1].frame.y, 192.0);
        assert_eq!(slide.shapes[1].frame.width, 480.0);
    }

    #[test]
    fn test_background_resolved_through_master() {
        let fixture = Fixture::new();
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        assert_eq!(slide.background.as_deref(), Some("#1F4E79"));
    }

    #[test]
    fn test_image_shape_resolves_media_id() {
        let fixture = Fixture::new();
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        let ShapeContent::Image { media_id } = &slide.shapes[2].content else {
            panic!("third shape should be an image");
        };
        assert_eq!(media_id.as_deref(), Some("image1.png"));
        assert!(fixture.diag.is_empty());
    }

    #[test]
    fn test_dangling_image_relationship_keeps_shape() {
        let mut fixture = Fixture::new();
        // Rebuild the container without the image relationship
        let rels = format!(
            r#"<Relationships><Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#,
            relationship_type::SLIDE_LAYOUT
        );
        fixture.container = Container::from_parts(vec![
            ("/ppt/slides/slide1.xml".to_string(), SLIDE_XML.to_vec()),
            (
                "/ppt/slides/_rels/slide1.xml.rels".to_string(),
                rels.into_bytes(),
            ),
            (
                "/ppt/slideLayouts/slideLayout1.xml".to_string(),
                LAYOUT_XML.to_vec(),
            ),
        ]);
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        let ShapeContent::Image { media_id } = &slide.shapes[2].content else {
            panic!("third shape should be an image");
        };
        assert_eq!(media_id, &None);
        // Still a real slide, with one diagnostic about the reference
        assert_eq!(slide.title.as_deref(), Some("Quarterly Update"));
        assert_eq!(fixture.diag.len(), 1);
    }

    #[test]
    fn test_missing_part_yields_error_placeholder() {
        let fixture = Fixture::new();
        let slide = fixture.extract(4, "/ppt/slides/slide5.xml");

        assert_eq!(slide.index, 4);
        assert_eq!(slide.title.as_deref(), Some("Slide 5 (Error)"));
        assert!(slide.shapes.is_empty());
        assert_eq!(fixture.diag.len(), 1);
    }

    #[test]
    fn test_unparseable_slide_yields_error_placeholder() {
        let mut fixture = Fixture::new();
        fixture.container = Container::from_parts(vec![(
            "/ppt/slides/slide1.xml".to_string(),
            b"<p:sld><p:cSld><p:spTree><p:sp>".to_vec(),
        )]);
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        assert_eq!(slide.title.as_deref(), Some("Slide 1 (Error)"));
        assert!(!fixture.diag.is_empty());
    }

    #[test]
    fn test_synthetic_frames_stack_by_document_order() {
        let mut fixture = Fixture::new();
        let xml: &[u8] = br#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
          <p:sp><p:nvSpPr><p:cNvPr id="2" name="A"/></p:nvSpPr><p:spPr/><p:txBody><a:p><a:r><a:t>first</a:t></a:r></a:p></p:txBody></p:sp>
          <p:sp><p:nvSpPr><p:cNvPr id="3" name="B"/></p:nvSpPr><p:spPr/><p:txBody><a:p><a:r><a:t>second</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;
        fixture.container =
            Container::from_parts(vec![("/ppt/slides/slide1.xml".to_string(), xml.to_vec())]);
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        assert_eq!(slide.shapes[0].frame.y, 50.0);
        assert_eq!(slide.shapes[1].frame.y, 110.0);
        assert_eq!(slide.shapes[0].frame.x, 50.0);
        assert_eq!(slide.shapes[0].frame.width, 860.0);
    }

    #[test]
    fn test_notes_text_attached() {
        let mut fixture = Fixture::new();
        let rels = format!(
            r#"<Relationships><Relationship Id="rId3" Type="{}" Target="../notesSlides/notesSlide1.xml"/></Relationships>"#,
            relationship_type::NOTES_SLIDE
        );
        let notes: &[u8] = br#"<p:notes xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
          <p:sp><p:txBody><a:p><a:r><a:t>Mention the Q3 numbers</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:notes>"#;
        fixture.container = Container::from_parts(vec![
            ("/ppt/slides/slide1.xml".to_string(), SLIDE_XML.to_vec()),
            (
                "/ppt/slides/_rels/slide1.xml.rels".to_string(),
                rels.into_bytes(),
            ),
            (
                "/ppt/notesSlides/notesSlide1.xml".to_string(),
                notes.to_vec(),
            ),
        ]);
        let slide = fixture.extract(0, "/ppt/slides/slide1.xml");

        assert_eq!(slide.notes.as_deref(), Some("Mention the Q3 numbers"));
    }
}
