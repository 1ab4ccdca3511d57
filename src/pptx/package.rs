/// Package-level parsing: container to [`Presentation`].
///
/// The pipeline builds its read-only tables first (content types, package
/// relationships, themes, color map, placeholder styles, media), then
/// extracts all slides in parallel against them. Only an unusable archive
/// or the absence of any presentation part aborts; everything else
/// degrades into diagnostics.
use std::path::Path;

use rayon::prelude::*;

use crate::common::Result;
use crate::common::diag::{DiagKind, DiagSink};
use crate::common::error::Error;
use crate::opc::constants::{content_type, relationship_type};
use crate::opc::packuri::CONTENT_TYPES_URI;
use crate::opc::{Container, ContentTypes, PackURI, Relationships};
use crate::pptx::color::ColorContext;
use crate::pptx::colormap::ColorMap;
use crate::pptx::shape::attr_value;
use crate::pptx::media::{MediaAsset, MediaRegistry};
use crate::pptx::metadata::Metadata;
use crate::pptx::placeholder::PlaceholderTable;
use crate::pptx::slide::{ExtractCtx, extract_slide};
use crate::pptx::theme::{Theme, resolve_font_token};
use crate::presentation::{Presentation, Slide, SlideSize};

/// Parse a presentation from a file on disk.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Presentation> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    from_bytes(bytes, &filename)
}

/// Parse a presentation from an in-memory buffer.
pub fn from_bytes(bytes: Vec<u8>, filename: &str) -> Result<Presentation> {
    let container = Container::open(bytes)?;
    let diag = DiagSink::new();

    let content_types = load_content_types(&container, &diag);
    let package_root = PackURI::new("/")?;
    let package_rels = Relationships::for_part(&container, &package_root, &diag);

    let main_uri = locate_main_part(&container, &content_types, &package_rels)?;
    let (slide_rids, declared_size) = match container.part(&main_uri) {
        Some(xml) => parse_presentation_part(xml),
        None => {
            diag.warn(
                DiagKind::MissingPart,
                None,
                Some(main_uri.as_str()),
                "presentation part is listed but absent",
            );
            (Vec::new(), None)
        },
    };
    let slide_size = declared_size.unwrap_or_default();

    let main_rels = Relationships::for_part(&container, &main_uri, &diag);
    let sources = slide_sources(&container, &main_rels, &slide_rids, &diag);

    let themes = Theme::parse_all(&container, &diag);
    let color_map = container
        .parts_under("/ppt/slideMasters/")
        .first()
        .and_then(|uri| container.part(uri))
        .map(ColorMap::from_master_xml)
        .unwrap_or_default();
    let colors = ColorContext::new(&themes, &color_map);

    let placeholders = PlaceholderTable::build(&container, &colors, &diag);
    let media = build_media_registry(&container);

    let ctx = ExtractCtx {
        container: &container,
        colors: &colors,
        placeholders: &placeholders,
        media: &media,
        diag: &diag,
        slide_size,
    };

    // Slides share only the read-only tables above, so extraction is
    // embarrassingly parallel; collect keeps deck order.
    let slides: Vec<Slide> = sources
        .par_iter()
        .enumerate()
        .map(|(index, source)| match source {
            Some(uri) => extract_slide(&ctx, index, uri),
            None => Slide::error_placeholder(index),
        })
        .collect();

    let metadata = Metadata::extract(&container, &package_rels, &diag);
    let default_font = resolve_font_token(&themes, "+mn-lt").map(str::to_string);

    Ok(Presentation {
        filename: filename.to_string(),
        slide_count: slides.len(),
        slide_size,
        slides,
        media: media.into_assets(),
        metadata,
        default_font,
        diagnostics: diag.drain(),
    })
}

fn load_content_types(container: &Container, diag: &DiagSink) -> ContentTypes {
    let Ok(uri) = PackURI::new(CONTENT_TYPES_URI) else {
        return ContentTypes::default();
    };
    let Some(xml) = container.part(&uri) else {
        diag.warn(
            DiagKind::MissingPart,
            None,
            Some(CONTENT_TYPES_URI),
            "content types stream not found",
        );
        return ContentTypes::default();
    };
    match ContentTypes::from_xml(xml) {
        Ok(types) => types,
        Err(err) => {
            diag.warn(
                DiagKind::MalformedXml,
                None,
                Some(CONTENT_TYPES_URI),
                format!("unreadable content types: {err}"),
            );
            ContentTypes::default()
        },
    }
}

/// Locate the main presentation part.
///
/// Discovery order: the package relationship of office-document type, a
/// content-type override declaring a presentation main part, then the
/// conventional "/ppt/presentation.xml". A main part whose declared
/// content type belongs to another document family is rejected.
fn locate_main_part(
    container: &Container,
    content_types: &ContentTypes,
    package_rels: &Relationships,
) -> Result<PackURI> {
    if let Some(rel) = package_rels.first_of_type(relationship_type::OFFICE_DOCUMENT)
        && let Some(uri) = package_rels.target_of(rel.r_id())
    {
        return verify_main_part(content_types, uri);
    }

    if let Some(uri) = content_types
        .find_part_of_type(content_type::PML_PRESENTATION_MAIN)
        .or_else(|| content_types.find_part_of_type(content_type::PML_PRES_MACRO_MAIN))
    {
        return Ok(uri);
    }

    let conventional = PackURI::new("/ppt/presentation.xml").map_err(Error::Opc)?;
    if container.contains(&conventional) {
        return verify_main_part(content_types, conventional);
    }

    Err(Error::NotAPresentation(
        "no presentation part in package".to_string(),
    ))
}

fn verify_main_part(content_types: &ContentTypes, uri: PackURI) -> Result<PackURI> {
    match content_types.content_type_of(&uri) {
        Some(ct)
            if ct != content_type::PML_PRESENTATION_MAIN
                && ct != content_type::PML_PRES_MACRO_MAIN =>
        {
            Err(Error::NotAPresentation(format!(
                "main document part '{}' has content type '{}'",
                uri.as_str(),
                ct
            )))
        },
        _ => Ok(uri),
    }
}

/// Read the slide id list and canvas size out of the presentation part.
///
/// The scan is lenient: damage stops it early with whatever was gathered,
/// since the slide list can still be reconstructed from part names.
fn parse_presentation_part(xml: &[u8]) -> (Vec<String>, Option<SlideSize>) {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut rids = Vec::new();
    let mut size = None;
    let mut in_slide_list = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"sldIdLst" => in_slide_list = true,
                b"sldId" if in_slide_list => {
                    if let Some(rid) = attr_value(e, b"r:id") {
                        rids.push(rid);
                    }
                },
                b"sldSz" => {
                    let cx = attr_value(e, b"cx")
                        .and_then(|v| atoi_simd::parse::<i64>(v.as_bytes()).ok());
                    let cy = attr_value(e, b"cy")
                        .and_then(|v| atoi_simd::parse::<i64>(v.as_bytes()).ok());
                    if let (Some(width_emu), Some(height_emu)) = (cx, cy)
                        && width_emu > 0
                        && height_emu > 0
                    {
                        size = Some(SlideSize {
                            width_emu,
                            height_emu,
                        });
                    }
                },
                _ => {},
            },
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"sldIdLst" => {
                in_slide_list = false;
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    (rids, size)
}

/// Resolve the declared slide ids to part names, in deck order.
///
/// A dangling id keeps its position as `None` so the deck length is
/// preserved. An empty id list falls back to the slide parts present in
/// the package, in numeric part order.
fn slide_sources(
    container: &Container,
    main_rels: &Relationships,
    slide_rids: &[String],
    diag: &DiagSink,
) -> Vec<Option<PackURI>> {
    if slide_rids.is_empty() {
        let found = container.parts_under("/ppt/slides/");
        if !found.is_empty() {
            diag.info(
                DiagKind::MissingPart,
                None,
                None,
                format!(
                    "presentation part declares no slides; using {} slide parts in package order",
                    found.len()
                ),
            );
        }
        return found.into_iter().map(Some).collect();
    }

    slide_rids
        .iter()
        .enumerate()
        .map(|(index, rid)| {
            let target = main_rels.target_of(rid);
            if target.is_none() {
                diag.warn(
                    DiagKind::MissingPart,
                    Some(index),
                    None,
                    format!("slide relationship '{rid}' not found"),
                );
            }
            target
        })
        .collect()
}

/// Copy every part under the media directory into the shared media table.
fn build_media_registry(container: &Container) -> MediaRegistry {
    let mut registry = MediaRegistry::default();
    for uri in container.parts_under("/ppt/media/") {
        if let Some(bytes) = container.part(&uri) {
            registry.insert(MediaAsset::new(&uri, bytes.to_vec()));
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::OpcError;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/slides/slide1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
  <Override PartName="/ppt/slides/slide2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
  <Override PartName="/ppt/slides/slide3.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

    const PRESENTATION: &str = r#"<?xml version="1.0"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId4"/></p:sldMasterIdLst>
  <p:sldIdLst>
    <p:sldId id="256" r:id="rId1"/>
    <p:sldId id="257" r:id="rId2"/>
    <p:sldId id="258" r:id="rId3"/>
  </p:sldIdLst>
  <p:sldSz cx="9144000" cy="6858000"/>
</p:presentation>"#;

    const SLIDE1: &str = r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
      <p:spPr/>
      <p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US"/><a:t>Roadmap Review</a:t></a:r></a:p></p:txBody>
    </p:sp>
    <p:pic>
      <p:nvPicPr><p:cNvPr id="5" name="Chart"/></p:nvPicPr>
      <p:blipFill><a:blip r:embed="rId2"/></p:blipFill>
      <p:spPr><a:xfrm><a:off x="457200" y="457200"/><a:ext cx="1828800" cy="1828800"/></a:xfrm></p:spPr>
    </p:pic>
  </p:spTree></p:cSld>
</p:sld>"#;

    const SLIDE2: &str = r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Content 1"/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>
      <p:spPr/>
      <p:txBody><a:bodyPr/><a:p><a:r><a:t>Detailed items</a:t></a:r></a:p></p:txBody>
    </p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    const SLIDE3: &str = r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree/></p:cSld>
</p:sld>"#;

    const LAYOUT: &str = r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
      <p:spPr><a:xfrm><a:off x="685800" y="365760"/><a:ext cx="7772400" cy="1143000"/></a:xfrm></p:spPr>
      <p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></a:lstStyle><a:p/></p:txBody>
    </p:sp>
  </p:spTree></p:cSld>
</p:sldLayout>"#;

    const MASTER: &str = r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld>
    <p:bg><p:bgPr><a:solidFill><a:srgbClr val="1F4E79"/></a:solidFill></p:bgPr></p:bg>
    <p:spTree/>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
</p:sldMaster>"#;

    const THEME: &str = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office">
  <a:themeElements><a:clrScheme name="Office">
    <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
    <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
    <a:dk2><a:srgbClr val="44546A"/></a:dk2>
    <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
    <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
    <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
    <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
    <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
    <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
    <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
    <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
    <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
  </a:clrScheme>
  <a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/></a:minorFont></a:fontScheme>
  </a:themeElements>
</a:theme>"#;

    const CORE: &str = r#"<?xml version="1.0"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/">
  <dc:title>Roadmap Deck</dc:title>
  <dc:creator>Product Team</dc:creator>
  <dcterms:created>2024-01-15T10:30:00Z</dcterms:created>
</cp:coreProperties>"#;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n0000000000";

    fn package_rels() -> String {
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="ppt/presentation.xml"/>
  <Relationship Id="rId2" Type="{}" Target="docProps/core.xml"/>
</Relationships>"#,
            relationship_type::OFFICE_DOCUMENT,
            relationship_type::CORE_PROPERTIES,
        )
    }

    fn presentation_rels() -> String {
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{slide}" Target="slides/slide1.xml"/>
  <Relationship Id="rId2" Type="{slide}" Target="slides/slide2.xml"/>
  <Relationship Id="rId3" Type="{slide}" Target="slides/slide3.xml"/>
  <Relationship Id="rId4" Type="{master}" Target="slideMasters/slideMaster1.xml"/>
</Relationships>"#,
            slide = relationship_type::SLIDE,
            master = relationship_type::SLIDE_MASTER,
        )
    }

    fn slide1_rels() -> String {
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="{}" Target="../media/image1.png"/>
</Relationships>"#,
            relationship_type::SLIDE_LAYOUT,
            relationship_type::IMAGE,
        )
    }

    fn simple_slide_rels() -> String {
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/>
</Relationships>"#,
            relationship_type::SLIDE_LAYOUT,
        )
    }

    fn layout_rels() -> String {
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#,
            relationship_type::SLIDE_MASTER,
        )
    }

    fn master_rels() -> String {
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{}" Target="../theme/theme1.xml"/>
</Relationships>"#,
            relationship_type::THEME,
        )
    }

    fn deck_parts() -> Vec<(String, Vec<u8>)> {
        vec![
            ("[Content_Types].xml".into(), CONTENT_TYPES.into()),
            ("_rels/.rels".into(), package_rels().into_bytes()),
            ("ppt/presentation.xml".into(), PRESENTATION.into()),
            (
                "ppt/_rels/presentation.xml.rels".into(),
                presentation_rels().into_bytes(),
            ),
            ("ppt/slides/slide1.xml".into(), SLIDE1.into()),
            (
                "ppt/slides/_rels/slide1.xml.rels".into(),
                slide1_rels().into_bytes(),
            ),
            ("ppt/slides/slide2.xml".into(), SLIDE2.into()),
            (
                "ppt/slides/_rels/slide2.xml.rels".into(),
                simple_slide_rels().into_bytes(),
            ),
            ("ppt/slides/slide3.xml".into(), SLIDE3.into()),
            ("ppt/slideLayouts/slideLayout1.xml".into(), LAYOUT.into()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
                layout_rels().into_bytes(),
            ),
            ("ppt/slideMasters/slideMaster1.xml".into(), MASTER.into()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
                master_rels().into_bytes(),
            ),
            ("ppt/theme/theme1.xml".into(), THEME.into()),
            ("ppt/media/image1.png".into(), PNG.to_vec()),
            ("docProps/core.xml".into(), CORE.into()),
        ]
    }

    fn zip_parts(parts: &[(String, Vec<u8>)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default();
        for (name, data) in parts {
            writer.start_file(name.as_str(), options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_parse_full_package() {
        let pres = from_bytes(zip_parts(&deck_parts()), "roadmap.pptx").unwrap();

        assert_eq!(pres.filename, "roadmap.pptx");
        assert_eq!(pres.slide_count, 3);
        assert_eq!(pres.slides.len(), 3);
        for (i, slide) in pres.slides.iter().enumerate() {
            assert_eq!(slide.index, i);
        }
        assert_eq!(pres.slides[0].title.as_deref(), Some("Roadmap Review"));
        assert_eq!(pres.slides[1].title.as_deref(), Some("Detailed items"));
        assert_eq!(pres.slide_size.width_px(), 960.0);
        assert_eq!(pres.slide_size.height_px(), 720.0);
        assert_eq!(pres.media.len(), 1);
        assert_eq!(pres.media[0].id, "image1.png");
        assert_eq!(pres.media[0].part, "/ppt/media/image1.png");
        assert_eq!(pres.media[0].mime, "image/png");
        assert_eq!(pres.metadata.title.as_deref(), Some("Roadmap Deck"));
        assert_eq!(pres.metadata.author.as_deref(), Some("Product Team"));
        assert_eq!(pres.default_font.as_deref(), Some("Calibri"));
        assert!(pres.diagnostics.is_empty(), "{:?}", pres.diagnostics);
    }

    #[test]
    fn test_title_inherits_layout_font_size() {
        let pres = from_bytes(zip_parts(&deck_parts()), "deck.pptx").unwrap();

        let slide = &pres.slides[0];
        let crate::presentation::ShapeContent::Text(body) = &slide.shapes[0].content else {
            panic!("expected the title shape to carry text");
        };
        assert_eq!(body.paragraphs[0].runs[0].size, Some(44.0));
        // Geometry likewise comes from the layout placeholder
        assert_eq!(slide.shapes[0].frame.y, 38.4);
    }

    #[test]
    fn test_background_falls_through_to_master() {
        let pres = from_bytes(zip_parts(&deck_parts()), "deck.pptx").unwrap();
        assert_eq!(pres.slides[0].background.as_deref(), Some("#1F4E79"));
    }

    #[test]
    fn test_deleted_slide_part_keeps_deck_length() {
        let parts: Vec<_> = deck_parts()
            .into_iter()
            .filter(|(name, _)| name != "ppt/slides/slide2.xml")
            .collect();
        let pres = from_bytes(zip_parts(&parts), "deck.pptx").unwrap();

        assert_eq!(pres.slide_count, 3);
        assert_eq!(pres.slides[1].title.as_deref(), Some("Slide 2 (Error)"));
        assert!(pres.slides[1].shapes.is_empty());
        // Neighbors are unaffected
        assert_eq!(pres.slides[0].title.as_deref(), Some("Roadmap Review"));
        assert!(!pres.diagnostics.is_empty());
    }

    #[test]
    fn test_dangling_slide_relationship_keeps_position() {
        let mut parts = deck_parts();
        for (name, data) in &mut parts {
            if name == "ppt/_rels/presentation.xml.rels" {
                *data = format!(
                    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{slide}" Target="slides/slide1.xml"/>
  <Relationship Id="rId3" Type="{slide}" Target="slides/slide3.xml"/>
</Relationships>"#,
                    slide = relationship_type::SLIDE,
                )
                .into_bytes();
            }
        }
        let pres = from_bytes(zip_parts(&parts), "deck.pptx").unwrap();

        assert_eq!(pres.slide_count, 3);
        assert_eq!(pres.slides[1].title.as_deref(), Some("Slide 2 (Error)"));
        assert_eq!(pres.slides[2].title, None);
    }

    #[test]
    fn test_missing_id_list_falls_back_to_part_order() {
        let mut parts = deck_parts();
        for (name, data) in &mut parts {
            if name == "ppt/presentation.xml" {
                *data = br#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#.to_vec();
            }
        }
        let pres = from_bytes(zip_parts(&parts), "deck.pptx").unwrap();

        assert_eq!(pres.slide_count, 3);
        assert_eq!(pres.slides[0].title.as_deref(), Some("Roadmap Review"));
        assert!(
            pres.diagnostics
                .iter()
                .any(|d| d.message.contains("package order"))
        );
    }

    #[test]
    fn test_rejects_word_document_package() {
        let bytes = zip_parts(&[
            (
                "[Content_Types].xml".to_string(),
                br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#
                    .to_vec(),
            ),
            (
                "_rels/.rels".to_string(),
                format!(
                    r#"<Relationships><Relationship Id="rId1" Type="{}" Target="word/document.xml"/></Relationships>"#,
                    relationship_type::OFFICE_DOCUMENT
                )
                .into_bytes(),
            ),
            ("word/document.xml".to_string(), b"<w:document/>".to_vec()),
        ]);

        assert!(matches!(
            from_bytes(bytes, "report.docx"),
            Err(Error::NotAPresentation(_))
        ));
    }

    #[test]
    fn test_empty_archive_is_not_a_presentation() {
        let bytes = zip_parts(&[("README.txt".to_string(), b"hello".to_vec())]);
        assert!(matches!(
            from_bytes(bytes, "x.zip"),
            Err(Error::NotAPresentation(_))
        ));
    }

    #[test]
    fn test_corrupt_archive_is_fatal() {
        let result = from_bytes(b"definitely not a zip".to_vec(), "x.pptx");
        assert!(matches!(
            result,
            Err(Error::Opc(OpcError::CorruptArchive(_)))
        ));
    }
}
