/// Background color extraction from slide-like parts.
///
/// A `p:bg` block can declare its color three ways: a direct solid fill, a
/// gradient (flattened to its first stop), or a `bgRef` pointing into the
/// theme's scheme. Picture backgrounds carry no color and yield nothing.
use crate::pptx::color::ColorRef;
use crate::pptx::shape::attr_value;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Find the background color reference of a slide, layout, or master part.
///
/// Returns `None` when the part declares no background or only an
/// unsupported fill type.
pub fn parse_background(xml: &[u8]) -> Option<ColorRef> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut in_bg = false;
    let mut in_gradient = false;
    let mut gradient_stops = 0usize;
    let mut color: Option<ColorRef> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                match e.local_name().as_ref() {
                    b"bg" => in_bg = true,
                    b"gradFill" if in_bg => in_gradient = true,
                    b"gs" if in_gradient => gradient_stops += 1,
                    b"srgbClr" if in_bg && color.is_none() => {
                        if let Some(value) = attr_value(e, b"val") {
                            color = Some(ColorRef::rgb(&value));
                        }
                    },
                    b"schemeClr" if in_bg && color.is_none() => {
                        if let Some(value) = attr_value(e, b"val") {
                            color = Some(ColorRef::scheme(&value));
                        }
                    },
                    _ => {},
                }
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"gradFill" => {
                    if gradient_stops > 1 {
                        log::debug!(
                            "background gradient flattened to the first of {gradient_stops} stops"
                        );
                    }
                    in_gradient = false;
                },
                // Nothing after the bg block can be a background color
                b"bg" => break,
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {},
        }
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_background() {
        let xml = br#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
          <p:cSld>
            <p:bg><p:bgPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></p:bgPr></p:bg>
            <p:spTree/>
          </p:cSld>
        </p:sld>"#;
        assert_eq!(parse_background(xml), Some(ColorRef::rgb("FF0000")));
    }

    #[test]
    fn test_gradient_takes_first_stop() {
        let xml = br#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:bg><p:bgPr>
          <a:gradFill>
            <a:gsLst>
              <a:gs pos="0"><a:schemeClr val="accent1"/></a:gs>
              <a:gs pos="100000"><a:srgbClr val="FFFFFF"/></a:gs>
            </a:gsLst>
            <a:lin ang="5400000"/>
          </a:gradFill>
        </p:bgPr></p:bg><p:spTree/></p:cSld></p:sld>"#;
        assert_eq!(parse_background(xml), Some(ColorRef::scheme("accent1")));
    }

    #[test]
    fn test_bg_ref_scheme_color() {
        let xml = br#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld>
          <p:bg><p:bgRef idx="1001"><a:schemeClr val="bg2"/></p:bgRef></p:bg>
          <p:spTree/>
        </p:cSld></p:sld>"#;
        assert_eq!(parse_background(xml), Some(ColorRef::scheme("bg2")));
    }

    #[test]
    fn test_no_background_block() {
        let xml = br#"<p:sld xmlns:p="p"><p:cSld><p:spTree>
          <p:sp><p:spPr><a:solidFill xmlns:a="a"><a:srgbClr val="00FF00"/></a:solidFill></p:spPr></p:sp>
        </p:spTree></p:cSld></p:sld>"#;
        assert_eq!(parse_background(xml), None);
    }

    #[test]
    fn test_picture_background_yields_nothing() {
        let xml = br#"<p:sld xmlns:a="a" xmlns:p="p" xmlns:r="r"><p:cSld>
          <p:bg><p:bgPr><a:blipFill><a:blip r:embed="rId7"/></a:blipFill></p:bgPr></p:bg>
          <p:spTree/>
        </p:cSld></p:sld>"#;
        assert_eq!(parse_background(xml), None);
    }
}
