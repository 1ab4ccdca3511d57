/// Theme parts for presentations.
///
/// Corresponds to `/ppt/theme/themeN.xml` in the package. Only the pieces
/// the extraction pipeline consumes are parsed: the theme name, the twelve
/// color scheme slots, and the major/minor latin typefaces.
use crate::common::diag::{DiagKind, DiagSink};
use crate::opc::container::Container;
use crate::opc::error::{OpcError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Color information from a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColor {
    /// Color name (e.g., "accent1", "dk1", "lt1")
    pub name: String,
    /// RGB color value if available (format: "RRGGBB")
    pub rgb: Option<String>,
    /// System color if available
    pub system_color: Option<String>,
}

/// Font information from a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFont {
    /// Font typeface name
    pub typeface: String,
    /// Font character set
    pub charset: Option<String>,
}

/// Theme information extracted from a theme part.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name
    pub name: String,
    /// Part name this theme was loaded from
    pub part: String,
    /// Major (heading) font
    pub major_font: Option<ThemeFont>,
    /// Minor (body) font
    pub minor_font: Option<ThemeFont>,
    /// Color scheme colors
    pub colors: Vec<ThemeColor>,
}

impl Theme {
    /// Look up the effective RGB of a scheme slot ("dk1", "accent3", ...).
    ///
    /// System colors without a cached `lastClr` fall back to the fixed
    /// values for the two slots that occur in practice.
    pub fn slot_rgb(&self, slot: &str) -> Option<&str> {
        let color = self.colors.iter().find(|c| c.name == slot)?;
        if let Some(rgb) = &color.rgb {
            return Some(rgb);
        }
        match color.system_color.as_deref() {
            Some("window") => Some("FFFFFF"),
            Some("windowText") => Some("000000"),
            _ => None,
        }
    }

    /// Parse a theme part.
    pub fn parse(xml: &[u8], part: &str) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut theme_name = String::new();
        let mut major_font: Option<ThemeFont> = None;
        let mut minor_font: Option<ThemeFont> = None;
        let mut colors = Vec::new();

        let mut in_major_font = false;
        let mut in_minor_font = false;
        let mut in_color_scheme = false;
        let mut current_color_name = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let tag_name = e.local_name();

                    match tag_name.as_ref() {
                        b"theme" => {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"name" {
                                    theme_name = std::str::from_utf8(&attr.value)
                                        .map(|s| s.to_string())
                                        .unwrap_or_default();
                                }
                            }
                        },
                        b"clrScheme" => {
                            in_color_scheme = true;
                        },
                        b"majorFont" => {
                            in_major_font = true;
                        },
                        b"minorFont" => {
                            in_minor_font = true;
                        },
                        b"latin" if in_major_font || in_minor_font => {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"typeface" {
                                    let typeface = std::str::from_utf8(&attr.value)
                                        .map(|s| s.to_string())
                                        .unwrap_or_default();

                                    let font = ThemeFont {
                                        typeface,
                                        charset: None,
                                    };

                                    if in_major_font {
                                        major_font = Some(font);
                                    } else if in_minor_font {
                                        minor_font = Some(font);
                                    }
                                }
                            }
                        },
                        // Color slots in the color scheme
                        b"dk1" | b"lt1" | b"dk2" | b"lt2" | b"accent1" | b"accent2"
                        | b"accent3" | b"accent4" | b"accent5" | b"accent6" | b"hlink"
                        | b"folHlink"
                            if in_color_scheme =>
                        {
                            current_color_name = std::str::from_utf8(tag_name.as_ref())
                                .unwrap_or("")
                                .to_string();
                        },
                        b"srgbClr" if in_color_scheme && !current_color_name.is_empty() => {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"val" {
                                    let rgb = std::str::from_utf8(&attr.value)
                                        .map(|s| s.to_ascii_uppercase())
                                        .ok();

                                    colors.push(ThemeColor {
                                        name: current_color_name.clone(),
                                        rgb,
                                        system_color: None,
                                    });
                                    current_color_name.clear();
                                }
                            }
                        },
                        b"sysClr" if in_color_scheme && !current_color_name.is_empty() => {
                            let mut sys_color = None;
                            let mut last_clr = None;
                            for attr in e.attributes().flatten() {
                                match attr.key.as_ref() {
                                    b"val" => {
                                        sys_color = std::str::from_utf8(&attr.value)
                                            .map(|s| s.to_string())
                                            .ok();
                                    },
                                    b"lastClr" => {
                                        last_clr = std::str::from_utf8(&attr.value)
                                            .map(|s| s.to_ascii_uppercase())
                                            .ok();
                                    },
                                    _ => {},
                                }
                            }
                            colors.push(ThemeColor {
                                name: current_color_name.clone(),
                                rgb: last_clr,
                                system_color: sys_color,
                            });
                            current_color_name.clear();
                        },
                        _ => {},
                    }
                },
                Ok(Event::End(e)) => {
                    let tag_name = e.local_name();
                    match tag_name.as_ref() {
                        b"clrScheme" => in_color_scheme = false,
                        b"majorFont" => in_major_font = false,
                        b"minorFont" => in_minor_font = false,
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::malformed(part, e)),
                _ => {},
            }
        }

        Ok(Theme {
            name: theme_name,
            part: part.to_string(),
            major_font,
            minor_font,
            colors,
        })
    }

    /// Load every theme part in the container, in partname order.
    ///
    /// An unreadable theme is reported and skipped; color resolution then
    /// continues with the remaining themes or the built-in palette.
    pub fn parse_all(container: &Container, diag: &DiagSink) -> Vec<Theme> {
        let mut themes = Vec::new();
        for uri in container.parts_under("/ppt/theme/") {
            let Some(xml) = container.part(&uri) else {
                continue;
            };
            match Theme::parse(xml, uri.as_str()) {
                Ok(theme) => themes.push(theme),
                Err(err) => diag.warn(
                    DiagKind::MalformedXml,
                    None,
                    Some(uri.as_str()),
                    format!("unreadable theme: {}", err),
                ),
            }
        }
        themes
    }
}

/// Resolve a theme font token ("+mj-lt" or "+mn-lt") to a typeface.
///
/// Anything else is returned as-is, so plain typeface names flow through
/// unchanged.
pub fn resolve_font_token<'a>(themes: &'a [Theme], token: &'a str) -> Option<&'a str> {
    let font = match token {
        "+mj-lt" => themes.iter().find_map(|t| t.major_font.as_ref()),
        "+mn-lt" => themes.iter().find_map(|t| t.minor_font.as_ref()),
        _ => return Some(token),
    };
    font.map(|f| f.typeface.as_str())
}
