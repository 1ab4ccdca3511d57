/// Color references and their resolution against the theme chain.
///
/// Shape and text fills carry either a literal sRGB value or a symbolic
/// scheme reference ("accent1", "bg1"). Symbolic references resolve through
/// the color map of the governing master, then the theme's color scheme,
/// and finally a built-in fallback palette, so a presentation with a
/// damaged or absent theme still produces plausible colors.
use crate::pptx::colormap::ColorMap;
use crate::pptx::theme::Theme;

/// Built-in fallback palette matching the stock "Office" theme.
static OFFICE_PALETTE: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "dk1" => "000000",
    "lt1" => "FFFFFF",
    "dk2" => "44546A",
    "lt2" => "E7E6E6",
    "accent1" => "4472C4",
    "accent2" => "ED7D31",
    "accent3" => "A5A5A5",
    "accent4" => "FFC000",
    "accent5" => "5B9BD5",
    "accent6" => "70AD47",
    "hlink" => "0563C1",
    "folHlink" => "954F72",
};

/// A color as written in the XML, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRef {
    /// Literal sRGB value, six uppercase hex digits ("1F4E79")
    Rgb(String),

    /// Symbolic scheme reference ("accent1", "bg1", "tx2")
    Scheme(String),
}

impl ColorRef {
    /// Build a literal reference, normalizing hex digits to uppercase.
    pub fn rgb(value: &str) -> Self {
        Self::Rgb(value.trim_start_matches('#').to_ascii_uppercase())
    }

    /// Build a symbolic scheme reference.
    pub fn scheme(name: &str) -> Self {
        Self::Scheme(name.to_string())
    }
}

/// Resolution context carrying the loaded themes and the master's color map.
pub struct ColorContext<'a> {
    themes: &'a [Theme],
    map: &'a ColorMap,
}

impl<'a> ColorContext<'a> {
    pub fn new(themes: &'a [Theme], map: &'a ColorMap) -> Self {
        Self { themes, map }
    }

    /// The themes this context resolves against, in precedence order.
    #[inline]
    pub fn themes(&self) -> &'a [Theme] {
        self.themes
    }

    /// Resolve a reference to six uppercase hex digits ("RRGGBB").
    ///
    /// Literal values pass through untouched. Scheme names are translated
    /// through the color map first ("bg1" becomes "lt1" under the standard
    /// mapping), then looked up in theme order, falling back to the stock
    /// palette when no theme defines the slot.
    pub fn resolve(&self, color: &ColorRef) -> Option<String> {
        match color {
            ColorRef::Rgb(value) => Some(value.clone()),
            ColorRef::Scheme(name) => {
                let slot = self.map.translate(name);
                for theme in self.themes {
                    if let Some(rgb) = theme.slot_rgb(slot) {
                        return Some(rgb.to_string());
                    }
                }
                OFFICE_PALETTE.get(slot).map(|rgb| (*rgb).to_string())
            },
        }
    }

    /// Resolve a reference to a CSS hex string ("#RRGGBB").
    pub fn resolve_css(&self, color: &ColorRef) -> Option<String> {
        self.resolve(color).map(|rgb| format!("#{rgb}"))
    }
}
