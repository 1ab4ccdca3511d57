/// Provides the PackURI value type for addressing parts within a container.
///
/// A PackURI is a part name in the Open Packaging Conventions sense: it
/// always begins with a forward slash and uses forward slashes as path
/// separators, regardless of platform.
use crate::opc::error::{OpcError, Result};

/// A part name within a presentation container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/ppt/slides/slide1.xml")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string, which must begin with a slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(OpcError::InvalidPartName(uri));
        }
        Ok(PackURI { uri })
    }

    /// Resolve a relative reference against a base directory URI.
    ///
    /// Relationship targets are written relative to the source part's
    /// directory, so "../slideLayouts/slideLayout1.xml" against base
    /// "/ppt/slides" yields "/ppt/slideLayouts/slideLayout1.xml".
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        let mut segments: Vec<&str> = Vec::new();
        for seg in base_uri.split('/').chain(relative_ref.split('/')) {
            match seg {
                "" | "." => {},
                ".." => {
                    // Never resolve above the package root
                    segments.pop();
                },
                _ => segments.push(seg),
            }
        }

        let mut uri = String::with_capacity(base_uri.len() + relative_ref.len() + 1);
        for seg in &segments {
            uri.push('/');
            uri.push_str(seg);
        }
        if uri.is_empty() {
            uri.push('/');
        }
        Self::new(uri)
    }

    /// The directory portion, e.g. "/ppt/slides" for "/ppt/slides/slide1.xml".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// The filename portion, e.g. "slide1.xml" for "/ppt/slides/slide1.xml".
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// The extension without its leading period, e.g. "xml".
    pub fn ext(&self) -> &str {
        match self.filename().rfind('.') {
            Some(pos) => &self.filename()[pos + 1..],
            None => "",
        }
    }

    /// The numeric suffix for tuple part names, or `None` for singletons.
    ///
    /// Returns 21 for "/ppt/slides/slide21.xml" and `None` for
    /// "/ppt/presentation.xml".
    pub fn idx(&self) -> Option<u32> {
        let stem = match self.filename().rfind('.') {
            Some(pos) => &self.filename()[..pos],
            None => self.filename(),
        };
        let digits = stem.trim_end_matches(|c: char| !c.is_ascii_digit());
        let start = digits
            .rfind(|c: char| !c.is_ascii_digit())
            .map_or(0, |p| p + 1);
        if start == 0 || start == digits.len() {
            // All digits would be a bare number, no digits is a singleton
            return None;
        }
        atoi_simd::parse::<u32>(digits[start..].as_bytes()).ok()
    }

    /// The URI with leading slash stripped, matching the archive member name.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// The conventional sibling relationships part for this part.
    ///
    /// "/ppt/slides/slide1.xml" maps to "/ppt/slides/_rels/slide1.xml.rels".
    pub fn rels_uri(&self) -> PackURI {
        let base = self.base_uri();
        let uri = if base == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base, self.filename())
        };
        PackURI { uri }
    }

    /// The full URI string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The URI for the [Content_Types].xml stream.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// The URI of the package-level relationships part.
pub const PACKAGE_RELS_URI: &str = "/_rels/.rels";
