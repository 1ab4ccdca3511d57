/// Content type discovery from `[Content_Types].xml`.
///
/// Implements the OPC lookup algorithm: an `Override` for the exact part
/// name wins, otherwise the `Default` registered for the part's extension
/// applies. Extensions compare case-insensitively.
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Content type map for looking up content types by part name or extension.
#[derive(Debug, Default)]
pub struct ContentTypes {
    /// Maps lowercase file extensions to default content types
    defaults: HashMap<String, String>,

    /// Maps specific partnames to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Parse content types from `[Content_Types].xml`.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut types = Self::default();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match e.local_name().as_ref()
                {
                    b"Default" => {
                        let mut extension = None;
                        let mut content_type = None;
                        for attr in e.attributes().flatten() {
                            let value = attr
                                .unescape_value()
                                .map_err(|e| OpcError::malformed("content types", e))?;
                            match attr.key.as_ref() {
                                b"Extension" => extension = Some(value.into_owned()),
                                b"ContentType" => content_type = Some(value.into_owned()),
                                _ => {},
                            }
                        }
                        if let (Some(ext), Some(ct)) = (extension, content_type) {
                            types.defaults.insert(ext.to_ascii_lowercase(), ct);
                        }
                    },
                    b"Override" => {
                        let mut partname = None;
                        let mut content_type = None;
                        for attr in e.attributes().flatten() {
                            let value = attr
                                .unescape_value()
                                .map_err(|e| OpcError::malformed("content types", e))?;
                            match attr.key.as_ref() {
                                b"PartName" => partname = Some(value.into_owned()),
                                b"ContentType" => content_type = Some(value.into_owned()),
                                _ => {},
                            }
                        }
                        if let (Some(pn), Some(ct)) = (partname, content_type) {
                            types.overrides.insert(pn, ct);
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::malformed("content types", e)),
                _ => {},
            }
        }

        Ok(types)
    }

    /// Get the content type for a part, override first, extension default
    /// second.
    pub fn content_type_of(&self, uri: &PackURI) -> Option<&str> {
        if let Some(ct) = self.overrides.get(uri.as_str()) {
            return Some(ct);
        }
        self.defaults
            .get(&uri.ext().to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Find the first part declared with the given content type.
    ///
    /// Only `Override` entries are searched; ties resolve to the smallest
    /// part name so lookups are stable across loads.
    pub fn find_part_of_type(&self, content_type: &str) -> Option<PackURI> {
        self.overrides
            .iter()
            .filter(|(_, ct)| ct.as_str() == content_type)
            .map(|(pn, _)| pn)
            .min()
            .and_then(|pn| PackURI::new(pn).ok())
    }
}
