/// Core document properties.
///
/// Core properties are stored in the "docProps/core.xml" part and follow
/// the Dublin Core metadata standard with OPC-specific extensions.
use crate::common::diag::{DiagKind, DiagSink};
use crate::opc::constants::relationship_type as rt;
use crate::opc::container::Container;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use crate::opc::rel::Relationships;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;

/// Presentation metadata extracted from the core properties part.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document author/creator
    pub author: Option<String>,
    /// Keywords associated with the document
    pub keywords: Option<String>,
    /// Last person to modify the document
    pub last_modified_by: Option<String>,
    /// Creation date
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Locate and parse the core properties part.
    ///
    /// The package relationships are consulted first, then the standard
    /// "/docProps/core.xml" location. A package without core properties
    /// yields empty metadata; an unreadable part additionally reports a
    /// diagnostic.
    pub fn extract(container: &Container, package_rels: &Relationships, diag: &DiagSink) -> Self {
        let uri = package_rels
            .iter()
            .find(|rel| rel.reltype() == rt::CORE_PROPERTIES)
            .and_then(|rel| rel.target_partname().ok())
            .or_else(|| PackURI::new("/docProps/core.xml").ok());

        let Some(uri) = uri else {
            return Self::default();
        };
        let Some(xml) = container.part(&uri) else {
            return Self::default();
        };

        match Self::parse(xml) {
            Ok(metadata) => metadata,
            Err(err) => {
                diag.warn(
                    DiagKind::MalformedXml,
                    None,
                    Some(uri.as_str()),
                    format!("unreadable core properties: {}", err),
                );
                Self::default()
            },
        }
    }

    /// Parse core properties XML.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut metadata = Self::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"dc:title" | b"cp:title" => {
                        metadata.title = read_text_element(&mut reader)?;
                    },
                    b"dc:subject" | b"cp:subject" => {
                        metadata.subject = read_text_element(&mut reader)?;
                    },
                    b"dc:creator" | b"cp:creator" | b"dc:author" | b"cp:author" => {
                        metadata.author = read_text_element(&mut reader)?;
                    },
                    b"cp:keywords" => {
                        metadata.keywords = read_text_element(&mut reader)?;
                    },
                    b"cp:lastModifiedBy" => {
                        metadata.last_modified_by = read_text_element(&mut reader)?;
                    },
                    b"dcterms:created" | b"cp:created" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.created = parse_datetime(&text);
                        }
                    },
                    b"dcterms:modified" | b"cp:modified" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            metadata.modified = parse_datetime(&text);
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::malformed("core properties", e)),
                _ => {},
            }
        }

        Ok(metadata)
    }
}

/// Read the text content of the current element.
fn read_text_element(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                let unescaped = e
                    .decode()
                    .map_err(|e| OpcError::malformed("core properties", e))?;
                text.push_str(&unescaped);
            },
            Ok(Event::End(_)) | Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::malformed("core properties", e)),
            _ => {},
        }
    }

    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Parse an ISO 8601 datetime string.
///
/// Supports formats like:
/// - 2023-10-10T14:30:00Z
/// - 2023-10-10T14:30:00.1234567Z
/// - 2023-10-10T14:30:00
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, format) {
            return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    None
}
