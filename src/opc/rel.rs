/// Relationship parsing for container parts.
///
/// Every part may carry a sibling `.rels` part mapping relationship ids
/// (`rId1`, `rId2`, ...) to target parts or external URLs. Targets are
/// written relative to the source part's directory and are normalized to
/// absolute pack URIs here.
use crate::common::diag::{DiagKind, DiagSink};
use crate::opc::container::Container;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a relative part reference or external URL
    target_ref: String,

    /// Base URI for resolving relative references
    base_uri: String,

    /// Whether this relationship points outside the package
    is_external: bool,
}

impl Relationship {
    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type URI.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the raw target reference.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Get the absolute target part name for internal relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidPartName(format!(
                "external target '{}' has no part name",
                self.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref)
    }
}

/// Collection of relationships loaded from one `.rels` part.
#[derive(Debug, Default)]
pub struct Relationships {
    /// Base URI of the source part's directory
    base_uri: String,

    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty collection rooted at the given base URI.
    pub fn empty(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: HashMap::new(),
        }
    }

    /// Parse a `.rels` XML stream.
    ///
    /// `base_uri` is the directory of the *source* part (not of the `.rels`
    /// part itself), so relative targets resolve against the right place.
    pub fn parse(xml: &[u8], base_uri: &str) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = HashMap::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    if e.local_name().as_ref() != b"Relationship" {
                        continue;
                    }
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut is_external = false;
                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map_err(|e| OpcError::malformed("relationships", e))?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(value.into_owned()),
                            b"Type" => reltype = Some(value.into_owned()),
                            b"Target" => target_ref = Some(value.into_owned()),
                            b"TargetMode" => is_external = value.as_ref() == "External",
                            _ => {},
                        }
                    }
                    if let (Some(r_id), Some(reltype), Some(target_ref)) =
                        (r_id, reltype, target_ref)
                    {
                        rels.insert(
                            r_id.clone(),
                            Relationship {
                                r_id,
                                reltype,
                                target_ref,
                                base_uri: base_uri.to_string(),
                                is_external,
                            },
                        );
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::malformed("relationships", e)),
                _ => {},
            }
        }

        Ok(Self {
            base_uri: base_uri.to_string(),
            rels,
        })
    }

    /// Load the relationships for a part, tolerating absence and damage.
    ///
    /// A missing `.rels` part is normal (many parts have none) and yields an
    /// empty mapping silently. A malformed one yields an empty mapping and a
    /// diagnostic, so one bad part never aborts the rest of the parse.
    pub fn for_part(container: &Container, part_uri: &PackURI, diag: &DiagSink) -> Self {
        let rels_uri = part_uri.rels_uri();
        let base_uri = part_uri.base_uri();
        match container.part(&rels_uri) {
            None => Self::empty(base_uri),
            Some(xml) => match Self::parse(xml, base_uri) {
                Ok(rels) => rels,
                Err(err) => {
                    diag.warn(
                        DiagKind::MalformedXml,
                        None,
                        Some(rels_uri.as_str()),
                        format!("unreadable relationships: {}", err),
                    );
                    Self::empty(base_uri)
                },
            },
        }
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Resolve a relationship ID straight to its absolute target part name.
    ///
    /// Returns `None` for unknown ids and for external targets.
    pub fn target_of(&self, r_id: &str) -> Option<PackURI> {
        self.rels
            .get(r_id)
            .filter(|rel| !rel.is_external)
            .and_then(|rel| rel.target_partname().ok())
    }

    /// Find the first relationship of the given type.
    ///
    /// When several match, the lowest relationship ID wins so repeated loads
    /// of the same package resolve identically.
    pub fn first_of_type(&self, reltype: &str) -> Option<&Relationship> {
        self.rels
            .values()
            .filter(|rel| rel.reltype == reltype)
            .min_by(|a, b| a.r_id.len().cmp(&b.r_id.len()).then(a.r_id.cmp(&b.r_id)))
    }

    /// Iterate over all relationships in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}
