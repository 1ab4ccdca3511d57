/// ZIP container access.
///
/// A package is a ZIP archive whose entries are "parts" addressed by
/// absolute pack URIs. The whole archive is inflated up front into an
/// in-memory table; every later lookup is a plain map access, which keeps
/// the extraction stage free of archive I/O and lets slides be processed
/// in parallel against shared borrows.
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use std::collections::HashMap;
use std::io::{Cursor, Read};

/// In-memory part storage for one package.
#[derive(Debug, Default)]
pub struct Container {
    /// Map of absolute part name ("/ppt/slides/slide1.xml") to raw bytes
    parts: HashMap<String, Vec<u8>>,
}

impl Container {
    /// Open a package from raw archive bytes.
    ///
    /// Fails with [`OpcError::CorruptArchive`] when the bytes are not a
    /// readable ZIP archive or any entry cannot be inflated. Damage at this
    /// level is fatal: without the central directory there is nothing to
    /// salvage.
    pub fn open(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

        let mut parts = HashMap::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = format!("/{}", entry.name());
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut data)
                .map_err(|e| OpcError::CorruptArchive(format!("cannot inflate '{name}': {e}")))?;
            parts.insert(name, data);
        }

        Ok(Self { parts })
    }

    /// Build a container directly from named parts, bypassing ZIP.
    pub fn from_parts(parts: Vec<(String, Vec<u8>)>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
        }
    }

    /// Get a part's raw bytes by name.
    #[inline]
    pub fn part(&self, uri: &PackURI) -> Option<&[u8]> {
        self.parts.get(uri.as_str()).map(Vec::as_slice)
    }

    /// Check whether a part exists.
    #[inline]
    pub fn contains(&self, uri: &PackURI) -> bool {
        self.parts.contains_key(uri.as_str())
    }

    /// Number of parts in the container.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Iterate over all part names in unspecified order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// List the parts under a directory prefix, ordered by partname index.
    ///
    /// Relationship parts are excluded; they are addressed through
    /// [`PackURI::rels_uri`] instead. Ordering is numeric-aware so
    /// "slide2.xml" sorts before "slide10.xml".
    pub fn parts_under(&self, prefix: &str) -> Vec<PackURI> {
        let mut found: Vec<PackURI> = self
            .parts
            .keys()
            .filter(|name| name.starts_with(prefix) && !name.contains("/_rels/"))
            .filter_map(|name| PackURI::new(name).ok())
            .collect();
        found.sort_by(|a, b| match (a.idx(), b.idx()) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
            _ => a.cmp(b),
        });
        found
    }
}
