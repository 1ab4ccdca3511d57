/// Embedded media support.
///
/// Slides reference images through relationships; the bytes live in
/// `/ppt/media/`. Each part is loaded once into a registry and shapes
/// point at it by filename, so a logo repeated on every slide is stored
/// a single time.
use crate::opc::packuri::PackURI;
use bytes::Bytes;
use serde::Serialize;
use std::collections::BTreeMap;

/// MIME types by lowercase file extension.
static MIME_TYPES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "bmp" => "image/bmp",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
    "emf" => "image/x-emf",
    "wmf" => "image/x-wmf",
    "svg" => "image/svg+xml",
};

/// Detect a MIME type from file bytes (magic number detection).
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if data.starts_with(b"\xFF\xD8\xFF") {
        return Some("image/jpeg");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.starts_with(b"BM") {
        return Some("image/bmp");
    }
    if data.starts_with(b"II*\x00") || data.starts_with(b"MM\x00*") {
        return Some("image/tiff");
    }
    None
}

/// Resolve the MIME type for a media part.
///
/// The extension decides when it is known; otherwise the bytes are
/// sniffed, and anything unrecognized is served as a generic blob.
pub fn mime_for(uri: &PackURI, data: &[u8]) -> &'static str {
    if let Some(mime) = MIME_TYPES.get(&uri.ext().to_ascii_lowercase()) {
        return mime;
    }
    sniff_mime(data).unwrap_or("application/octet-stream")
}

/// One embedded media file.
#[derive(Debug, Clone, Serialize)]
pub struct MediaAsset {
    /// Filename-derived identifier ("image1.png"), what shapes reference
    pub id: String,

    /// Source part name ("/ppt/media/image1.png")
    pub part: String,

    /// MIME type, from the extension or sniffed from the bytes
    pub mime: &'static str,

    /// Size of the raw bytes
    pub size: usize,

    /// Raw file content, excluded from serialized output
    #[serde(skip)]
    pub bytes: Bytes,
}

impl MediaAsset {
    pub fn new(uri: &PackURI, data: Vec<u8>) -> Self {
        let mime = mime_for(uri, &data);
        Self {
            id: uri.filename().to_string(),
            part: uri.to_string(),
            mime,
            size: data.len(),
            bytes: Bytes::from(data),
        }
    }
}

/// Deduplicating registry of media assets, keyed by id.
#[derive(Debug, Default)]
pub struct MediaRegistry {
    assets: BTreeMap<String, MediaAsset>,
}

impl MediaRegistry {
    /// Insert an asset unless its id is already registered.
    pub fn insert(&mut self, asset: MediaAsset) {
        self.assets.entry(asset.id.clone()).or_insert(asset);
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&MediaAsset> {
        self.assets.get(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Consume the registry, yielding assets ordered by partname index.
    pub fn into_assets(self) -> Vec<MediaAsset> {
        let mut assets: Vec<MediaAsset> = self.assets.into_values().collect();
        assets.sort_by(|a, b| {
            let x = PackURI::new(&a.part).ok().and_then(|u| u.idx());
            let y = PackURI::new(&b.part).ok().and_then(|u| u.idx());
            match (x, y) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
                _ => a.id.cmp(&b.id),
            }
        });
        assets
    }
}
