//! Rasterization: visual trees to RGBA pixel buffers.
//!
//! The painting itself is delegated to the SVG stack: the tree is
//! serialized, parsed back with `usvg` against a shared system font
//! database, and painted with `resvg` into a `tiny-skia` pixmap. Embedded
//! images are decoded on blocking tasks beforehand, each under its own
//! timeout, so one unreadable or hostile image costs its box and a bounded
//! wait, never the whole render.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::common::diag::{DiagKind, Diagnostic, Severity};
use crate::pptx::media::MediaAsset;
use crate::presentation::Presentation;

use super::layout::{VisualTree, layout};
use super::svg::svg_document;
use super::{RenderError, RenderOptions};

/// How long one embedded image may spend decoding before its box is
/// abandoned.
const IMAGE_DECODE_TIMEOUT: Duration = Duration::from_secs(2);

/// Fonts are loaded from the host once and shared by every render.
static FONTDB: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if db.is_empty() {
        log::warn!("no system fonts found; text will not be painted");
    }
    Arc::new(db)
});

/// A rendered slide: premultiplied RGBA pixels, row-major, 4 bytes per
/// pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Encode the buffer as a PNG file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use longan::render::{RenderOptions, rasterize_slide};
    /// # async fn demo(pres: &longan::Presentation) -> Result<(), longan::common::Error> {
    /// let image = rasterize_slide(pres, 0, &RenderOptions::default()).await?;
    /// std::fs::write("out.png", image.encode_png()?)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let size = tiny_skia::IntSize::from_wh(self.width, self.height).ok_or(
            RenderError::EmptyTree {
                width: self.width,
                height: self.height,
            },
        )?;
        let pixmap = tiny_skia::Pixmap::from_vec(self.pixels.clone(), size).ok_or_else(|| {
            RenderError::Encode("pixel buffer does not match its dimensions".to_string())
        })?;
        pixmap
            .encode_png()
            .map_err(|err| RenderError::Encode(err.to_string()))
    }
}

/// Rasterize one visual tree against a media table.
pub async fn rasterize(
    tree: &VisualTree,
    media: &[MediaAsset],
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    let width = scaled_dim(tree.width, options.density);
    let height = scaled_dim(tree.height, options.density);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyTree { width, height });
    }

    let images = decode_images(tree, media).await;
    let svg = svg_document(tree, &images);
    let scale_x = width as f32 / tree.width;
    let scale_y = height as f32 / tree.height;

    let task = tokio::task::spawn_blocking(move || paint(&svg, width, height, scale_x, scale_y));
    match task.await {
        Ok(result) => result,
        Err(err) => Err(RenderError::Join(err.to_string())),
    }
}

/// Render a single slide of a parsed presentation.
pub async fn rasterize_slide(
    pres: &Presentation,
    index: usize,
    options: &RenderOptions,
) -> Result<RasterImage, RenderError> {
    let Some(slide) = pres.slide(index) else {
        return Err(RenderError::SlideOutOfRange {
            index,
            count: pres.slide_count,
        });
    };
    let options = with_deck_defaults(pres, options);
    let tree = layout(slide, pres.slide_size, &pres.media, &options);
    rasterize(&tree, &pres.media, &options).await
}

/// Render every slide of the deck, in order.
///
/// Slides render concurrently, bounded by the host's available cores. The
/// abort flag is consulted before each slide starts: once it turns true no
/// further slide is launched, and the images already produced are
/// returned.
pub async fn rasterize_all(
    pres: &Presentation,
    options: &RenderOptions,
    abort: Option<&AtomicBool>,
) -> Result<Vec<RasterImage>, RenderError> {
    let options = with_deck_defaults(pres, options);
    let parallelism = std::thread::available_parallelism().map_or(2, |n| n.get());
    let limits = Arc::new(Semaphore::new(parallelism));

    let mut tasks = JoinSet::new();
    let mut started = 0usize;
    for slide in &pres.slides {
        if abort.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            log::info!(
                "rasterization aborted after {} of {} slides",
                started,
                pres.slide_count
            );
            break;
        }
        let permit = match limits.clone().acquire_owned().await {
            Ok(permit) => permit,
            // The semaphore is never closed
            Err(_) => break,
        };

        let tree = layout(slide, pres.slide_size, &pres.media, &options);
        let media: Vec<MediaAsset> = tree
            .media_ids()
            .into_iter()
            .filter_map(|id| pres.media_asset(id).cloned())
            .collect();
        let opts = options.clone();
        let index = slide.index;
        tasks.spawn(async move {
            let result = rasterize(&tree, &media, &opts).await;
            drop(permit);
            (index, result)
        });
        started += 1;
    }

    let mut rendered: Vec<(usize, RasterImage)> = Vec::with_capacity(started);
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(|err| RenderError::Join(err.to_string()))?;
        rendered.push((index, result?));
    }
    rendered.sort_by_key(|(index, _)| *index);
    Ok(rendered.into_iter().map(|(_, image)| image).collect())
}

/// Fill unset options from deck-level context: the theme's body typeface.
fn with_deck_defaults(pres: &Presentation, options: &RenderOptions) -> RenderOptions {
    let mut options = options.clone();
    if options.font_family.is_none() {
        options.font_family = pres.default_font.clone();
    }
    options
}

fn paint(
    svg: &str,
    width: u32,
    height: u32,
    scale_x: f32,
    scale_y: f32,
) -> Result<RasterImage, RenderError> {
    let opts = usvg::Options {
        fontdb: FONTDB.clone(),
        ..usvg::Options::default()
    };
    let rtree = usvg::Tree::from_str(svg, &opts).map_err(|err| RenderError::Svg(err.to_string()))?;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RenderError::PixmapAlloc { width, height })?;
    resvg::render(
        &rtree,
        tiny_skia::Transform::from_scale(scale_x, scale_y),
        &mut pixmap.as_mut(),
    );
    Ok(RasterImage {
        width,
        height,
        pixels: pixmap.take(),
    })
}

/// Decode every image the tree references, each on its own blocking task
/// under [`IMAGE_DECODE_TIMEOUT`], normalizing to PNG. Failures drop the
/// entry; the affected box renders empty.
async fn decode_images(tree: &VisualTree, media: &[MediaAsset]) -> HashMap<String, Vec<u8>> {
    let mut ids = tree.media_ids();
    ids.sort_unstable();
    ids.dedup();

    let mut tasks = JoinSet::new();
    for id in ids {
        let Some(asset) = media.iter().find(|asset| asset.id == id) else {
            continue;
        };
        let id = id.to_string();
        let bytes = asset.bytes.clone();
        tasks.spawn(async move {
            let work = tokio::task::spawn_blocking(move || reencode_png(&bytes));
            let png = match tokio::time::timeout(IMAGE_DECODE_TIMEOUT, work).await {
                Ok(Ok(png)) => png,
                Ok(Err(_)) | Err(_) => None,
            };
            (id, png)
        });
    }

    let mut images = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        let Ok((id, png)) = joined else {
            continue;
        };
        match png {
            Some(png) => {
                images.insert(id, png);
            },
            None => {
                let record = Diagnostic {
                    kind: DiagKind::ImageDecodeTimeout,
                    severity: Severity::Warning,
                    slide: Some(tree.index),
                    part: Some(id),
                    message: format!(
                        "image not decodable within {}ms; box left empty",
                        IMAGE_DECODE_TIMEOUT.as_millis()
                    ),
                };
                log::warn!("{record}");
            },
        }
    }
    images
}

/// Decode an embedded image and re-encode it as PNG.
///
/// Normalizing lets the SVG stage embed a single format and converts
/// inputs the compositor cannot read (BMP, TIFF) into one it can.
fn reencode_png(bytes: &[u8]) -> Option<Vec<u8>> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .ok()?;
    Some(png)
}

#[inline]
fn scaled_dim(value: f32, density: f32) -> u32 {
    (value * density).round().max(0.0) as u32
}
