//! Asynchronous background-image sampling.
//!
//! Decoding a background image is far too slow for the frame path, so the
//! sampler loads and decodes off-thread and keeps decoded pixels in a
//! bounded LRU cache keyed by [ImageRef]. Sampling an already-cached image
//! is a cheap pixel lookup.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use nalgebra::Point2;
use vello::peniko::Color;

use glint_theme::error::{ThemeError, ThemeResult};

use crate::geometry::Rect;
use crate::tree::ImageRef;

/// A decoded image held as RGBA pixels.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pixels: image::RgbaImage,
}

impl DecodedImage {
    /// Decode an image from its encoded bytes (PNG, JPEG, ...).
    pub fn from_bytes(reference: &ImageRef, bytes: &[u8]) -> ThemeResult<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| ThemeError::image_decode(reference.as_str(), err.to_string()))?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }

    /// Wrap already-decoded RGBA pixels.
    pub fn from_pixels(pixels: image::RgbaImage) -> Self {
        Self { pixels }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The color at a pixel coordinate. Alpha is dropped; luminance of a
    /// backdrop only ever looks at the color channels.
    pub fn color_at(&self, x: u32, y: u32) -> Color {
        let pixel = self.pixels.get_pixel(x, y);
        Color::from_rgb8(pixel[0], pixel[1], pixel[2])
    }
}

/// Loads, decodes and samples background images.
///
/// Cheap to clone; clones share the decoded-image cache.
#[derive(Clone)]
pub struct ImageSampler {
    cache: Arc<Mutex<LruCache<ImageRef, Arc<DecodedImage>>>>,
}

impl ImageSampler {
    /// Create a sampler with a decoded-image cache of the given capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Seed the cache with decoded pixels for a reference. Hosts whose image
    /// origins are not filesystem paths load pixels themselves and preload
    /// here.
    pub fn preload(&self, reference: ImageRef, image: DecodedImage) {
        self.lock_cache().put(reference, Arc::new(image));
    }

    /// Whether decoded pixels for the reference are currently cached.
    pub fn is_cached(&self, reference: &ImageRef) -> bool {
        self.lock_cache().contains(reference)
    }

    /// Sample the color the image shows at `point`, where `surface` is the
    /// on-screen rectangle the image covers. Returns `None` when the image
    /// cannot be loaded or decoded; failures are logged, not surfaced, since
    /// the caller always has a usable fallback decision.
    pub async fn sample(
        &self,
        reference: &ImageRef,
        surface: Rect,
        point: Point2<f64>,
    ) -> Option<Color> {
        let decoded = self.decoded(reference).await?;
        if decoded.width() == 0 || decoded.height() == 0 {
            log::warn!("background image {reference} has no pixels");
            return None;
        }
        let relative = surface.relative_position(point);
        let x = ((relative.x * decoded.width() as f64).floor() as u32).min(decoded.width() - 1);
        let y = ((relative.y * decoded.height() as f64).floor() as u32).min(decoded.height() - 1);
        Some(decoded.color_at(x, y))
    }

    async fn decoded(&self, reference: &ImageRef) -> Option<Arc<DecodedImage>> {
        if let Some(cached) = self.lock_cache().get(reference).cloned() {
            return Some(cached);
        }

        let bytes = match smol::fs::read(reference.as_str()).await {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!(
                    "{}: {err}",
                    ThemeError::image_unavailable(reference.as_str())
                );
                return None;
            }
        };
        let owned = reference.clone();
        let decoded =
            match smol::unblock(move || DecodedImage::from_bytes(&owned, &bytes)).await {
                Ok(decoded) => Arc::new(decoded),
                Err(err) => {
                    log::warn!("{err}");
                    return None;
                }
            };

        // Another task may have decoded the same image meanwhile; keep
        // whichever copy landed first so clones stay shared.
        let mut cache = self.lock_cache();
        if let Some(existing) = cache.get(reference).cloned() {
            return Some(existing);
        }
        cache.put(reference.clone(), decoded.clone());
        Some(decoded)
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<ImageRef, Arc<DecodedImage>>> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
