//! Card thumbnails: download, decode, and the one-shot placeholder fallback.

use crate::error::ImageLoadError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Decoded images are shrunk to fit this box before being kept in memory;
/// a card never draws more pixels than this.
pub const MAX_THUMBNAIL_WIDTH: u32 = 96;
pub const MAX_THUMBNAIL_HEIGHT: u32 = 64;

/// A small RGB raster, ready to be sampled into terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Thumbnail {
    /// Build from raw row-major pixels. Returns `None` if the buffer does not
    /// match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        (width > 0 && height > 0 && pixels.len() == (width as usize) * (height as usize))
            .then_some(Self {
                width,
                height,
                pixels,
            })
    }

    /// Decode PNG/JPEG/WebP bytes and downscale to the thumbnail box.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ImageLoadError::Decode(e.to_string()))?
            .thumbnail(MAX_THUMBNAIL_WIDTH, MAX_THUMBNAIL_HEIGHT)
            .to_rgb8();
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();
        Self::from_pixels(width, height, pixels)
            .ok_or_else(|| ImageLoadError::Decode("image has no pixels".into()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, clamped to the image bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}

/// Loads a thumbnail from a URL.
#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    async fn load(&self, url: &str) -> Result<Thumbnail, ImageLoadError>;
}

/// Downloads thumbnails over HTTP, at most `max_concurrent` at a time.
pub struct HttpThumbnailSource {
    client: reqwest::Client,
    permits: Arc<Semaphore>,
}

impl HttpThumbnailSource {
    pub fn new(client: reqwest::Client, max_concurrent: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }
}

#[async_trait]
impl ThumbnailSource for HttpThumbnailSource {
    async fn load(&self, url: &str) -> Result<Thumbnail, ImageLoadError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ImageLoadError::Transport(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageLoadError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageLoadError::Transport(e.to_string()))?;

        tokio::task::spawn_blocking(move || Thumbnail::decode(&bytes))
            .await
            .map_err(|e| ImageLoadError::Decode(e.to_string()))?
    }
}

/// Which image a card is showing or waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageVariant {
    Original,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    Loading(ImageVariant),
    Ready(ImageVariant, Arc<Thumbnail>),
    /// Both the original and the placeholder failed. Terminal.
    Unavailable,
}

/// Per-card image state: the original URL is tried once, then the
/// placeholder once, then nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFallback {
    original_url: String,
    placeholder_url: String,
    state: ImageState,
}

impl ImageFallback {
    /// Start loading `original_url`.
    pub fn new(original_url: impl Into<String>, placeholder_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            placeholder_url: placeholder_url.into(),
            state: ImageState::Loading(ImageVariant::Original),
        }
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// The URL to request for `variant`.
    pub fn url(&self, variant: ImageVariant) -> &str {
        match variant {
            ImageVariant::Original => &self.original_url,
            ImageVariant::Placeholder => &self.placeholder_url,
        }
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    /// Record the result of loading `url` as `variant`.
    ///
    /// Returns the variant that must be requested next, which is only ever
    /// the placeholder after the original failed. Results for a variant the
    /// card is not waiting on, or for a URL it no longer shows, are ignored.
    pub fn resolve(
        &mut self,
        variant: ImageVariant,
        url: &str,
        result: Result<Thumbnail, ImageLoadError>,
    ) -> Option<ImageVariant> {
        if self.state != ImageState::Loading(variant) || url != self.url(variant) {
            return None;
        }
        match (variant, result) {
            (_, Ok(image)) => {
                self.state = ImageState::Ready(variant, Arc::new(image));
                None
            }
            (ImageVariant::Original, Err(err)) => {
                tracing::debug!(url = %url, error = %err, "thumbnail failed, using placeholder");
                self.state = ImageState::Loading(ImageVariant::Placeholder);
                Some(ImageVariant::Placeholder)
            }
            (ImageVariant::Placeholder, Err(err)) => {
                tracing::debug!(url = %url, error = %err, "placeholder failed, giving up");
                self.state = ImageState::Unavailable;
                None
            }
        }
    }
}
