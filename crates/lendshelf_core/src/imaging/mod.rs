//! Thumbnail generation for item images.
//!
//! # Responsibility
//! - Decode uploaded image bytes and bound them to a configured box.
//! - Re-encode thumbnails in one storage format (PNG).
//!
//! # Invariants
//! - Output width/height never exceed the bounds.
//! - Aspect ratio is preserved (up to rounding) and images are never upscaled.

use image::imageops::FilterType;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Cursor;

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 300;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 300;

/// Maximum thumbnail box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl ThumbnailBounds {
    /// Rejects boxes with a zero side.
    pub fn validate(self) -> Result<Self, ImageError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ImageError::InvalidBounds(self));
        }
        Ok(self)
    }
}

impl Default for ThumbnailBounds {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_THUMBNAIL_WIDTH,
            max_height: DEFAULT_THUMBNAIL_HEIGHT,
        }
    }
}

#[derive(Debug)]
pub enum ImageError {
    /// Bounds with a zero side cannot hold any image.
    InvalidBounds(ThumbnailBounds),
    Decode(image::ImageError),
    Encode(image::ImageError),
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBounds(bounds) => write!(
                f,
                "thumbnail bounds must be positive, got {}x{}",
                bounds.max_width, bounds.max_height
            ),
            Self::Decode(err) => write!(f, "failed to decode image: {err}"),
            Self::Encode(err) => write!(f, "failed to encode thumbnail: {err}"),
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBounds(_) => None,
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

/// Computes the largest size fitting `bounds` with the aspect of `source`.
///
/// Sources already inside the box keep their size.
///
/// # Errors
/// - `InvalidBounds` when either side of `bounds` is zero.
pub fn fit_within(source: (u32, u32), bounds: ThumbnailBounds) -> Result<(u32, u32), ImageError> {
    let bounds = bounds.validate()?;
    let (src_w, src_h) = source;
    if src_w <= bounds.max_width && src_h <= bounds.max_height {
        return Ok(source);
    }

    let scale = f64::min(
        bounds.max_width as f64 / src_w as f64,
        bounds.max_height as f64 / src_h as f64,
    );
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, bounds.max_width);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, bounds.max_height);
    Ok((w, h))
}

/// Decodes `bytes`, shrinks the image into `bounds`, and returns PNG bytes.
pub fn resize_to_bounds(bytes: &[u8], bounds: ThumbnailBounds) -> Result<Vec<u8>, ImageError> {
    let bounds = bounds.validate()?;
    let img = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    let (width, height) = fit_within((img.width(), img.height()), bounds)?;
    let thumbnail = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let mut encoded = Vec::new();
    thumbnail
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(ImageError::Encode)?;
    Ok(encoded)
}
