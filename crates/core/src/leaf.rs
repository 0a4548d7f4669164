//! Leaf image decoding and the fixed resize applied before classification.

use image::imageops::FilterType;
use image::RgbImage;

use crate::error::CoreError;

/// Side length, in pixels, of the square raster the classifier consumes.
pub const INPUT_SIZE: u32 = 224;

/// A decoded leaf photo in RGB.
#[derive(Debug, Clone)]
pub struct LeafImage {
    rgb: RgbImage,
}

impl LeafImage {
    /// Decode PNG, JPEG or WebP bytes. The format is sniffed from the content.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::InvalidInput("image payload is empty".into()));
        }
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| CoreError::InvalidInput(format!("could not decode image: {e}")))?;
        Ok(Self {
            rgb: decoded.to_rgb8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// Resize to `INPUT_SIZE` × `INPUT_SIZE` with bilinear filtering.
    pub fn prepare(&self) -> RgbImage {
        image::imageops::resize(&self.rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
    }
}
