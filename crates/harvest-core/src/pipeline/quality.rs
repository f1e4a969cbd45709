//! Minimum-resolution quality gate.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;

use crate::config::QualityConfig;
use crate::error::PipelineError;

/// Dimensions and format read from a payload's image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Format detected from the payload's magic bytes
    pub format: ImageFormat,
}

/// Accepts payloads that decode as images at or above a minimum resolution.
#[derive(Debug, Clone)]
pub struct QualityFilter {
    config: QualityConfig,
}

impl QualityFilter {
    /// Create a new filter with the given minimums.
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Check a payload against the resolution gate.
    ///
    /// The format is detected from content, never from the declared
    /// content type. Both minimums are inclusive.
    pub fn check(&self, bytes: &[u8], url: &str) -> Result<ImageDimensions, PipelineError> {
        let dims = Self::read_dimensions(bytes, url)?;

        if dims.width < self.config.min_width || dims.height < self.config.min_height {
            return Err(PipelineError::BelowMinimum {
                url: url.to_string(),
                width: dims.width,
                height: dims.height,
                min_width: self.config.min_width,
                min_height: self.config.min_height,
            });
        }

        Ok(dims)
    }

    /// Read dimensions from the image header without decoding pixel data.
    fn read_dimensions(bytes: &[u8], url: &str) -> Result<ImageDimensions, PipelineError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                url: url.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        let format = reader.format().ok_or_else(|| PipelineError::Decode {
            url: url.to_string(),
            message: "Unrecognized image format".to_string(),
        })?;

        let (width, height) = reader.into_dimensions().map_err(|e| PipelineError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(ImageDimensions {
            width,
            height,
            format,
        })
    }
}
