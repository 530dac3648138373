//! Image normalization for outbound prompts.
//!
//! Every attached image leaves as a baseline RGB JPEG that fits inside an
//! 800×800 box, whatever its source encoding, channel layout or size.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;

use super::{build_data_uri, PromptError};

/// Bounding box edge for normalized images.
pub const MAX_DIMENSION: u32 = 800;

/// JPEG quality for re-encoded images (0-100).
pub const JPEG_QUALITY: u8 = 85;

/// Dimensions after shrinking `(width, height)` to fit `max × max`.
///
/// Aspect ratio is preserved and images already inside the box are returned
/// unchanged; nothing is ever enlarged. Neither edge rounds below 1.
pub fn thumbnail_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let ratio = (max as f64 / width as f64).min(max as f64 / height as f64);
    let scale = |edge: u32| ((edge as f64 * ratio).round() as u32).clamp(1, max);

    (scale(width), scale(height))
}

/// Shrink, flatten to RGB, re-encode as JPEG and wrap as a data URI.
pub fn normalize_image(img: &DynamicImage) -> Result<String, PromptError> {
    let (width, height) = (img.width(), img.height());
    let (new_width, new_height) = thumbnail_dimensions(width, height, MAX_DIMENSION);

    let rgb = if (new_width, new_height) == (width, height) {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        tracing::debug!(
            width,
            height,
            new_width,
            new_height,
            "Downscaling image for prompt"
        );
        let resized = img.resize_exact(new_width, new_height, FilterType::Lanczos3);
        DynamicImage::ImageRgb8(resized.to_rgb8())
    };

    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PromptError::ImageEncoding(e.to_string()))?;

    Ok(build_data_uri("image/jpeg", &STANDARD.encode(output.into_inner())))
}
