//! Image bomb protection
//!
//! Both checks run before an original is fully decoded: the byte size
//! straight away, the dimensions after reading only the image header.

use super::error::ImageError;
use crate::config::SourceLimits;

/// Validate the original's body size against the configured limit
pub fn validate_file_size(size: usize, limits: &SourceLimits) -> Result<(), ImageError> {
    if size > limits.max_source_bytes {
        return Err(ImageError::FileTooLarge {
            size,
            max_size: limits.max_source_bytes,
        });
    }
    Ok(())
}

/// Validate image dimensions against security limits
///
/// This should be called BEFORE fully decoding the image to protect
/// against "image bomb" attacks where a small file decompresses to
/// huge dimensions.
pub fn validate_dimensions(
    width: u32,
    height: u32,
    limits: &SourceLimits,
) -> Result<(), ImageError> {
    let pixels = width as u64 * height as u64;
    if width > limits.max_source_width
        || height > limits.max_source_height
        || pixels > limits.max_source_pixels
    {
        return Err(ImageError::image_bomb(
            width,
            height,
            limits.max_source_pixels,
        ));
    }
    Ok(())
}
