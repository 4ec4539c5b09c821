//! Image transformation error types
//!
//! Every variant ends the same way for the client: the transformer logs it
//! and serves the original response. The variants exist so logs and metrics
//! can tell an image bomb from a corrupt upload.

use thiserror::Error;

/// Errors that can occur while decoding, resizing or encoding an image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    // === Decoding Errors ===
    /// Failed to decode image data
    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: String },

    // === Processing Errors ===
    /// Resize operation failed
    #[error("Resize failed: {message}")]
    ResizeFailed { message: String },
    /// Encoding to output format failed
    #[error("Failed to encode to {format}: {message}")]
    EncodeFailed { format: String, message: String },

    // === Source Limit Errors ===
    /// Image dimensions exceed safety limits (image bomb protection)
    #[error("Image dimensions {width}x{height} ({pixels} pixels) exceed limit of {max_pixels} pixels")]
    ImageBombDetected {
        width: u32,
        height: u32,
        pixels: u64,
        max_pixels: u64,
    },
    /// Input file size exceeds limit
    #[error("File size {size} bytes exceeds maximum {max_size} bytes")]
    FileTooLarge { size: usize, max_size: usize },

    // === Runtime Errors ===
    /// The blocking worker running the transform did not complete
    #[error("Transform task failed: {message}")]
    TaskFailed { message: String },
}

impl ImageError {
    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn image_bomb(width: u32, height: u32, max_pixels: u64) -> Self {
        ImageError::ImageBombDetected {
            width,
            height,
            pixels: width as u64 * height as u64,
            max_pixels,
        }
    }

    pub fn task_failed(message: impl Into<String>) -> Self {
        ImageError::TaskFailed {
            message: message.into(),
        }
    }

    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ImageError::DecodeFailed { .. } => "decode",
            ImageError::ResizeFailed { .. } => "resize",
            ImageError::EncodeFailed { .. } => "encode",
            ImageError::ImageBombDetected { .. } => "image_bomb",
            ImageError::FileTooLarge { .. } => "file_too_large",
            ImageError::TaskFailed { .. } => "task",
        }
    }
}
