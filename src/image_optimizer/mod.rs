//! Image transformation module
//!
//! Provides the decode → resize → encode primitive behind the response
//! transformer:
//! - Centered cover fit that never enlarges the source
//! - Accept-based output selection (WebP, PNG or JPEG only)
//! - Progressive JPEG (mozjpeg), lossy WebP (libwebp), lossless PNG
//! - Image bomb protection before full decode
//!
//! # Example
//!
//! ```ignore
//! use edge_resizer::image_optimizer::{ImageProcessor, ImageTransform, OutputFormat, TransformRequest};
//!
//! let processor = ImageProcessor::default();
//! let processed = processor.transform(original_bytes, request).await?;
//! ```

pub mod encoder;
pub mod error;
pub mod format;
pub mod metrics;
pub mod params;
pub mod processor;
pub mod security;
pub mod transform;

// Re-export commonly used types
pub use encoder::{EncodedImage, EncoderFactory, ImageEncoder};
pub use error::ImageError;
pub use format::{negotiate_format, vary_header};
pub use metrics::ResizeMetrics;
pub use params::{FitPolicy, OutputFormat, TransformRequest};
pub use processor::{process_image, ProcessedImage};
pub use security::{validate_dimensions, validate_file_size};
pub use transform::{ImageProcessor, ImageTransform};
