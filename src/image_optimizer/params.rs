//! Transformation parameters handed to the transform primitive.

use crate::directive::ResizeDirective;

/// Output image format.
///
/// Only three codecs are ever produced, whatever the input extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

/// How to fit the image within target dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Fill the exact box by cropping around the center, never enlarging
    #[default]
    Cover,
}

/// One decode → resize → encode job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    pub width: u32,
    pub height: u32,
    pub fit: FitPolicy,
    pub format: OutputFormat,
    /// 1-100; meaning per codec is described on the encoders
    pub quality: u8,
}

impl TransformRequest {
    pub fn new(directive: &ResizeDirective, format: OutputFormat) -> Self {
        Self {
            width: directive.width,
            height: directive.height,
            fit: FitPolicy::Cover,
            format,
            quality: directive.quality,
        }
    }
}
