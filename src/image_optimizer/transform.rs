//! The transform capability consumed by the response transformer.
//!
//! The transformer only knows the [`ImageTransform`] contract: bytes plus a
//! [`TransformRequest`] in, encoded bytes or an [`ImageError`] out, as one
//! atomic awaited step. [`ImageProcessor`] is the in-process implementation;
//! tests and alternative backends plug in their own.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::ImageError;
use super::params::TransformRequest;
use super::processor::{process_image, ProcessedImage};
use crate::config::SourceLimits;

#[async_trait]
pub trait ImageTransform: Send + Sync {
    async fn transform(
        &self,
        source: Bytes,
        request: TransformRequest,
    ) -> Result<ProcessedImage, ImageError>;
}

/// Decodes, resizes and encodes on tokio's blocking pool
#[derive(Debug, Clone, Default)]
pub struct ImageProcessor {
    limits: SourceLimits,
}

impl ImageProcessor {
    pub fn new(limits: SourceLimits) -> Self {
        Self { limits }
    }
}

#[async_trait]
impl ImageTransform for ImageProcessor {
    async fn transform(
        &self,
        source: Bytes,
        request: TransformRequest,
    ) -> Result<ProcessedImage, ImageError> {
        let limits = self.limits.clone();
        tokio::task::spawn_blocking(move || process_image(&source, &request, &limits))
            .await
            .map_err(|e| ImageError::task_failed(e.to_string()))?
    }
}
