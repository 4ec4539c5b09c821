// Request pipeline - runs both edge phases around an object store
//
// In production the CDN invokes the rewriter and the transformer separately
// and performs the origin fetch itself. The pipeline plays that role for the
// CLI and for end-to-end tests: the two phases still share nothing but the
// request and response values passed between them.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::edge::{EdgeRequest, EdgeResponse};
use crate::image_optimizer::{ImageProcessor, ImageTransform};
use crate::rewriter::RequestRewriter;
use crate::store::ObjectStore;
use crate::transformer::ResponseTransformer;

/// Viewer request in, client response out
pub struct EdgePipeline {
    rewriter: RequestRewriter,
    store: Arc<dyn ObjectStore>,
    transformer: ResponseTransformer,
}

impl EdgePipeline {
    /// Build a pipeline with the in-process [`ImageProcessor`]
    pub fn new(config: &Config, store: Arc<dyn ObjectStore>) -> Self {
        let processor = ImageProcessor::new(config.limits.clone());
        Self::with_transform(config, store, Arc::new(processor))
    }

    pub fn with_transform(
        config: &Config,
        store: Arc<dyn ObjectStore>,
        transform: Arc<dyn ImageTransform>,
    ) -> Self {
        Self {
            rewriter: RequestRewriter::new(&config.resize),
            store,
            transformer: ResponseTransformer::new(&config.resize, transform),
        }
    }

    /// Run viewer request → rewrite → fetch → transform
    pub async fn serve(&self, viewer: EdgeRequest) -> EdgeResponse {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::debug_span!("edge_request", request_id = %request_id, uri = %viewer.uri);

        async move {
            let origin = self.rewriter.rewrite(viewer.clone());
            tracing::debug!(origin_uri = %origin.uri, "Fetching from object store");
            let upstream = self.store.fetch(&origin.uri).await;

            // The transformer sees the viewer-facing request, as the CDN presents it
            let response = self.transformer.handle(&viewer, upstream).await;
            tracing::debug!(
                status = response.status.as_u16(),
                bytes = response.body.len(),
                "Request complete"
            );
            response
        }
        .instrument(span)
        .await
    }
}
