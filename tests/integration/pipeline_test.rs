//! End-to-end tests for the two edge phases
//!
//! Each test stores originals in a temporary directory and runs
//!   viewer request → RequestRewriter → LocalObjectStore → ResponseTransformer
//! exactly as the CDN would chain them.

use super::test_harness::{gradient_jpeg, solid_gif, translucent_png, OriginFixture};
use async_trait::async_trait;
use bytes::Bytes;
use edge_resizer::config::Config;
use edge_resizer::edge::{EdgeRequest, EdgeResponse};
use edge_resizer::image_optimizer::{
    ImageError, ImageProcessor, ImageTransform, ProcessedImage, TransformRequest,
};
use edge_resizer::pipeline::EdgePipeline;
use edge_resizer::store::{LocalObjectStore, ObjectStore};
use edge_resizer::transformer::ResponseTransformer;
use http::header::{ACCEPT, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, VARY};
use http::{HeaderValue, StatusCode};
use std::sync::Arc;

fn dimensions(body: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(body).expect("output should decode");
    (img.width(), img.height())
}

#[tokio::test]
async fn test_jpeg_resized_to_exact_dimensions() {
    let origins = OriginFixture::new();
    origins.put("product.jpg", &gradient_jpeg(800, 600));
    let pipeline = origins.pipeline(&Config::default());

    let response = pipeline
        .serve(EdgeRequest::new("/images/300x200/80/product.jpg"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        response.headers[CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
    assert_eq!(response.headers["x-image-resized"], "300x200q80");
    assert_eq!(response.headers[VARY], "Accept");
    assert_eq!(
        response.headers[CONTENT_LENGTH],
        response.body.len().to_string().as_str()
    );
    assert_eq!(dimensions(&response.body), (300, 200));
}

#[tokio::test]
async fn test_webp_when_accepted() {
    let origins = OriginFixture::new();
    origins.put("product.jpg", &gradient_jpeg(800, 600));
    let pipeline = origins.pipeline(&Config::default());

    let request = EdgeRequest::new("/images/300x200/80/product.jpg")
        .with_header(ACCEPT, HeaderValue::from_static("image/webp,*/*"));
    let response = pipeline.serve(request).await;

    assert_eq!(response.headers[CONTENT_TYPE], "image/webp");
    assert_eq!(&response.body[0..4], b"RIFF");
    assert_eq!(&response.body[8..12], b"WEBP");
    assert_eq!(dimensions(&response.body), (300, 200));
}

#[tokio::test]
async fn test_png_stays_png_with_default_quality() {
    let origins = OriginFixture::new();
    origins.put("large.png", &translucent_png(640, 640));
    let pipeline = origins.pipeline(&Config::default());

    let response = pipeline
        .serve(EdgeRequest::new("/images/300x200/large.png"))
        .await;

    assert_eq!(response.headers[CONTENT_TYPE], "image/png");
    assert_eq!(response.headers["x-image-resized"], "300x200q80");
    assert_eq!(dimensions(&response.body), (300, 200));
}

#[tokio::test]
async fn test_gif_becomes_jpeg() {
    let origins = OriginFixture::new();
    origins.put("anim/banner.gif", &solid_gif(400, 100));
    let pipeline = origins.pipeline(&Config::default());

    let response = pipeline
        .serve(EdgeRequest::new("/images/200x50/70/anim/banner.gif"))
        .await;

    assert_eq!(response.headers[CONTENT_TYPE], "image/jpeg");
    assert_eq!(response.headers["x-image-resized"], "200x50q70");
    assert_eq!(dimensions(&response.body), (200, 50));
}

#[tokio::test]
async fn test_oversized_request_is_clamped_and_not_enlarged() {
    let origins = OriginFixture::new();
    origins.put("a.jpg", &gradient_jpeg(120, 90));
    let pipeline = origins.pipeline(&Config::default());

    let response = pipeline
        .serve(EdgeRequest::new("/images/99999x99999/a.jpg"))
        .await;

    assert_eq!(response.headers["x-image-resized"], "2000x2000q80");
    let (width, height) = dimensions(&response.body);
    assert!(width <= 120 && height <= 90);
}

#[tokio::test]
async fn test_unsupported_extension_served_as_stored() {
    let origins = OriginFixture::new();
    let original = b"BM-not-really-a-bitmap".to_vec();
    origins.put("scan.bmp", &original);
    let pipeline = origins.pipeline(&Config::default());

    let response = pipeline
        .serve(EdgeRequest::new("/images/300x200/80/scan.bmp"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Bytes::from(original));
    assert_eq!(response.headers[CONTENT_TYPE], "image/bmp");
    assert!(response.headers.get("x-image-resized").is_none());
    assert!(response.headers.get(CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn test_missing_original_returns_store_404() {
    let origins = OriginFixture::new();
    let pipeline = origins.pipeline(&Config::default());

    let response = pipeline
        .serve(EdgeRequest::new("/images/300x200/80/missing.jpg"))
        .await;

    assert_eq!(response, EdgeResponse::not_found());
}

#[tokio::test]
async fn test_corrupt_original_passes_through_unchanged() {
    let origins = OriginFixture::new();
    origins.put("broken.jpg", b"\xFF\xD8 truncated jpeg");
    let store = LocalObjectStore::new(origins.root());
    let upstream = store.fetch("/original/broken.jpg").await;

    let pipeline = origins.pipeline(&Config::default());
    let response = pipeline
        .serve(EdgeRequest::new("/images/300x200/80/broken.jpg"))
        .await;

    assert_eq!(response, upstream);
    assert_eq!(response.headers[CONTENT_TYPE], "image/jpeg");
}

struct DecodeAlwaysFails;

#[async_trait]
impl ImageTransform for DecodeAlwaysFails {
    async fn transform(
        &self,
        _source: Bytes,
        _request: TransformRequest,
    ) -> Result<ProcessedImage, ImageError> {
        Err(ImageError::decode_failed("injected failure"))
    }
}

#[tokio::test]
async fn test_injected_transform_failure_keeps_original_headers() {
    let origins = OriginFixture::new();
    origins.put("product.jpg", &gradient_jpeg(64, 64));
    let store = Arc::new(LocalObjectStore::new(origins.root()));
    let upstream = store.fetch("/original/product.jpg").await;

    let pipeline = EdgePipeline::with_transform(
        &Config::default(),
        store,
        Arc::new(DecodeAlwaysFails),
    );
    let response = pipeline
        .serve(EdgeRequest::new("/images/32x32/80/product.jpg"))
        .await;

    assert_eq!(response, upstream);
}

#[tokio::test]
async fn test_same_directive_is_byte_identical() {
    let origins = OriginFixture::new();
    origins.put("product.jpg", &gradient_jpeg(800, 600));
    let pipeline = origins.pipeline(&Config::default());

    for accept in ["", "image/webp"] {
        let request = if accept.is_empty() {
            EdgeRequest::new("/images/300x200/80/product.jpg")
        } else {
            EdgeRequest::new("/images/300x200/80/product.jpg")
                .with_header(ACCEPT, HeaderValue::from_static("image/webp"))
        };
        let first = pipeline.serve(request.clone()).await;
        let second = pipeline.serve(request).await;
        assert_eq!(first.body, second.body);
    }
}

#[tokio::test]
async fn test_transformer_reads_directive_from_viewer_uri() {
    let origins = OriginFixture::new();
    origins.put("product.jpg", &gradient_jpeg(200, 200));
    let store = LocalObjectStore::new(origins.root());
    let upstream = store.fetch("/original/product.jpg").await;

    let transformer = ResponseTransformer::new(
        &Config::default().resize,
        Arc::new(ImageProcessor::default()),
    );

    // The rewritten origin URI carries no directive, so nothing happens
    let origin_request = EdgeRequest::new("/original/product.jpg");
    let untouched = transformer.handle(&origin_request, upstream.clone()).await;
    assert_eq!(untouched, upstream);

    let viewer_request = EdgeRequest::new("/images/50x40/product.jpg");
    let resized = transformer.handle(&viewer_request, upstream).await;
    assert_eq!(dimensions(&resized.body), (50, 40));
}

#[tokio::test]
async fn test_custom_prefixes_end_to_end() {
    let origins = OriginFixture::new();
    let path = origins.root().join("masters").join("a.jpg");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, gradient_jpeg(100, 100)).unwrap();

    let config = Config::from_yaml_with_env(
        "resize:\n  resize_prefix: /thumbs\n  original_prefix: /masters\n",
    )
    .unwrap();
    let pipeline = origins.pipeline(&config);

    let response = pipeline.serve(EdgeRequest::new("/thumbs/20x10/a.jpg")).await;
    assert_eq!(response.headers["x-image-resized"], "20x10q80");
    assert_eq!(dimensions(&response.body), (20, 10));
}
