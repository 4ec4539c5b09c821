//! Origin-response phase: resize successful original responses.
//!
//! Per response the transformer walks one path:
//!
//! ```text
//! Received ─ status != 200 ──────────────────────────▶ PassThrough
//!          ─ no directive in viewer URI ─────────────▶ PassThrough
//!          ─ extension not supported ────────────────▶ PassThrough
//!          ─ transform ─ Err ────────────────────────▶ PassThrough (logged)
//!                      ─ Ok ─────────────────────────▶ Transformed
//! ```
//!
//! There is no retry, and a pass-through returns the upstream response
//! exactly as received. The directive always comes from the viewer URI;
//! `x-resize-*` request headers are never consulted.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::{ACCEPT, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, VARY};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::config::ResizeConfig;
use crate::constants::{HEADER_IMAGE_RESIZED, IMMUTABLE_CACHE_CONTROL};
use crate::directive::{DirectiveParser, DirectiveRejection, ResizeDirective, SupportedExtensionSet};
use crate::edge::{EdgeRequest, EdgeResponse};
use crate::image_optimizer::{
    negotiate_format, vary_header, ImageError, ImageTransform, OutputFormat, ProcessedImage,
    ResizeMetrics, TransformRequest,
};

/// Why a response was returned unmodified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassThroughReason {
    /// Upstream answered with something other than 200
    UpstreamFailure { status: StatusCode },
    /// The viewer URI does not match the directive grammar
    NotADirective,
    /// The grammar matched but a value is unusable (e.g. zero width)
    InvalidDirective { reason: &'static str },
    /// The target's extension is outside the supported set
    UnsupportedExtension { extension: String },
    /// The transform primitive failed
    TransformFailure { error: ImageError },
}

impl PassThroughReason {
    /// Metric label for this reason
    pub fn as_label(&self) -> &'static str {
        match self {
            PassThroughReason::UpstreamFailure { .. } => "upstream_failure",
            PassThroughReason::NotADirective => "not_a_directive",
            PassThroughReason::InvalidDirective { .. } => "invalid_directive",
            PassThroughReason::UnsupportedExtension { .. } => "unsupported_extension",
            PassThroughReason::TransformFailure { .. } => "transform_failure",
        }
    }
}

impl fmt::Display for PassThroughReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassThroughReason::UpstreamFailure { status } => {
                write!(f, "upstream responded {}", status.as_u16())
            }
            PassThroughReason::NotADirective => write!(f, "not a resize directive"),
            PassThroughReason::InvalidDirective { reason } => {
                write!(f, "invalid directive: {}", reason)
            }
            PassThroughReason::UnsupportedExtension { extension } => {
                write!(f, "unsupported extension '{}'", extension)
            }
            PassThroughReason::TransformFailure { error } => {
                write!(f, "transform failed: {}", error)
            }
        }
    }
}

impl From<DirectiveRejection> for PassThroughReason {
    fn from(rejection: DirectiveRejection) -> Self {
        match rejection {
            DirectiveRejection::NotADirective => PassThroughReason::NotADirective,
            DirectiveRejection::Invalid { reason } => PassThroughReason::InvalidDirective { reason },
        }
    }
}

/// A successful transform, ready to replace the upstream body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizedImage {
    pub directive: ResizeDirective,
    pub image: ProcessedImage,
    /// Time spent in the transform primitive
    pub elapsed: Duration,
}

/// Result of evaluating one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    Transformed(ResizedImage),
    PassThrough(PassThroughReason),
}

pub struct ResponseTransformer {
    parser: DirectiveParser,
    extensions: SupportedExtensionSet,
    transform: Arc<dyn ImageTransform>,
}

impl ResponseTransformer {
    pub fn new(config: &ResizeConfig, transform: Arc<dyn ImageTransform>) -> Self {
        Self {
            parser: DirectiveParser::new(config),
            extensions: SupportedExtensionSet::from_config(config),
            transform,
        }
    }

    /// Produce the response for the client.
    ///
    /// `request` is the viewer request, carrying the client-facing URI and
    /// the client's Accept header.
    pub async fn handle(&self, request: &EdgeRequest, response: EdgeResponse) -> EdgeResponse {
        let outcome = self.evaluate(request, &response).await;
        let metrics = ResizeMetrics::global();

        match outcome {
            TransformOutcome::Transformed(resized) => {
                let ResizedImage {
                    directive,
                    image,
                    elapsed,
                } = &resized;
                metrics.record_outcome("transformed");
                metrics.record_transform(image.format, *elapsed, response.body.len(), image.data.len());
                tracing::info!(
                    uri = %request.uri,
                    resized = %directive.label(),
                    format = image.format.as_str(),
                    source_width = image.original_size.0,
                    source_height = image.original_size.1,
                    output_width = image.output_size.0,
                    output_height = image.output_size.1,
                    source_bytes = response.body.len(),
                    output_bytes = image.data.len(),
                    duration_ms = elapsed.as_millis() as u64,
                    "Image resized"
                );
                apply_transform(response, resized)
            }
            TransformOutcome::PassThrough(reason) => {
                metrics.record_outcome(reason.as_label());
                match &reason {
                    PassThroughReason::TransformFailure { error } => {
                        tracing::error!(
                            uri = %request.uri,
                            error_kind = error.kind(),
                            error = %error,
                            "Image resize error, serving original"
                        );
                    }
                    _ => {
                        tracing::debug!(uri = %request.uri, reason = %reason, "Passing response through");
                    }
                }
                response
            }
        }
    }

    /// Decide what to do with `response` without modifying it.
    ///
    /// Runs the transform when the response qualifies, but records no
    /// metrics and logs nothing; [`handle`](Self::handle) does both.
    pub async fn evaluate(&self, request: &EdgeRequest, response: &EdgeResponse) -> TransformOutcome {
        if !response.is_success() {
            return TransformOutcome::PassThrough(PassThroughReason::UpstreamFailure {
                status: response.status,
            });
        }

        let directive = match self.parser.resolve(&request.uri) {
            Ok(directive) => directive,
            Err(rejection) => return TransformOutcome::PassThrough(rejection.into()),
        };

        let extension = SupportedExtensionSet::extension_of(&directive.target_path);
        if !self.extensions.contains(&extension) {
            return TransformOutcome::PassThrough(PassThroughReason::UnsupportedExtension {
                extension,
            });
        }

        let format = negotiate_format(&request.first_header(&ACCEPT), &extension);
        let transform_request = TransformRequest::new(&directive, format);

        let started = Instant::now();
        match self
            .transform
            .transform(response.body.clone(), transform_request)
            .await
        {
            Ok(image) => TransformOutcome::Transformed(ResizedImage {
                directive,
                image,
                elapsed: started.elapsed(),
            }),
            Err(error) => TransformOutcome::PassThrough(PassThroughReason::TransformFailure { error }),
        }
    }
}

fn apply_transform(mut response: EdgeResponse, resized: ResizedImage) -> EdgeResponse {
    let ResizedImage { directive, image, .. } = resized;
    let format: OutputFormat = image.format;

    response.body = Bytes::from(image.data);
    let headers = &mut response.headers;
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(format.content_type()));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(response.body.len()));
    if let Ok(label) = HeaderValue::from_str(&directive.label()) {
        headers.insert(HeaderName::from_static(HEADER_IMAGE_RESIZED), label);
    }
    add_vary_accept(headers);

    response
}

fn add_vary_accept(headers: &mut HeaderMap) {
    let already_varies = headers.get_all(VARY).iter().any(|value| {
        value
            .to_str()
            .map(|v| {
                v.split(',')
                    .any(|token| token.trim().eq_ignore_ascii_case(vary_header()) || token.trim() == "*")
            })
            .unwrap_or(false)
    });
    if !already_varies {
        headers.append(VARY, HeaderValue::from_static(vary_header()));
    }
}
