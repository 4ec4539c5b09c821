//! Viewer-request phase: turn a resize URL into an original-object fetch.
//!
//! ```text
//! /images/300x200/80/product.jpg  ->  /original/product.jpg
//! /images/300x200/product.jpg     ->  /original/product.jpg
//! anything else                   ->  unchanged
//! ```
//!
//! Purely a string transform: no I/O and no failure path. A URI that does
//! not match the grammar is not an error, the request just passes through.

use http::{HeaderName, HeaderValue};

use crate::config::ResizeConfig;
use crate::constants::{HEADER_RESIZE_HEIGHT, HEADER_RESIZE_QUALITY, HEADER_RESIZE_WIDTH};
use crate::directive::DirectiveParser;
use crate::edge::EdgeRequest;

#[derive(Debug, Clone)]
pub struct RequestRewriter {
    parser: DirectiveParser,
    original_prefix: String,
    default_quality: String,
    forward_hint_headers: bool,
}

impl RequestRewriter {
    pub fn new(config: &ResizeConfig) -> Self {
        Self {
            parser: DirectiveParser::new(config),
            original_prefix: config.original_prefix.clone(),
            default_quality: config.default_quality.to_string(),
            forward_hint_headers: config.forward_hint_headers,
        }
    }

    /// Rewrite `request` for the origin, or return it untouched.
    ///
    /// The `x-resize-*` headers carry the segments exactly as written (leading
    /// zeros included). They are advisory only: the response phase re-derives
    /// the directive from the viewer URI and never reads them.
    pub fn rewrite(&self, mut request: EdgeRequest) -> EdgeRequest {
        let Some(raw) = self.parser.parse_raw(&request.uri) else {
            tracing::trace!(uri = %request.uri, "No resize directive, passing request through");
            return request;
        };

        let origin_uri = format!("{}/{}", self.original_prefix, raw.target_path);
        let width = raw.width.to_string();
        let height = raw.height.to_string();
        let quality = raw
            .quality
            .unwrap_or(self.default_quality.as_str())
            .to_string();

        tracing::debug!(
            uri = %request.uri,
            origin_uri = %origin_uri,
            width = %width,
            height = %height,
            quality = %quality,
            "Rewrote resize request to original object"
        );

        if self.forward_hint_headers {
            insert_hint(&mut request, HEADER_RESIZE_WIDTH, &width);
            insert_hint(&mut request, HEADER_RESIZE_HEIGHT, &height);
            insert_hint(&mut request, HEADER_RESIZE_QUALITY, &quality);
        }

        request.uri = origin_uri;
        request
    }
}

// Values are ASCII digit runs, always valid header values
fn insert_hint(request: &mut EdgeRequest, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        request
            .headers
            .insert(HeaderName::from_static(name), value);
    }
}
