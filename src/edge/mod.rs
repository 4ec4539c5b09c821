//! Request/response data shape exchanged with the hosting platform.
//!
//! The rewriter and the transformer run as separate invocations and share
//! nothing but these values: a request (path, query string, headers) and an
//! upstream response (status, headers, body).

use std::borrow::Cow;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// A viewer or origin request as seen by the edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeRequest {
    /// Request path, without query string
    pub uri: String,
    /// Raw query string, without the leading `?`
    pub querystring: String,
    pub headers: HeaderMap,
}

impl EdgeRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            querystring: String::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Split a request target such as `/images/1x1/a.jpg?v=2` into path and query.
    pub fn from_target(target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self {
                querystring: query.to_string(),
                ..Self::new(path)
            },
            None => Self::new(target),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// First value of `name`, or an empty string when absent.
    ///
    /// Bytes outside visible ASCII (obs-text) are decoded lossily, so the
    /// rest of the value stays searchable.
    pub fn first_header(&self, name: &HeaderName) -> Cow<'_, str> {
        self.headers
            .get(name)
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
            .unwrap_or(Cow::Borrowed(""))
    }
}

/// An upstream (object store) response, possibly rewritten by the transformer.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl EdgeResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, Bytes::new())
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }
}
