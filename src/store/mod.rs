//! Origin object stores
//!
//! The object store sits behind the rewriter: it receives the rewritten
//! `/original/...` path and answers with a plain HTTP-shaped response.
//! Failures are expressed as status codes rather than errors, since the
//! transformer passes any non-200 response straight through.
//!
//! - **LocalObjectStore**: objects under a directory on disk (tokio::fs)
//! - **MemoryObjectStore**: in-memory map, used in tests and benches

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::edge::EdgeResponse;

/// Serves original objects by request path
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the object at `path` (e.g. `/original/product.jpg`)
    async fn fetch(&self, path: &str) -> EdgeResponse;
}

/// Content type for an object key, by extension
pub fn content_type_for(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

fn object_response(path: &str, data: Bytes) -> EdgeResponse {
    let length = data.len();
    EdgeResponse::ok(data)
        .with_header(CONTENT_TYPE, HeaderValue::from_static(content_type_for(path)))
        .with_header(CONTENT_LENGTH, HeaderValue::from(length))
}

/// Objects stored as files below `root`.
///
/// The request path maps to `root` joined with the path's normal
/// components; any `..` or prefix component is refused with 404.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a request path to a file below the root
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        let mut has_segment = false;
        for component in Path::new(path).components() {
            match component {
                Component::RootDir | Component::CurDir => {}
                Component::Normal(segment) => {
                    resolved.push(segment);
                    has_segment = true;
                }
                Component::ParentDir | Component::Prefix(_) => return None,
            }
        }
        has_segment.then_some(resolved)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn fetch(&self, path: &str) -> EdgeResponse {
        let Some(file) = self.resolve(path) else {
            tracing::warn!(path = %path, "Refusing object path outside store root");
            return EdgeResponse::not_found();
        };

        match tokio::fs::read(&file).await {
            Ok(data) => object_response(path, Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path, "Object not found");
                EdgeResponse::not_found()
            }
            Err(e) => {
                tracing::error!(path = %path, error = %e, "Failed to read object");
                EdgeResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Bytes::new())
            }
        }
    }
}

/// In-memory object store keyed by request path
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, data: impl Into<Bytes>) {
        self.objects.write().insert(path.into(), data.into());
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn fetch(&self, path: &str) -> EdgeResponse {
        let data = self.objects.read().get(path).cloned();
        match data {
            Some(data) => object_response(path, data),
            None => EdgeResponse::not_found(),
        }
    }
}
