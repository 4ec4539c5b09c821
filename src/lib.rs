// Edge Resizer Library
// Viewer-request rewriting and origin-response image resizing for a CDN edge

pub mod config;
pub mod constants;
pub mod directive;
pub mod edge;
pub mod error;
pub mod image_optimizer;
pub mod logging;
pub mod pipeline;
pub mod rewriter;
pub mod store;
pub mod transformer;
