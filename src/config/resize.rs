//! Resize directive configuration.
//!
//! Controls the URL grammar prefixes, the extension allow-list and the
//! bounds applied to every parsed directive. Default values are sourced
//! from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_ORIGINAL_PREFIX, DEFAULT_QUALITY,
    DEFAULT_RESIZE_PREFIX, DEFAULT_SUPPORTED_EXTENSIONS,
};

fn default_resize_prefix() -> String {
    DEFAULT_RESIZE_PREFIX.to_string()
}

fn default_original_prefix() -> String {
    DEFAULT_ORIGINAL_PREFIX.to_string()
}

fn default_supported_extensions() -> Vec<String> {
    DEFAULT_SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_max_height() -> u32 {
    DEFAULT_MAX_HEIGHT
}

fn default_forward_hint_headers() -> bool {
    true
}

/// Settings shared by the request rewriter and the response transformer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeConfig {
    /// Prefix of client-facing resize URLs, without trailing slash
    #[serde(default = "default_resize_prefix")]
    pub resize_prefix: String,

    /// Prefix of original objects in the store, without trailing slash
    #[serde(default = "default_original_prefix")]
    pub original_prefix: String,

    /// Lowercase extensions eligible for transformation
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,

    /// Quality used when the URL has no quality segment (1-100)
    #[serde(default = "default_quality")]
    pub default_quality: u8,

    /// Maximum output width; larger requests are clamped
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    /// Maximum output height; larger requests are clamped
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Attach `x-resize-*` hint headers to rewritten requests
    #[serde(default = "default_forward_hint_headers")]
    pub forward_hint_headers: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            resize_prefix: default_resize_prefix(),
            original_prefix: default_original_prefix(),
            supported_extensions: default_supported_extensions(),
            default_quality: default_quality(),
            max_width: default_max_width(),
            max_height: default_max_height(),
            forward_hint_headers: default_forward_hint_headers(),
        }
    }
}

impl ResizeConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, prefix) in [
            ("resize_prefix", &self.resize_prefix),
            ("original_prefix", &self.original_prefix),
        ] {
            if !prefix.starts_with('/') {
                return Err(format!("{} '{}' must start with /", name, prefix));
            }
            if prefix.len() > 1 && prefix.ends_with('/') {
                return Err(format!("{} '{}' must not end with /", name, prefix));
            }
            if prefix == "/" {
                return Err(format!("{} cannot be the root path", name));
            }
        }

        if self.resize_prefix == self.original_prefix {
            return Err(format!(
                "resize_prefix and original_prefix must differ (both are '{}')",
                self.resize_prefix
            ));
        }

        if self.supported_extensions.is_empty() {
            return Err("supported_extensions cannot be empty".to_string());
        }
        for ext in &self.supported_extensions {
            if ext.is_empty() || ext.contains('.') || ext.contains('/') {
                return Err(format!(
                    "supported extension '{}' must be a bare token like 'jpg'",
                    ext
                ));
            }
        }

        if !(1..=100).contains(&self.default_quality) {
            return Err(format!(
                "default_quality {} must be between 1 and 100",
                self.default_quality
            ));
        }

        if self.max_width == 0 || self.max_height == 0 {
            return Err("max_width and max_height must be greater than 0".to_string());
        }

        Ok(())
    }
}
