//! Source image limits.
//!
//! Bounds checked before an original is fully decoded, so a small file that
//! inflates to enormous dimensions is rejected cheaply.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_SOURCE_BYTES, DEFAULT_MAX_SOURCE_HEIGHT, DEFAULT_MAX_SOURCE_PIXELS,
    DEFAULT_MAX_SOURCE_WIDTH,
};

fn default_max_source_bytes() -> usize {
    DEFAULT_MAX_SOURCE_BYTES
}

fn default_max_source_width() -> u32 {
    DEFAULT_MAX_SOURCE_WIDTH
}

fn default_max_source_height() -> u32 {
    DEFAULT_MAX_SOURCE_HEIGHT
}

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLimits {
    /// Maximum original body size in bytes (default: 50 MB)
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
    /// Maximum original width in pixels
    #[serde(default = "default_max_source_width")]
    pub max_source_width: u32,
    /// Maximum original height in pixels
    #[serde(default = "default_max_source_height")]
    pub max_source_height: u32,
    /// Maximum original width * height
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
}

impl Default for SourceLimits {
    fn default() -> Self {
        Self {
            max_source_bytes: default_max_source_bytes(),
            max_source_width: default_max_source_width(),
            max_source_height: default_max_source_height(),
            max_source_pixels: default_max_source_pixels(),
        }
    }
}

impl SourceLimits {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.max_source_bytes == 0 {
            return Err("limits.max_source_bytes must be greater than 0".to_string());
        }
        if self.max_source_width == 0 || self.max_source_height == 0 {
            return Err("limits.max_source_width/height must be greater than 0".to_string());
        }
        if self.max_source_pixels == 0 {
            return Err("limits.max_source_pixels must be greater than 0".to_string());
        }
        Ok(())
    }
}
