// Constants module - centralized default values for configuration
//
// Every serde default in `crate::config` resolves to one of these, so an
// empty configuration document reproduces the reference gateway behavior.

// =============================================================================
// Directive defaults
// =============================================================================

/// Path prefix that marks a resize request (`/images/{W}x{H}/...`)
pub const DEFAULT_RESIZE_PREFIX: &str = "/images";

/// Path prefix under which the object store keeps originals
pub const DEFAULT_ORIGINAL_PREFIX: &str = "/original";

/// File extensions eligible for transformation
pub const DEFAULT_SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Quality applied when the URL omits the quality segment
pub const DEFAULT_QUALITY: u8 = 80;

/// Upper bound for the requested output width
pub const DEFAULT_MAX_WIDTH: u32 = 2000;

/// Upper bound for the requested output height
pub const DEFAULT_MAX_HEIGHT: u32 = 2000;

// =============================================================================
// Source image limits (image bomb protection)
// =============================================================================

/// Maximum original body size accepted for decoding (50 MB)
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 50 * 1024 * 1024;

/// Maximum original width accepted for decoding
pub const DEFAULT_MAX_SOURCE_WIDTH: u32 = 10_000;

/// Maximum original height accepted for decoding
pub const DEFAULT_MAX_SOURCE_HEIGHT: u32 = 10_000;

/// Maximum original pixel count accepted for decoding (100 megapixels)
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000;

// =============================================================================
// Response headers
// =============================================================================

/// Cache policy for transformed variants: one year, never revalidated
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Request header carrying the raw width segment
pub const HEADER_RESIZE_WIDTH: &str = "x-resize-width";

/// Request header carrying the raw height segment
pub const HEADER_RESIZE_HEIGHT: &str = "x-resize-height";

/// Request header carrying the raw (or defaulted) quality segment
pub const HEADER_RESIZE_QUALITY: &str = "x-resize-quality";

/// Diagnostic response header recording the applied `{W}x{H}q{Q}`
pub const HEADER_IMAGE_RESIZED: &str = "x-image-resized";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
