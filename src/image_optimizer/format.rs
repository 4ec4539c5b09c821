//! Output format negotiation based on the Accept header
//!
//! The rule is deliberately narrow:
//! - any Accept value containing `image/webp` gets WebP
//! - otherwise a `.png` original stays PNG
//! - everything else (jpg, jpeg, gif, webp without negotiation) becomes JPEG

use super::params::OutputFormat;

const WEBP_MEDIA_TYPE: &str = "image/webp";

/// Select the output format for a response
///
/// # Arguments
/// * `accept_header` - First Accept value sent by the client, `""` when absent
/// * `extension` - Lowercased extension of the requested original
pub fn negotiate_format(accept_header: &str, extension: &str) -> OutputFormat {
    if accept_header.contains(WEBP_MEDIA_TYPE) {
        OutputFormat::WebP
    } else if extension == "png" {
        OutputFormat::Png
    } else {
        OutputFormat::Jpeg
    }
}

/// Get the Vary header value for negotiated responses
pub fn vary_header() -> &'static str {
    "Accept"
}
