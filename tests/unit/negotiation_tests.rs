// Output format negotiation unit tests

use edge_resizer::image_optimizer::{negotiate_format, OutputFormat};
use rstest::rstest;

#[rstest]
#[case("image/webp,*/*", "jpg", OutputFormat::WebP)]
#[case("text/html,image/webp;q=0.9", "gif", OutputFormat::WebP)]
#[case("image/webp", "png", OutputFormat::WebP)]
#[case("", "png", OutputFormat::Png)]
#[case("image/png", "png", OutputFormat::Png)]
#[case("", "jpg", OutputFormat::Jpeg)]
#[case("", "jpeg", OutputFormat::Jpeg)]
#[case("*/*", "gif", OutputFormat::Jpeg)]
#[case("image/avif", "webp", OutputFormat::Jpeg)]
#[case("IMAGE/WEBP", "jpg", OutputFormat::Jpeg)]
fn test_negotiate_format(
    #[case] accept: &str,
    #[case] extension: &str,
    #[case] expected: OutputFormat,
) {
    assert_eq!(negotiate_format(accept, extension), expected);
}

#[test]
fn test_content_types() {
    assert_eq!(OutputFormat::Jpeg.content_type(), "image/jpeg");
    assert_eq!(OutputFormat::Png.content_type(), "image/png");
    assert_eq!(OutputFormat::WebP.content_type(), "image/webp");
}
