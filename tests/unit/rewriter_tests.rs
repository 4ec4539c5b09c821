// Request rewriter unit tests

use edge_resizer::config::ResizeConfig;
use edge_resizer::edge::EdgeRequest;
use edge_resizer::rewriter::RequestRewriter;
use http::header::{ACCEPT, USER_AGENT};
use http::HeaderValue;
use rstest::rstest;

fn rewriter() -> RequestRewriter {
    RequestRewriter::new(&ResizeConfig::default())
}

#[rstest]
#[case("/original/product.jpg")]
#[case("/images/abc/product.jpg")]
#[case("/images/300x200")]
#[case("/favicon.ico")]
#[case("/")]
fn test_identity_for_non_directives(#[case] uri: &str) {
    let request = EdgeRequest::new(uri).with_header(USER_AGENT, HeaderValue::from_static("curl"));
    assert_eq!(rewriter().rewrite(request.clone()), request);
}

#[rstest]
#[case("/images/300x200/80/product.jpg", "/original/product.jpg", "300", "200", "80")]
#[case("/images/1x2/3/x/y/z.gif", "/original/x/y/z.gif", "1", "2", "3")]
#[case("/images/640x480/photo.webp", "/original/photo.webp", "640", "480", "80")]
#[case("/images/99999x99999/a.jpg", "/original/a.jpg", "99999", "99999", "80")]
fn test_directive_rewrites(
    #[case] uri: &str,
    #[case] origin: &str,
    #[case] width: &str,
    #[case] height: &str,
    #[case] quality: &str,
) {
    let out = rewriter().rewrite(EdgeRequest::new(uri));
    assert_eq!(out.uri, origin);
    assert_eq!(out.headers["x-resize-width"], width);
    assert_eq!(out.headers["x-resize-height"], height);
    assert_eq!(out.headers["x-resize-quality"], quality);
}

#[test]
fn test_existing_headers_survive() {
    let request = EdgeRequest::from_target("/images/300x200/product.jpg?cb=1")
        .with_header(ACCEPT, HeaderValue::from_static("image/webp,*/*"));
    let out = rewriter().rewrite(request);
    assert_eq!(out.headers[ACCEPT], "image/webp,*/*");
    assert_eq!(out.querystring, "cb=1");
}

#[test]
fn test_rewrite_is_not_reapplied_to_its_output() {
    let once = rewriter().rewrite(EdgeRequest::new("/images/300x200/80/product.jpg"));
    let twice = rewriter().rewrite(once.clone());
    assert_eq!(once, twice);
}
