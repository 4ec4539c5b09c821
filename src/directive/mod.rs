//! Resize directive grammar.
//!
//! Client URLs carry the directive in the path:
//!
//! ```text
//! /images/{width}x{height}/{quality}/{path...}   quality explicit
//! /images/{width}x{height}/{path...}             quality = configured default
//! ```
//!
//! `width`, `height` and `quality` are ASCII digit runs; `{path...}` is the
//! non-empty remainder and may contain further `/`. The quality form is tried
//! first, so `/images/10x10/80/a.jpg` has quality 80 and target `a.jpg`,
//! while `/images/10x10/80` has the default quality and target `80`.
//!
//! Both phases parse the same string independently: [`DirectiveParser::parse_raw`]
//! keeps the numbers as written (the rewriter forwards them verbatim) and
//! [`DirectiveParser::resolve`] turns them into a clamped [`ResizeDirective`].

use std::collections::HashSet;

use crate::config::ResizeConfig;

/// Directive segments exactly as they appear in the URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDirective<'a> {
    pub width: &'a str,
    pub height: &'a str,
    /// `None` when the two-segment form matched
    pub quality: Option<&'a str>,
    pub target_path: &'a str,
}

/// A directive with numbers resolved, clamped and defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeDirective {
    pub width: u32,
    pub height: u32,
    /// Always within 1..=100
    pub quality: u8,
    pub target_path: String,
}

impl ResizeDirective {
    /// Diagnostic label `{width}x{height}q{quality}`
    pub fn label(&self) -> String {
        format!("{}x{}q{}", self.width, self.height, self.quality)
    }
}

/// Why a URI did not yield a usable directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveRejection {
    /// The URI does not match either grammar form
    NotADirective,
    /// The grammar matched but a number is zero
    Invalid { reason: &'static str },
}

/// Parses resize URIs for one configured prefix.
#[derive(Debug, Clone)]
pub struct DirectiveParser {
    /// Resize prefix with its trailing slash, e.g. `/images/`
    prefix: String,
    default_quality: u8,
    max_width: u32,
    max_height: u32,
}

impl DirectiveParser {
    pub fn new(config: &ResizeConfig) -> Self {
        Self {
            prefix: format!("{}/", config.resize_prefix),
            default_quality: config.default_quality,
            max_width: config.max_width,
            max_height: config.max_height,
        }
    }

    /// Match `uri` against the grammar without interpreting the numbers.
    pub fn parse_raw<'a>(&self, uri: &'a str) -> Option<RawDirective<'a>> {
        let rest = uri.strip_prefix(self.prefix.as_str())?;
        let (size, rest) = rest.split_once('/')?;
        let (width, height) = size.split_once('x')?;
        if !is_digits(width) || !is_digits(height) {
            return None;
        }

        if let Some((quality, target_path)) = rest.split_once('/') {
            if is_digits(quality) && is_target_path(target_path) {
                return Some(RawDirective {
                    width,
                    height,
                    quality: Some(quality),
                    target_path,
                });
            }
        }

        is_target_path(rest).then_some(RawDirective {
            width,
            height,
            quality: None,
            target_path: rest,
        })
    }

    /// Parse and validate `uri` into the directive the transformer applies.
    ///
    /// Width and height are clamped to the configured maxima and quality to
    /// 100; a zero in any of them rejects the directive.
    pub fn resolve(&self, uri: &str) -> Result<ResizeDirective, DirectiveRejection> {
        let raw = self
            .parse_raw(uri)
            .ok_or(DirectiveRejection::NotADirective)?;

        let width = parse_saturating(raw.width).min(self.max_width);
        let height = parse_saturating(raw.height).min(self.max_height);
        let quality = match raw.quality {
            Some(q) => parse_saturating(q).min(100) as u8,
            None => self.default_quality,
        };

        if width == 0 {
            return Err(DirectiveRejection::Invalid {
                reason: "width must be positive",
            });
        }
        if height == 0 {
            return Err(DirectiveRejection::Invalid {
                reason: "height must be positive",
            });
        }
        if quality == 0 {
            return Err(DirectiveRejection::Invalid {
                reason: "quality must be positive",
            });
        }

        Ok(ResizeDirective {
            width,
            height,
            quality,
            target_path: raw.target_path.to_string(),
        })
    }
}

/// Lowercase extension allow-list.
#[derive(Debug, Clone)]
pub struct SupportedExtensionSet {
    extensions: HashSet<String>,
}

impl SupportedExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ResizeConfig) -> Self {
        Self::new(&config.supported_extensions)
    }

    /// Text after the last `.` of `path`, lowercased.
    ///
    /// A path without any `.` yields the whole path.
    pub fn extension_of(path: &str) -> String {
        path.rsplit('.').next().unwrap_or(path).to_lowercase()
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(&extension.to_lowercase())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// `.` in the grammar never matches a line terminator
fn is_target_path(s: &str) -> bool {
    !s.is_empty() && !s.contains(['\n', '\r', '\u{2028}', '\u{2029}'])
}

// Digit runs too long for u32 are treated as "very large" and get clamped
fn parse_saturating(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
