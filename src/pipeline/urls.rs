//! Local URL rewriting on the Markdown source.
//!
//! Runs *before* the Markdown renderer: the renderer copies URLs from
//! `![alt](url)` and `[text](url)` into `src`/`href` verbatim, so prefixing
//! them in the source is enough and avoids parsing HTML attributes later.
//!
//! A URL is *local* when it does not start with `http://` or `https://`
//! (and, for anchors, `mailto:`). Each prefix rule is one pass over the whole
//! buffer; later rules see the output of earlier ones.
//!
//! ## Limitations
//!
//! Matching stops at the first `)`, so a title containing a closing
//! parenthesis (`![a](b.png "x (y)")`) splits at the wrong place. Reference
//! style links and `<autolinks>` are not touched.

use crate::config::{PipelineConfig, PrefixRule};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Apply the configured image and anchor prefixes to `input`.
///
/// Images are rewritten first (every image rule in order), then anchors.
/// Returns the input unchanged when neither category is configured.
pub fn rewrite_local_urls(input: &str, config: &PipelineConfig) -> String {
    let mut result = input.to_string();

    if let Some(rules) = config.image_rules() {
        for rule in rules.iter() {
            result = rewrite_images(&result, rule);
        }
        debug!("Applied {} image prefix rule(s)", rules.len());
    }

    if let Some(rules) = config.anchor_rules() {
        for rule in rules.iter() {
            result = rewrite_anchors(&result, rule);
        }
        debug!("Applied {} anchor prefix rule(s)", rules.len());
    }

    result
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// ── Images ──────────────────────────────────────────────────────────────────

// ![Alt text](/path/to/img.jpg "Optional title")
static RE_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());

/// Prefix every local image URL starting with `rule.key`.
pub fn rewrite_images(input: &str, rule: &PrefixRule) -> String {
    RE_IMAGE
        .replace_all(input, |caps: &Captures<'_>| {
            let url = &caps[2];
            if !is_absolute(url) && url.starts_with(rule.key.as_str()) {
                format!("![{}]({}{})", &caps[1], rule.prefix, url)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

// ── Anchors ─────────────────────────────────────────────────────────────────
//
// Two shapes share one pattern so a single scan sees them in document order:
//
// 1. `[![alt](img)](url)`: an image wrapped in a link. Only the outer URL is
//    the anchor's; the inner one belongs to the image pass.
// 2. `[text](url)`: a plain link. The optional leading `!` captures images so
//    they are consumed (and left alone) instead of being mistaken for links.
//
// Link text may hold one level of balanced brackets (`[note [1]](x)`). An
// image inside longer link text is part of that text and stays untouched.

static RE_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[(!\[[^\]]*\]\([^)]*\))\]\((.*?)\)|(!?)\[((?:[^\[\]]|\[[^\[\]]*\])*)\]\((.*?)\)",
    )
    .unwrap()
});

/// Prefix every local anchor URL starting with `rule.key`.
///
/// `mailto:` targets are never prefixed.
pub fn rewrite_anchors(input: &str, rule: &PrefixRule) -> String {
    let qualifies = |url: &str| {
        !is_absolute(url) && !url.starts_with("mailto:") && url.starts_with(rule.key.as_str())
    };

    RE_ANCHOR
        .replace_all(input, |caps: &Captures<'_>| {
            if let Some(image) = caps.get(1) {
                let url = &caps[2];
                return if qualifies(url) {
                    format!("[{}]({}{})", image.as_str(), rule.prefix, url)
                } else {
                    caps[0].to_string()
                };
            }

            let is_image = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
            let url = &caps[5];
            if !is_image && qualifies(url) {
                format!("[{}]({}{})", &caps[4], rule.prefix, url)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
