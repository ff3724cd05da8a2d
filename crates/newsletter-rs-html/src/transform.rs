//! The email-safety transformer.
//!
//! Each call parses its own DOM, runs a fixed sequence of passes, and
//! serializes the body. Generic element styling runs first so the rebuilt
//! bookmark markup keeps its own styles.

use newsletter_rs_core::error::NewsletterResult;

use crate::bookmark::rebuild_bookmarks;
use crate::callout::{pre_wrap, style_callouts};
use crate::dom::{self, Fragment};
use crate::styles;

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Counts of what a transformation touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub elements_styled: usize,
    pub bookmarks: usize,
    pub callouts: usize,
}

/// Rewrites `html` into inline-styled, email-safe markup.
///
/// # Errors
///
/// Returns `HtmlError` if the fragment cannot be parsed or serialized.
pub fn try_transform(html: &str) -> NewsletterResult<String> {
    let fragment = Fragment::parse(html)?;
    let stats = apply_passes(&fragment);
    tracing::debug!(
        elements = stats.elements_styled,
        bookmarks = stats.bookmarks,
        callouts = stats.callouts,
        "transformed fragment"
    );
    fragment.serialize()
}

/// Rewrites `html` into inline-styled, email-safe markup.
///
/// On failure the input is returned unchanged and a warning is logged.
///
/// # Examples
///
/// ```
/// use newsletter_rs_html::transform;
///
/// let out = transform(r#"<img src="a.png" width="600" height="400">"#);
/// assert!(!out.contains("width=\""));
/// assert!(out.contains("border-radius: 4px"));
/// ```
pub fn transform(html: &str) -> String {
    match try_transform(html) {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(error = %e, "HTML transformation failed, using original content");
            html.to_string()
        }
    }
}

fn apply_passes(fragment: &Fragment) -> TransformStats {
    let mut styled = 0;

    styled += style_all(fragment, "p", styles::PARAGRAPH);

    for img in fragment.find_all(|h| dom::is_tag(h, "img")) {
        dom::set_attr(&img, "style", styles::IMAGE);
        dom::remove_attr(&img, "width");
        dom::remove_attr(&img, "height");
        styled += 1;
    }

    for (tag, size) in HEADINGS.iter().zip(styles::HEADING_SIZES) {
        styled += style_all(fragment, tag, &styles::heading(size));
    }

    styled += style_all(fragment, "a", styles::LINK);

    for caption in fragment.find_all(|h| dom::is_tag(h, "figcaption")) {
        dom::set_attr(&caption, "style", styles::FIGCAPTION);
        styled += 1;
        for span in dom::descendants(&caption, |h| dom::is_tag(h, "span")) {
            let existing = dom::get_attr(&span, "style").unwrap_or_default();
            let style = if pre_wrap().is_match(&existing) {
                pre_wrap()
                    .replace_all(&existing, styles::CAPTION_SPAN_PRE_WRAP)
                    .into_owned()
            } else {
                styles::CAPTION_SPAN.to_string()
            };
            dom::set_attr(&span, "style", &style);
        }
    }

    TransformStats {
        elements_styled: styled,
        bookmarks: rebuild_bookmarks(fragment),
        callouts: style_callouts(fragment),
    }
}

fn style_all(fragment: &Fragment, tag: &str, style: &str) -> usize {
    let found = fragment.find_all(|h| dom::is_tag(h, tag));
    for elem in &found {
        dom::set_attr(elem, "style", style);
    }
    found.len()
}
