//! Callout card styling.
//!
//! Callout cards (`div.kg-callout-card`) get their palette inlined on the
//! container, on `div.kg-callout-text`, and on the emphasis elements inside
//! the text, which would otherwise lose their color in most clients.

use std::sync::OnceLock;

use markup5ever_rcdom::Handle;
use regex::Regex;

use crate::dom::{self, Fragment};
use crate::styles::{CalloutVariant, Palette};

const EMPHASIS_TAGS: [&str; 4] = ["i", "em", "strong", "b"];

/// Matches a `white-space: pre-wrap` declaration inside a style attribute.
pub(crate) fn pre_wrap() -> &'static Regex {
    static PRE_WRAP: OnceLock<Regex> = OnceLock::new();
    PRE_WRAP.get_or_init(|| Regex::new(r"white-space:\s*pre-wrap").unwrap())
}

/// Styles every callout card in the fragment. Returns how many were styled.
pub fn style_callouts(fragment: &Fragment) -> usize {
    let cards = fragment.find_all(dom::tag_with_class("div", "kg-callout-card"));
    for card in &cards {
        let variant = CalloutVariant::from_classes(&dom::get_attr(card, "class").unwrap_or_default());
        style_card(card, variant.palette());
    }
    cards.len()
}

fn style_card(card: &Handle, palette: Palette) {
    dom::set_attr(card, "style", &palette.container_style());

    let Some(text) = dom::find_first(card, dom::tag_with_class("div", "kg-callout-text")) else {
        return;
    };
    dom::set_attr(&text, "style", &palette.text_style());

    let emphasis = dom::descendants(&text, |h| {
        dom::tag_name(h).is_some_and(|tag| EMPHASIS_TAGS.contains(&tag))
    });
    for elem in emphasis {
        let existing = dom::get_attr(&elem, "style").unwrap_or_default();
        let style = if pre_wrap().is_match(&existing) {
            pre_wrap()
                .replace_all(&existing, palette.emphasis_pre_wrap().as_str())
                .into_owned()
        } else {
            palette.emphasis_style()
        };
        dom::set_attr(&elem, "style", &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(html: &str) -> (usize, String) {
        let fragment = Fragment::parse(html).unwrap();
        let n = style_callouts(&fragment);
        (n, fragment.serialize().unwrap())
    }

    #[test]
    fn test_blue_callout() {
        let (n, html) = styled(
            r#"<div class="kg-card kg-callout-card kg-callout-card-blue"><div class="kg-callout-emoji">💡</div><div class="kg-callout-text">Note</div></div>"#,
        );
        assert_eq!(n, 1);
        assert!(html.contains("background-color: #e7f3ff; border: 1px solid #b3d9ff;"));
        assert!(html.contains(
            r#"<div class="kg-callout-text" style="color: #0c5aa6; font-size: 16px; line-height: 1.5; margin: 0;">Note</div>"#
        ));
    }

    #[test]
    fn test_untagged_callout_is_grey() {
        let (_, html) = styled(r#"<div class="kg-callout-card"><div class="kg-callout-text">x</div></div>"#);
        assert!(html.contains("background-color: #f8f9fa; border: 1px solid #e9ecef;"));
        assert!(html.contains("color: #495057; font-size: 16px;"));
    }

    #[test]
    fn test_callout_without_text_div() {
        let (n, html) = styled(r#"<div class="kg-callout-card kg-callout-card-red">plain</div>"#);
        assert_eq!(n, 1);
        assert!(html.contains("background-color: #f8d7da;"));
        assert!(html.contains(">plain</div>"));
    }

    #[test]
    fn test_emphasis_with_pre_wrap_is_merged() {
        let (_, html) = styled(
            r#"<div class="kg-callout-card kg-callout-card-green"><div class="kg-callout-text"><em style="white-space: pre-wrap;">hi</em><strong>bold</strong></div></div>"#,
        );
        assert!(html.contains(
            r#"<em style="white-space: pre-wrap; color: #0f5132; display: block; word-wrap: break-word;">hi</em>"#
        ));
        assert!(html.contains(
            r#"<strong style="color: #0f5132; word-wrap: break-word;">bold</strong>"#
        ));
    }

    #[test]
    fn test_emphasis_outside_text_div_untouched() {
        let (_, html) = styled(
            r#"<div class="kg-callout-card"><b>outside</b><div class="kg-callout-text">in</div></div>"#,
        );
        assert!(html.contains("<b>outside</b>"));
    }

    #[test]
    fn test_non_callout_divs_untouched() {
        let input = r#"<div class="kg-callout-cardish">x</div>"#;
        let (n, html) = styled(input);
        assert_eq!(n, 0);
        assert_eq!(html, input);
    }
}
