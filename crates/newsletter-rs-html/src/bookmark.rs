//! Bookmark card reconstruction.
//!
//! A bookmark card (`figure.kg-bookmark-card` wrapping an
//! `a.kg-bookmark-container`) relies on flexbox and external CSS. It is
//! rebuilt as a link wrapping a one-row table: a content cell with title,
//! description, and meta line, plus an optional thumbnail cell.

use markup5ever_rcdom::Handle;

use crate::dom::{self, Fragment};
use crate::styles::bookmark as style;

/// Title used when the card has no `div.kg-bookmark-title`.
pub const FALLBACK_TITLE: &str = "Bookmark";

/// The data extracted from a bookmark card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub href: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub author: String,
    pub thumbnail: String,
}

impl Bookmark {
    /// Reads a bookmark card. Returns `None` when it has no container link.
    pub fn extract(card: &Handle) -> Option<Self> {
        let container = dom::find_first(card, dom::tag_with_class("a", "kg-bookmark-container"))?;
        let text_of = |tag: &str, class: &str| {
            dom::find_first(card, dom::tag_with_class(tag, class))
                .map(|h| dom::text_content(&h))
        };

        let thumbnail = dom::find_first(card, dom::tag_with_class("div", "kg-bookmark-thumbnail"))
            .and_then(|cell| dom::find_first(&cell, |h| dom::is_tag(h, "img")))
            .and_then(|img| dom::get_attr(&img, "src"))
            .unwrap_or_default();

        Some(Self {
            href: dom::get_attr(&container, "href").unwrap_or_else(|| "#".to_string()),
            title: text_of("div", "kg-bookmark-title").unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            description: text_of("div", "kg-bookmark-description").unwrap_or_default(),
            icon: dom::find_first(card, dom::tag_with_class("img", "kg-bookmark-icon"))
                .and_then(|img| dom::get_attr(&img, "src"))
                .unwrap_or_default(),
            author: text_of("span", "kg-bookmark-author").unwrap_or_default(),
            thumbnail,
        })
    }

    /// Builds the email-safe replacement markup.
    pub fn to_email_node(&self) -> Handle {
        let content = dom::element("td", &[("style", style::CONTENT_CELL)]);

        let title = dom::element("div", &[("style", style::TITLE)]);
        dom::append(&title, dom::text(&self.title));
        dom::append(&content, title);

        if !self.description.is_empty() {
            let desc = dom::element("div", &[("style", style::DESCRIPTION)]);
            dom::append(&desc, dom::text(&truncate(&self.description, style::DESCRIPTION_LIMIT)));
            dom::append(&content, desc);
        }

        if !self.icon.is_empty() || !self.author.is_empty() {
            let meta = dom::element("div", &[("style", style::META)]);
            if !self.icon.is_empty() {
                dom::append(
                    &meta,
                    dom::element(
                        "img",
                        &[("src", self.icon.as_str()), ("alt", ""), ("style", style::ICON)],
                    ),
                );
            }
            if !self.author.is_empty() {
                let author = dom::element("span", &[]);
                dom::append(&author, dom::text(&self.author));
                dom::append(&meta, author);
            }
            dom::append(&content, meta);
        }

        let row = dom::element("tr", &[]);
        dom::append(&row, content);

        if !self.thumbnail.is_empty() {
            let cell = dom::element("td", &[("style", style::THUMBNAIL_CELL)]);
            dom::append(
                &cell,
                dom::element(
                    "img",
                    &[("src", self.thumbnail.as_str()), ("alt", ""), ("style", style::THUMBNAIL)],
                ),
            );
            dom::append(&row, cell);
        }

        let table = dom::element(
            "table",
            &[
                ("style", style::TABLE),
                ("cellpadding", "0"),
                ("cellspacing", "0"),
                ("border", "0"),
            ],
        );
        dom::append(&table, row);

        let link = dom::element(
            "a",
            &[("href", self.href.as_str()), ("style", style::LINK), ("target", "_blank")],
        );
        dom::append(&link, table);
        link
    }
}

/// Rebuilds every bookmark card in the fragment. Returns how many were rebuilt.
pub fn rebuild_bookmarks(fragment: &Fragment) -> usize {
    let mut rebuilt = 0;
    for card in fragment.find_all(dom::tag_with_class("figure", "kg-bookmark-card")) {
        let Some(bookmark) = Bookmark::extract(&card) else {
            continue;
        };
        if dom::replace(&card, bookmark.to_email_node()) {
            rebuilt += 1;
        }
    }
    rebuilt
}

/// Cuts `text` to `limit` characters and appends `...` when it was longer.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}
