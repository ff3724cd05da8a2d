//! Inline style rules for email output.
//!
//! All rules are compile-time constants shared read-only across renders.

use std::fmt;

/// Font stack for body copy and headings.
pub const BODY_FONT_STACK: &str = "Inter, -apple-system, BlinkMacSystemFont, avenir next, avenir, helvetica neue, helvetica, ubuntu, roboto, noto, segoe ui, arial, sans-serif";

/// Font stack for bookmark and callout cards.
pub const CARD_FONT_STACK: &str =
    "Inter, -apple-system, BlinkMacSystemFont, Roboto, Helvetica, Arial, sans-serif";

pub const PARAGRAPH: &str = "font-family: Inter, -apple-system, BlinkMacSystemFont, avenir next, avenir, helvetica neue, helvetica, ubuntu, roboto, noto, segoe ui, arial, sans-serif; font-size: 18px; font-weight: normal; margin: 0 0 16px 0; line-height: 1.6; color: #495057;";

pub const IMAGE: &str = "width: 100%; height: auto; border-radius: 4px; margin: 16px 0;";

pub const LINK: &str = "color: #007bff; text-decoration: none; font-weight: 500;";

pub const FIGCAPTION: &str = "font-family: Inter, -apple-system, BlinkMacSystemFont, avenir next, avenir, helvetica neue, helvetica, ubuntu, roboto, noto, segoe ui, arial, sans-serif; font-size: 14px; color: #738a94; text-align: center; margin: 8px 0 16px 0; line-height: 1.4; font-style: italic;";

/// Caption span style when the span had no `white-space: pre-wrap`.
pub const CAPTION_SPAN: &str = "display: block; word-wrap: break-word;";

/// Replacement for `white-space: pre-wrap` inside caption spans.
pub const CAPTION_SPAN_PRE_WRAP: &str = "white-space: pre-wrap; display: block; word-wrap: break-word";

/// Heading font sizes in pixels, `h1` through `h6`.
pub const HEADING_SIZES: [u32; 6] = [32, 26, 21, 19, 17, 15];

/// Returns the inline style for a heading of the given pixel size.
pub fn heading(size: u32) -> String {
    format!(
        "font-family: {BODY_FONT_STACK}; font-size: {size}px; font-weight: 700; margin: 24px 0 16px 0; line-height: 1.3; color: #2c3e50;"
    )
}

/// Bookmark card styles.
pub mod bookmark {
    pub const LINK: &str = "text-decoration: none; color: inherit; display: block;";
    pub const TABLE: &str = "width: 100%; max-width: 600px; margin: 24px 0; border: 1px solid #e0e7eb; border-radius: 8px; overflow: hidden; background-color: #ffffff;";
    pub const CONTENT_CELL: &str = "padding: 20px; vertical-align: top;";
    pub const TITLE: &str = "font-family: Inter, -apple-system, BlinkMacSystemFont, Roboto, Helvetica, Arial, sans-serif; font-size: 16px; font-weight: 600; color: #15212A; margin-bottom: 8px; line-height: 1.4;";
    pub const DESCRIPTION: &str = "font-family: Inter, -apple-system, BlinkMacSystemFont, Roboto, Helvetica, Arial, sans-serif; font-size: 14px; color: #738a94; margin-bottom: 12px; line-height: 1.5; overflow: hidden; display: -webkit-box; -webkit-line-clamp: 2; -webkit-box-orient: vertical;";
    pub const META: &str = "display: flex; align-items: center; font-family: Inter, -apple-system, BlinkMacSystemFont, Roboto, Helvetica, Arial, sans-serif; font-size: 13px; color: #738a94;";
    pub const ICON: &str = "width: 16px; height: 16px; margin-right: 8px; border-radius: 2px;";
    pub const THUMBNAIL_CELL: &str = "width: 120px; padding: 20px 20px 20px 0; vertical-align: top;";
    pub const THUMBNAIL: &str = "width: 120px; height: 80px; object-fit: cover; border-radius: 4px;";

    /// Descriptions longer than this many characters are cut and get `...`.
    pub const DESCRIPTION_LIMIT: usize = 150;
}

/// Colors for one callout variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

/// Callout card color variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalloutVariant {
    #[default]
    Grey,
    Blue,
    Green,
    Yellow,
    Red,
    Pink,
    Purple,
}

impl CalloutVariant {
    /// Variants recognized from `kg-callout-card-<variant>` classes, in
    /// detection order. Grey is the fallback and is never detected.
    pub const DETECTABLE: [Self; 6] = [
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Red,
        Self::Pink,
        Self::Purple,
    ];

    /// Returns the lowercase variant name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Pink => "pink",
            Self::Purple => "purple",
        }
    }

    /// Picks the variant from a `class` attribute value.
    ///
    /// # Examples
    ///
    /// ```
    /// use newsletter_rs_html::styles::CalloutVariant;
    ///
    /// let v = CalloutVariant::from_classes("kg-card kg-callout-card kg-callout-card-blue");
    /// assert_eq!(v, CalloutVariant::Blue);
    /// assert_eq!(CalloutVariant::from_classes("kg-callout-card"), CalloutVariant::Grey);
    /// ```
    pub fn from_classes(classes: &str) -> Self {
        Self::DETECTABLE
            .into_iter()
            .find(|variant| {
                classes
                    .split_whitespace()
                    .any(|c| c.strip_prefix("kg-callout-card-") == Some(variant.name()))
            })
            .unwrap_or_default()
    }

    /// Returns the variant's colors.
    pub const fn palette(self) -> Palette {
        match self {
            Self::Grey => Palette {
                background: "#f8f9fa",
                border: "#e9ecef",
                text: "#495057",
            },
            Self::Blue => Palette {
                background: "#e7f3ff",
                border: "#b3d9ff",
                text: "#0c5aa6",
            },
            Self::Green => Palette {
                background: "#e8f5e8",
                border: "#c3e6c3",
                text: "#0f5132",
            },
            Self::Yellow => Palette {
                background: "#fff3cd",
                border: "#ffd60a",
                text: "#664d03",
            },
            Self::Red => Palette {
                background: "#f8d7da",
                border: "#f5c2c7",
                text: "#721c24",
            },
            Self::Pink => Palette {
                background: "#f3e2f3",
                border: "#e1bee7",
                text: "#7b1fa2",
            },
            Self::Purple => Palette {
                background: "#e1e7ff",
                border: "#c5d1ff",
                text: "#4c1d95",
            },
        }
    }
}

impl fmt::Display for CalloutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Palette {
    /// Style for the callout container.
    pub fn container_style(&self) -> String {
        format!(
            "background-color: {}; border: 1px solid {}; border-radius: 6px; padding: 16px 20px; margin: 24px 0; font-family: {CARD_FONT_STACK};",
            self.background, self.border
        )
    }

    /// Style for `div.kg-callout-text`.
    pub fn text_style(&self) -> String {
        format!(
            "color: {}; font-size: 16px; line-height: 1.5; margin: 0;",
            self.text
        )
    }

    /// Style for emphasis elements that had no `white-space: pre-wrap`.
    pub fn emphasis_style(&self) -> String {
        format!("color: {}; word-wrap: break-word;", self.text)
    }

    /// Replacement for `white-space: pre-wrap` inside emphasis elements.
    pub fn emphasis_pre_wrap(&self) -> String {
        format!(
            "white-space: pre-wrap; color: {}; display: block; word-wrap: break-word",
            self.text
        )
    }
}
