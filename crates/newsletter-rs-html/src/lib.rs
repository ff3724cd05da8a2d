//! # newsletter-rs-html
//!
//! Turns CMS-authored HTML fragments into markup that survives email
//! clients: every element the passes know about gets an inline style,
//! bookmark cards are rebuilt as tables, and callout cards get their palette
//! inlined. [`LinkDecorator`] appends campaign parameters to same-site links.
//!
//! Both entry points fail open: on a parse or serialize error they log a
//! warning and return the input unchanged. Use [`try_transform`] or
//! [`LinkDecorator::try_decorate`] to see the error instead.

pub mod bookmark;
pub mod callout;
pub mod dom;
pub mod links;
pub mod styles;
pub mod transform;

pub use bookmark::{rebuild_bookmarks, Bookmark};
pub use callout::style_callouts;
pub use dom::Fragment;
pub use links::{decorate, LinkDecorator};
pub use styles::CalloutVariant;
pub use transform::{transform, try_transform, TransformStats};
