//! # newsletter-rs-digest
//!
//! Shapes already-fetched CMS content into a newsletter issue: selects
//! posts, prepares them for email, and builds the render context and named
//! conditions the standard newsletter template expects.
//!
//! ```
//! use chrono::NaiveDate;
//! use newsletter_rs_core::Settings;
//! use newsletter_rs_digest::{parse_posts, personalize, render_digest, DigestBuilder, PostFilter};
//!
//! let mut settings = Settings::default();
//! settings.site.website_url = "https://blog.example.com".into();
//! settings.site.from_name = "Example".into();
//!
//! let posts = parse_posts(r#"{"posts": [{"title": "Hello", "url": "/hello/", "featured": true}]}"#).unwrap();
//! let posts = PostFilter::new().featured_only(true).apply(posts);
//! let digest = DigestBuilder::new(&settings)
//!     .today(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
//!     .build(&posts);
//!
//! let html = render_digest(
//!     "{{#if_featured_post}}<h1>{{featured_title}}</h1>{{/if_featured_post}}<a href=\"{{unsubscribe_url}}\">x</a>",
//!     &digest,
//!     &settings,
//! );
//! assert_eq!(html, "<h1>Hello</h1><a href=\"{{unsubscribe_url}}\">x</a>");
//! assert_eq!(personalize(&html, "#u"), "<h1>Hello</h1><a href=\"#u\">x</a>");
//! ```

pub mod digest;
pub mod filter;
pub mod latest;
pub mod post;
pub mod prepare;
pub mod render;
pub mod schedule;
pub mod sharing;

pub use digest::{Branding, Digest, DigestBuilder, EmailSettings, NewsletterOptions, SiteMetadata};
pub use filter::{suggest_days_back, PostFilter};
pub use latest::additional_posts_html;
pub use post::{parse_posts, Author, Post, Tag};
pub use prepare::{prepare_posts, DigestPost, PrepareOptions};
pub use render::{
    newsletter_defaults, personalize, portal_unsubscribe_url, render_digest, try_render_digest,
    UNSUBSCRIBE_VAR,
};
pub use schedule::newsletter_date;
pub use sharing::SocialSharing;
