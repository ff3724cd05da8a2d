//! # newsletter-rs
//!
//! Email-safe newsletter rendering for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `newsletter-rs` to get everything, or depend on
//! individual crates for finer-grained control.
//!
//! ```
//! use newsletter_rs::template::{render, Context};
//! use serde_json::json;
//!
//! let ctx = Context::from(json!({"show": true, "name": "Bruno", "raw": "<i>ok</i>"}));
//! let html = render("{{#if show}}Hello {{name}}{{/if}}{{{raw}}}", &ctx);
//! assert_eq!(html, "Hello Bruno<i>ok</i>");
//! ```

/// Settings, error types, and logging setup.
pub use newsletter_rs_core as core;

/// Conditional regions, interpolation, and the renderer.
#[cfg(feature = "template")]
pub use newsletter_rs_template as template;

/// Inline-style HTML transformation and link decoration.
#[cfg(feature = "html")]
pub use newsletter_rs_html as html;

/// Post selection and newsletter context assembly.
#[cfg(feature = "digest")]
pub use newsletter_rs_digest as digest;

pub use newsletter_rs_core::{NewsletterError, NewsletterResult, Settings};

// Third-party re-exports for user convenience.
pub use chrono;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
