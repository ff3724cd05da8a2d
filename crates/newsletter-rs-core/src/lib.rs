//! # newsletter-rs-core
//!
//! Settings, error types, and logging setup shared by every newsletter-rs crate.
//! This crate has no rendering logic of its own.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Rendering configuration with defaults
//! - [`settings_loader`] - TOML/JSON loading and environment overrides
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{NewsletterError, NewsletterResult};
pub use settings::{Interval, Settings};
