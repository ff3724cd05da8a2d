//! Core error types for newsletter-rs.
//!
//! This module provides [`NewsletterError`], the single error enum shared by
//! every crate in the workspace. Most of the rendering core is total (missing
//! data renders as empty output), so errors are reserved for configuration
//! problems, strict validation, and HTML processing failures that callers
//! usually convert into a fail-open fallback.

use thiserror::Error;

/// The primary error type for newsletter-rs.
///
/// # Examples
///
/// ```
/// use newsletter_rs_core::error::NewsletterError;
///
/// let err = NewsletterError::UnresolvedPlaceholder(vec!["featured_content".into()]);
/// assert_eq!(
///     err.to_string(),
///     "Unresolved raw placeholder(s): featured_content"
/// );
/// assert!(!err.is_fail_open());
/// ```
#[derive(Error, Debug)]
pub enum NewsletterError {
    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing, malformed, or unreadable.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Templates ────────────────────────────────────────────────────

    /// A template contains unbalanced region markers.
    #[error("Template syntax error: {0}")]
    TemplateSyntaxError(String),

    /// Raw placeholders survived rendering because the context had no value
    /// for them.
    #[error("Unresolved raw placeholder(s): {}", .0.join(", "))]
    UnresolvedPlaceholder(Vec<String>),

    // ── HTML ─────────────────────────────────────────────────────────

    /// An HTML fragment could not be parsed, transformed, or serialized.
    #[error("HTML processing error: {0}")]
    HtmlError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred while decoding post or metadata JSON.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl NewsletterError {
    /// Returns `true` for errors that the rendering pipeline recovers from by
    /// falling back to the untransformed input.
    pub const fn is_fail_open(&self) -> bool {
        matches!(self, Self::HtmlError(_))
    }
}

impl From<serde_json::Error> for NewsletterError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, NewsletterError>`.
pub type NewsletterResult<T> = Result<T, NewsletterError>;
