//! Logging integration for newsletter-rs.
//!
//! The rendering crates never print; they emit [`tracing`] events and leave
//! the choice of sink to the host. This module provides the default sink
//! configured from [`Settings`](crate::settings::Settings), plus a helper
//! for per-render spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "newsletter_rs_html=debug"). In debug mode a pretty, human-readable format
/// is used; otherwise a structured JSON format is used.
///
/// Installing a subscriber twice is a no-op; the first one stays active.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one render of a document.
///
/// All events emitted while the span is entered (transformer fallbacks,
/// unresolved placeholders) carry the render ID.
///
/// # Examples
///
/// ```
/// use newsletter_rs_core::logging::render_span;
///
/// let span = render_span("issue-2024-31");
/// let _guard = span.enter();
/// tracing::info!("rendering issue");
/// ```
pub fn render_span(render_id: &str) -> tracing::Span {
    tracing::info_span!("render", id = render_id)
}
