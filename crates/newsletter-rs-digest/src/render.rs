//! Rendering a digest and personalizing the result per recipient.

use newsletter_rs_core::error::NewsletterResult;
use newsletter_rs_core::Settings;
use newsletter_rs_template::{Context, ContextValue, Renderer};
use serde_json::json;

use crate::digest::Digest;

/// The per-recipient variable bound after the main render.
pub const UNSUBSCRIBE_VAR: &str = "unsubscribe_url";

/// Fallback values for the standard newsletter template keys.
pub fn newsletter_defaults() -> Context {
    Context::from(json!({
        "blog_title": "Newsletter",
        "newsletter_interval": "weekly",
        "newsletter_date": "Recent",
        "featured_title": "Latest Updates",
        "featured_content": "<p>Check out our latest content!</p>",
        "featured_url": "#",
        "posts": [],
        "blog_logo": "",
        "social_twitter_url": "",
        "newsletter_archive_url": "",
    }))
}

/// Builds the renderer used for digests.
///
/// Settings defaults sit above the standard newsletter defaults, the
/// digest's conditions are installed, and the unsubscribe placeholder is
/// always late-bound.
pub fn digest_renderer(digest: &Digest, settings: &Settings) -> Renderer {
    let configured: Context = settings
        .template
        .defaults
        .iter()
        .map(|(k, v)| (k.clone(), ContextValue::from(v.clone())))
        .collect();

    let mut renderer = Renderer::new()
        .with_defaults(newsletter_defaults())
        .with_defaults(configured)
        .with_conditions(&digest.conditions());
    for name in &settings.template.late_bound {
        renderer.add_late_bound(name.clone());
    }
    renderer.add_late_bound(UNSUBSCRIBE_VAR);
    renderer.set_auto_escape(settings.template.auto_escape);
    renderer
}

/// Renders `template` for `digest`. The unsubscribe placeholder survives for
/// [`personalize`].
pub fn render_digest(template: &str, digest: &Digest, settings: &Settings) -> String {
    let _span = newsletter_rs_core::logging::render_span(&digest.date).entered();
    digest_renderer(digest, settings).render(template, &digest.context())
}

/// Renders like [`render_digest`], but fails on unbalanced region markers or
/// raw placeholders left without a value.
pub fn try_render_digest(
    template: &str,
    digest: &Digest,
    settings: &Settings,
) -> NewsletterResult<String> {
    let _span = newsletter_rs_core::logging::render_span(&digest.date).entered();
    digest_renderer(digest, settings).render_strict(template, &digest.context())
}

/// Binds the unsubscribe link in an already rendered issue.
///
/// # Examples
///
/// ```
/// use newsletter_rs_digest::personalize;
///
/// let html = personalize("<a href=\"{{unsubscribe_url}}\">Unsubscribe</a> {{{other}}}", "https://x/u");
/// assert_eq!(html, "<a href=\"https://x/u\">Unsubscribe</a> {{{other}}}");
/// ```
pub fn personalize(rendered: &str, unsubscribe_url: &str) -> String {
    let bindings: Context = [(UNSUBSCRIBE_VAR, unsubscribe_url)].into_iter().collect();
    Renderer::new().bind_late(rendered, &bindings)
}

/// The members-portal page where subscribers manage their newsletters.
pub fn portal_unsubscribe_url(website_url: &str) -> String {
    format!(
        "{}/#/portal/account/newsletters",
        website_url.trim_end_matches('/')
    )
}
