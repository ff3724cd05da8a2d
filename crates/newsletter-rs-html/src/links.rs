//! Campaign parameters for same-site links.

use chrono::{Datelike, Local, NaiveDate};
use newsletter_rs_core::error::NewsletterResult;
use newsletter_rs_core::Settings;
use url::{ParseError, Url};

use crate::dom::{self, Fragment};

/// Appends `utm_*` parameters to every link pointing at one site.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use newsletter_rs_html::LinkDecorator;
///
/// let decorator = LinkDecorator::new("example.com")
///     .with_date(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
/// assert_eq!(
///     decorator.decorate_href("/posts/hello/"),
///     "/posts/hello/?utm_source=example.com&utm_medium=email&utm_campaign=newsletter-2410"
/// );
/// assert_eq!(decorator.decorate_href("https://other.org/"), "https://other.org/");
/// ```
#[derive(Debug, Clone)]
pub struct LinkDecorator {
    domain: String,
    source: String,
    medium: String,
    prefix: String,
    date: NaiveDate,
}

impl LinkDecorator {
    /// Creates a decorator for `domain`, using it as the source and today's
    /// date for the campaign name.
    pub fn new(domain: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            source: domain.clone(),
            domain,
            medium: "email".to_string(),
            prefix: "newsletter".to_string(),
            date: Local::now().date_naive(),
        }
    }

    /// Builds a decorator from the site and campaign settings.
    ///
    /// Returns `None` when no site domain can be determined.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let domain = settings.site.domain()?;
        let mut decorator = Self::new(domain);
        if let Some(source) = settings.campaign_source() {
            decorator.source = source;
        }
        decorator.medium.clone_from(&settings.campaign.medium);
        decorator.prefix.clone_from(&settings.campaign.name_prefix);
        Some(decorator)
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn with_medium(mut self, medium: impl Into<String>) -> Self {
        self.medium = medium.into();
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Campaign name: the prefix followed by the two-digit ISO week-based
    /// year and ISO week of the render date.
    pub fn campaign(&self) -> String {
        let week = self.date.iso_week();
        format!(
            "{}-{:02}{:02}",
            self.prefix,
            week.year().rem_euclid(100),
            week.week()
        )
    }

    /// The query parameters appended to decorated links.
    pub fn suffix(&self) -> String {
        format!(
            "utm_source={}&utm_medium={}&utm_campaign={}",
            self.source,
            self.medium,
            self.campaign()
        )
    }

    /// Returns `true` if `href` points at the decorator's site.
    ///
    /// Relative hrefs always do. Absolute ones must carry a host equal to the
    /// site domain, ignoring case and a leading `www.`.
    pub fn is_same_site(&self, href: &str) -> bool {
        let parsed = if href.starts_with("//") {
            Url::parse(&format!("https:{href}"))
        } else {
            Url::parse(href)
        };
        match parsed {
            Ok(url) => url
                .host_str()
                .is_some_and(|host| bare_host(host) == bare_host(&self.domain)),
            Err(ParseError::RelativeUrlWithoutBase) => true,
            Err(_) => false,
        }
    }

    /// Decorates a single href, or returns it unchanged when it points
    /// elsewhere or already carries campaign parameters.
    pub fn decorate_href(&self, href: &str) -> String {
        if href.contains("utm_source") || !self.is_same_site(href) {
            return href.to_string();
        }

        let suffix = self.suffix();
        let (base, fragment) = match href.split_once('#') {
            Some((base, fragment)) => (base, Some(fragment)),
            None => (href, None),
        };

        let mut out = String::with_capacity(href.len() + suffix.len() + 2);
        out.push_str(base);
        if base.contains('?') {
            if !base.ends_with('?') && !base.ends_with('&') {
                out.push('&');
            }
        } else {
            out.push('?');
        }
        out.push_str(&suffix);
        if let Some(fragment) = fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    /// Decorates every `<a href>` in `html`.
    ///
    /// # Errors
    ///
    /// Returns `HtmlError` if the fragment cannot be parsed or serialized.
    pub fn try_decorate(&self, html: &str) -> NewsletterResult<String> {
        let fragment = Fragment::parse(html)?;
        let mut decorated = 0;
        for link in fragment.find_all(|h| dom::is_tag(h, "a")) {
            let Some(href) = dom::get_attr(&link, "href") else {
                continue;
            };
            let new_href = self.decorate_href(&href);
            if new_href != href {
                dom::set_attr(&link, "href", &new_href);
                decorated += 1;
            }
        }
        tracing::debug!(decorated, domain = %self.domain, "decorated links");
        fragment.serialize()
    }

    /// Decorates every `<a href>` in `html`, returning the input unchanged
    /// (with a warning) on failure.
    pub fn decorate(&self, html: &str) -> String {
        match self.try_decorate(html) {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(error = %e, "link decoration failed, using original content");
                html.to_string()
            }
        }
    }
}

/// Decorates same-site links in `html` for `site_domain`, dated today.
pub fn decorate(html: &str, site_domain: &str) -> String {
    LinkDecorator::new(site_domain).decorate(html)
}

fn bare_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = "utm_source=example.com&utm_medium=email&utm_campaign=newsletter-2410";

    fn decorator() -> LinkDecorator {
        LinkDecorator::new("example.com").with_date(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
    }

    #[test]
    fn test_campaign_uses_iso_week_year() {
        let d = LinkDecorator::new("x.com");
        // 2021-01-01 falls in ISO week 53 of 2020.
        assert_eq!(
            d.clone().with_date(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()).campaign(),
            "newsletter-2053"
        );
        // 2024-12-30 falls in ISO week 1 of 2025.
        assert_eq!(
            d.with_date(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()).campaign(),
            "newsletter-2501"
        );
    }

    #[test]
    fn test_relative_href() {
        assert_eq!(decorator().decorate_href("/about"), format!("/about?{SUFFIX}"));
    }

    #[test]
    fn test_query_string_uses_ampersand() {
        assert_eq!(
            decorator().decorate_href("/search?q=rust"),
            format!("/search?q=rust&{SUFFIX}")
        );
        assert_eq!(decorator().decorate_href("/search?"), format!("/search?{SUFFIX}"));
    }

    #[test]
    fn test_fragment_stays_last() {
        assert_eq!(decorator().decorate_href("#top"), format!("?{SUFFIX}#top"));
        assert_eq!(
            decorator().decorate_href("/p?a=1#c"),
            format!("/p?a=1&{SUFFIX}#c")
        );
    }

    #[test]
    fn test_same_site_absolute() {
        assert_eq!(
            decorator().decorate_href("https://www.Example.com/post/"),
            format!("https://www.Example.com/post/?{SUFFIX}")
        );
        assert_eq!(
            decorator().decorate_href("//example.com/x"),
            format!("//example.com/x?{SUFFIX}")
        );
    }

    #[test]
    fn test_other_sites_skipped() {
        let d = decorator();
        for href in [
            "https://other.org/page",
            "https://sub.example.com/",
            "mailto:hi@example.com",
            "tel:+123",
        ] {
            assert_eq!(d.decorate_href(href), href);
        }
    }

    #[test]
    fn test_already_decorated_unchanged() {
        let once = decorator().decorate_href("/a?b=1");
        assert_eq!(decorator().decorate_href(&once), once);
    }

    #[test]
    fn test_custom_campaign_fields() {
        let d = decorator().with_source("blog").with_medium("mail").with_prefix("digest");
        assert_eq!(
            d.decorate_href("/x"),
            "/x?utm_source=blog&utm_medium=mail&utm_campaign=digest-2410"
        );
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        assert!(LinkDecorator::from_settings(&settings).is_none());

        settings.site.website_url = "https://blog.example.com".into();
        let d = LinkDecorator::from_settings(&settings)
            .unwrap()
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert!(d.is_same_site("https://blog.example.com/a"));
        assert!(d.suffix().starts_with("utm_source=blog.example.com&utm_medium=email"));

        settings.campaign.source = Some("weekly".into());
        let d = LinkDecorator::from_settings(&settings).unwrap();
        assert!(d.suffix().starts_with("utm_source=weekly&"));
    }

    #[test]
    fn test_decorate_fragment() {
        let html = r#"<p><a href="/a">A</a> <a href="https://other.org/">B</a> <a>C</a></p>"#;
        let out = decorator().decorate(html);
        // Serialized attributes escape `&`.
        assert!(out.contains(&format!(
            r#"<a href="/a?{}">A</a>"#,
            SUFFIX.replace('&', "&amp;")
        )));
        assert!(out.contains(r#"<a href="https://other.org/">B</a>"#));
        assert!(out.contains("<a>C</a>"));
    }

    #[test]
    fn test_decorate_is_stable_on_second_run() {
        let html = r#"<a href="/a?x=1#f">A</a>"#;
        let once = decorator().decorate(html);
        assert_eq!(decorator().decorate(&once), once);
    }
    #[test]
    fn test_decorate_keeps_leading_style_block() {
        let html = r#"<style>.x{color:red}</style><p><a href="https://other.org/">B</a></p>"#;
        assert_eq!(decorator().decorate(html), html);
    }
}
