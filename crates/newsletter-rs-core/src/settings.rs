//! Settings for newsletter-rs.
//!
//! This module provides the [`Settings`] struct, which holds all rendering
//! configuration, grouped into site, campaign, digest, and template sections.
//! Every field has a sensible default, so a partial config file only needs
//! to name what it changes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NewsletterError;

/// How often the newsletter goes out. Drives the date shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// One issue per day.
    Daily,
    /// One issue per week.
    #[default]
    Weekly,
    /// One issue per month.
    Monthly,
}

impl Interval {
    /// Returns the lowercase name used in config files and templates.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = NewsletterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(NewsletterError::ConfigurationError(format!(
                "Unknown newsletter interval '{other}' (expected daily, weekly or monthly)"
            ))),
        }
    }
}

/// Site identity used for absolute URLs and same-site link detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Public URL of the site (e.g. `https://example.com`).
    pub website_url: String,
    /// Host name treated as "same site". Derived from `website_url` when unset.
    pub domain: Option<String>,
    /// Display name of the sender, also the fallback author name.
    pub from_name: String,
}

impl SiteSettings {
    /// Returns the configured domain, or the host of `website_url`.
    ///
    /// # Examples
    ///
    /// ```
    /// use newsletter_rs_core::settings::SiteSettings;
    ///
    /// let site = SiteSettings {
    ///     website_url: "https://blog.example.com/".into(),
    ///     ..SiteSettings::default()
    /// };
    /// assert_eq!(site.domain().as_deref(), Some("blog.example.com"));
    /// ```
    pub fn domain(&self) -> Option<String> {
        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            return Some(domain.to_string());
        }
        url::Url::parse(&self.website_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

/// Campaign-tracking parameters appended to same-site links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSettings {
    /// Value of `utm_source`. Defaults to the site domain.
    pub source: Option<String>,
    /// Value of `utm_medium`.
    pub medium: String,
    /// Prefix of `utm_campaign`; the year and ISO week are appended.
    pub name_prefix: String,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            source: None,
            medium: "email".to_string(),
            name_prefix: "newsletter".to_string(),
        }
    }
}

/// Post selection for a digest issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    /// Maximum number of posts in one issue.
    pub max_posts: usize,
    /// Only posts published within this many days are considered.
    pub days_back: u32,
    /// Sending cadence.
    pub interval: Interval,
    /// Keep only posts carrying at least one of these tags (case-insensitive).
    pub filter_tags: Vec<String>,
    /// Keep only featured posts.
    pub featured_only: bool,
    /// Length (in characters) of excerpts generated from plaintext.
    pub excerpt_length: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            max_posts: 5,
            days_back: 30,
            interval: Interval::Weekly,
            filter_tags: Vec::new(),
            featured_only: false,
            excerpt_length: 200,
        }
    }
}

/// Template engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Variables bound in a second pass, after the main render.
    pub late_bound: Vec<String>,
    /// Whether `{{key}}` substitutions are HTML-escaped.
    pub auto_escape: bool,
    /// Default values layered beneath every render context.
    pub defaults: HashMap<String, serde_json::Value>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            late_bound: vec!["unsubscribe_url".to_string()],
            auto_escape: false,
            defaults: HashMap::new(),
        }
    }
}

/// The complete set of newsletter-rs settings.
///
/// # Examples
///
/// ```
/// use newsletter_rs_core::settings::{Interval, Settings};
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.digest.interval, Interval::Weekly);
/// assert_eq!(settings.campaign.medium, "email");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level or filter directive (e.g. "info", "newsletter_rs_html=debug").
    pub log_level: String,

    // ── Sections ─────────────────────────────────────────────────────

    /// Site identity.
    pub site: SiteSettings,
    /// Link decoration parameters.
    pub campaign: CampaignSettings,
    /// Post selection.
    pub digest: DigestSettings,
    /// Template engine options.
    pub template: TemplateSettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            site: SiteSettings::default(),
            campaign: CampaignSettings::default(),
            digest: DigestSettings::default(),
            template: TemplateSettings::default(),
            extra: HashMap::new(),
        }
    }
}

impl Settings {
    /// Returns the `utm_source` value: the configured source, else the site domain.
    pub fn campaign_source(&self) -> Option<String> {
        self.campaign
            .source
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| self.site.domain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.digest.max_posts, 5);
        assert_eq!(s.digest.days_back, 30);
        assert_eq!(s.digest.excerpt_length, 200);
        assert!(!s.digest.featured_only);
        assert_eq!(s.campaign.name_prefix, "newsletter");
        assert_eq!(s.template.late_bound, vec!["unsubscribe_url".to_string()]);
        assert!(!s.template.auto_escape);
    }

    #[test]
    fn test_interval_from_str() {
        assert_eq!("Weekly".parse::<Interval>().unwrap(), Interval::Weekly);
        assert_eq!(" monthly ".parse::<Interval>().unwrap(), Interval::Monthly);
        assert_eq!("daily".parse::<Interval>().unwrap(), Interval::Daily);
        assert!("fortnightly".parse::<Interval>().is_err());
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(Interval::Monthly.to_string(), "monthly");
    }

    #[test]
    fn test_domain_explicit_wins() {
        let site = SiteSettings {
            website_url: "https://blog.example.com".into(),
            domain: Some("example.com".into()),
            from_name: String::new(),
        };
        assert_eq!(site.domain().as_deref(), Some("example.com"));
    }

    #[test]
    fn test_domain_unparseable_url() {
        let site = SiteSettings {
            website_url: "not a url".into(),
            ..SiteSettings::default()
        };
        assert!(site.domain().is_none());
    }

    #[test]
    fn test_campaign_source_falls_back_to_domain() {
        let mut s = Settings::default();
        s.site.website_url = "https://example.com".into();
        assert_eq!(s.campaign_source().as_deref(), Some("example.com"));

        s.campaign.source = Some("weekly-digest".into());
        assert_eq!(s.campaign_source().as_deref(), Some("weekly-digest"));
    }
}
