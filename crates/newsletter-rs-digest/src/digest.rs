//! A fully assembled newsletter issue and the render context it produces.

use chrono::{Local, NaiveDate};
use newsletter_rs_core::{Interval, Settings};
use newsletter_rs_html::LinkDecorator;
use newsletter_rs_template::{Conditions, Context};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::latest::additional_posts_html;
use crate::post::Post;
use crate::prepare::{prepare_posts, DigestPost, PrepareOptions};
use crate::schedule::newsletter_date;
use crate::sharing::{archive_url, SocialSharing};

/// Accent color used when the site has none.
pub const DEFAULT_ACCENT_COLOR: &str = "#2b546d";

/// Site metadata as exposed by the CMS settings endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMetadata {
    pub title: Option<String>,
    pub description: String,
    pub logo: String,
    pub icon: String,
    pub cover_image: String,
}

/// Brand colors. Missing colors fall back to the accent color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub accent_color: Option<String>,
    pub brand_color: Option<String>,
}

impl Branding {
    pub fn accent(&self) -> &str {
        self.accent_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ACCENT_COLOR)
    }

    pub fn brand(&self) -> &str {
        self.brand_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.accent())
    }
}

/// Per-newsletter display options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterOptions {
    pub header_image: Option<String>,
    pub sender_name: Option<String>,
    pub show_header_icon: bool,
    pub show_header_title: bool,
    pub show_feature_image: bool,
    pub show_excerpt: bool,
    pub show_author: bool,
    pub show_latest_posts: bool,
    pub show_subscription_details: bool,
    pub footer_content: Option<String>,
}

impl Default for NewsletterOptions {
    fn default() -> Self {
        Self {
            header_image: None,
            sender_name: None,
            show_header_icon: true,
            show_header_title: true,
            show_feature_image: true,
            show_excerpt: true,
            show_author: false,
            show_latest_posts: true,
            show_subscription_details: true,
            footer_content: None,
        }
    }
}

/// Email delivery settings shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub track_opens: bool,
    pub track_clicks: bool,
    pub default_address: Option<String>,
    pub support_address: Option<String>,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            track_opens: true,
            track_clicks: true,
            default_address: None,
            support_address: None,
        }
    }
}

/// One newsletter issue, ready to render.
#[derive(Debug, Clone)]
pub struct Digest {
    pub site: SiteMetadata,
    pub branding: Branding,
    pub newsletter: NewsletterOptions,
    pub email: EmailSettings,
    pub interval: Interval,
    pub date: String,
    pub website_url: String,
    pub sender_name: String,
    pub posts: Vec<DigestPost>,
    pub sharing: Option<SocialSharing>,
}

/// Assembles a [`Digest`] from settings, site metadata, and posts.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use newsletter_rs_core::Settings;
/// use newsletter_rs_digest::{parse_posts, DigestBuilder};
///
/// let mut settings = Settings::default();
/// settings.site.website_url = "https://blog.example.com".into();
/// settings.site.from_name = "Example".into();
///
/// let posts = parse_posts(r#"[{"title": "Hello", "url": "/hello/"}]"#).unwrap();
/// let digest = DigestBuilder::new(&settings)
///     .today(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
///     .build(&posts);
///
/// assert_eq!(digest.date, "March 04, 2024");
/// assert_eq!(digest.posts[0].url, "https://blog.example.com/hello/");
/// assert_eq!(digest.subject(), "Example: Hello");
/// ```
#[derive(Debug, Clone)]
pub struct DigestBuilder<'a> {
    settings: &'a Settings,
    site: SiteMetadata,
    branding: Branding,
    newsletter: NewsletterOptions,
    email: EmailSettings,
    today: Option<NaiveDate>,
}

impl<'a> DigestBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            site: SiteMetadata::default(),
            branding: Branding::default(),
            newsletter: NewsletterOptions::default(),
            email: EmailSettings::default(),
            today: None,
        }
    }

    #[must_use]
    pub fn site(mut self, site: SiteMetadata) -> Self {
        self.site = site;
        self
    }

    #[must_use]
    pub fn branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    #[must_use]
    pub fn newsletter(mut self, newsletter: NewsletterOptions) -> Self {
        self.newsletter = newsletter;
        self
    }

    #[must_use]
    pub fn email(mut self, email: EmailSettings) -> Self {
        self.email = email;
        self
    }

    /// Fixes the issue date. Defaults to the local date at build time.
    #[must_use]
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Prepares `posts` (the first one is featured) and assembles the issue.
    pub fn build(self, posts: &[Post]) -> Digest {
        let settings = self.settings;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let website_url = settings.site.website_url.trim_end_matches('/').to_string();
        let sender_name = self
            .newsletter
            .sender_name
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| settings.site.from_name.clone());

        let decorator = LinkDecorator::from_settings(settings).map(|d| d.with_date(today));
        let prepared = prepare_posts(
            posts,
            &PrepareOptions {
                website_url: &website_url,
                default_author: &settings.site.from_name,
                excerpt_length: settings.digest.excerpt_length,
                decorator: decorator.as_ref(),
            },
        );

        let interval = settings.digest.interval;
        let date = newsletter_date(interval, today);
        let sharing = SocialSharing::for_posts(&prepared, &settings.site.from_name, &website_url);

        tracing::info!(
            posts = prepared.len(),
            interval = %interval,
            date = %date,
            "assembled digest"
        );

        Digest {
            site: self.site,
            branding: self.branding,
            newsletter: self.newsletter,
            email: self.email,
            interval,
            date,
            website_url,
            sender_name,
            posts: prepared,
            sharing,
        }
    }
}

impl Digest {
    /// The featured post, if any.
    pub fn featured(&self) -> Option<&DigestPost> {
        self.posts.first()
    }

    /// The blog title, falling back to the sender name.
    pub fn blog_title(&self) -> &str {
        self.site
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.sender_name)
    }

    /// Email subject line: `"<blog title>: <featured title>"`.
    pub fn subject(&self) -> String {
        let lead = self.featured().map_or("Newsletter", |p| p.title.as_str());
        format!("{}: {lead}", self.blog_title())
    }

    /// Builds the render context.
    ///
    /// Values are exposed three ways for template compatibility: flat legacy
    /// keys (`featured_title`), top-level keys spelled with dots
    /// (`"blog.title"`), and nested mappings (`blog`, `newsletter`, `email`).
    /// `blog_title` and the `featured_*` keys are omitted when empty so that
    /// renderer defaults apply.
    pub fn context(&self) -> Context {
        let mut data = Map::new();
        let blog_title = self.blog_title();
        let archive = archive_url(&self.website_url);
        let sharing = self.sharing.clone().unwrap_or_default();

        let settings = json!({
            "show_header_icon": self.newsletter.show_header_icon,
            "show_header_title": self.newsletter.show_header_title,
            "show_feature_image": self.newsletter.show_feature_image,
            "show_excerpt": self.newsletter.show_excerpt,
            "show_author": self.newsletter.show_author,
            "show_latest_posts": self.newsletter.show_latest_posts,
            "show_subscription_details": self.newsletter.show_subscription_details,
            "footer_content": self.newsletter.footer_content.clone().unwrap_or_default(),
        });

        if !blog_title.is_empty() {
            data.insert("blog_title".to_string(), json!(blog_title));
        }
        let entries = [
            ("blog_logo", json!(self.site.logo)),
            ("newsletter_interval", json!(self.interval.as_str())),
            ("newsletter_date", json!(self.date)),
            ("additional_posts_content", json!(additional_posts_html(&self.posts))),
            ("posts", json!(self.posts)),
            ("social_twitter_url", json!(sharing.twitter_url)),
            ("social_facebook_url", json!(sharing.facebook_url)),
            ("social_linkedin_url", json!(sharing.linkedin_url)),
            ("newsletter_archive_url", json!(archive)),
            // Dotted top-level keys.
            ("blog.title", json!(blog_title)),
            ("blog.logo", json!(self.site.logo)),
            ("blog.icon", json!(self.site.icon)),
            ("blog.website_url", json!(self.website_url)),
            ("blog.description", json!(self.site.description)),
            ("newsletter.header_image", json!(self.newsletter.header_image)),
            ("newsletter.sender_name", json!(self.sender_name)),
            ("email.support_address", json!(self.email.support_address)),
            // Nested.
            (
                "blog",
                json!({
                    "title": blog_title,
                    "logo": self.site.logo,
                    "icon": self.site.icon,
                    "cover_image": self.site.cover_image,
                    "website_url": self.website_url,
                    "description": self.site.description,
                }),
            ),
            (
                "newsletter",
                json!({
                    "interval": self.interval.as_str(),
                    "date": self.date,
                    "archive_url": archive,
                    "sender_name": self.sender_name,
                    "header_image": self.newsletter.header_image,
                    "settings": settings,
                }),
            ),
            (
                "email",
                json!({
                    "track_opens": self.email.track_opens,
                    "track_clicks": self.email.track_clicks,
                    "default_address": self.email.default_address,
                    "support_address": self.email.support_address,
                }),
            ),
            // Branding.
            ("accent_color", json!(self.branding.accent())),
            ("brand_color", json!(self.branding.brand())),
            ("primary_color", json!(self.branding.accent())),
            ("secondary_color", json!(self.branding.brand())),
            ("text_color", json!("#15212A")),
            ("light_text_color", json!("#738a94")),
            ("background_color", json!("#ffffff")),
            ("border_color", json!("#e0e7eb")),
        ];
        for (key, value) in entries {
            data.insert(key.to_string(), value);
        }

        data.extend(prefixed_settings(&settings));

        if let Some(post) = self.featured() {
            let preview = if post.excerpt.is_empty() {
                String::new()
            } else {
                let mut cut: String = post.excerpt.chars().take(100).collect();
                cut.push_str("...");
                cut
            };
            let featured = [
                ("newsletter_preview", json!(preview)),
                ("featured_title", json!(post.title)),
                ("featured_excerpt", json!(post.excerpt)),
                ("featured_content", json!(post.text)),
                ("featured_url", json!(post.url)),
                ("featured_tag", json!(post.tag)),
                ("featured_author", json!(post.author)),
                ("featured_image", json!(post.picture)),
                ("featured_image_caption", json!(post.feature_image_caption)),
            ];
            for (key, value) in featured {
                data.insert(key.to_string(), value);
            }
            if !post.slug.is_empty() {
                data.insert(
                    "comment_url".to_string(),
                    json!(format!("{}/{}/#ghost-comments-root", self.website_url, post.slug)),
                );
            }
        }

        Context::from(Value::Object(data))
    }

    /// The standard named conditions, in evaluation order.
    pub fn conditions(&self) -> Conditions {
        let featured = self.featured();
        let has_picture = featured.is_some_and(|p| !p.picture.is_empty());
        let sharing = self
            .sharing
            .as_ref()
            .is_some_and(|s| !s.twitter_url.is_empty());
        let nl = &self.newsletter;

        [
            ("if_blog_logo", !self.site.logo.is_empty()),
            ("if_featured_post", featured.is_some()),
            ("if_featured_image", has_picture),
            ("if_no_featured_image", featured.is_some() && !has_picture),
            (
                "if_featured_image_caption",
                featured.is_some_and(|p| !p.feature_image_caption.is_empty()),
            ),
            ("if_featured_excerpt", featured.is_some_and(|p| !p.excerpt.is_empty())),
            ("if_additional_posts", self.posts.len() > 1),
            ("if_social_sharing", sharing),
            ("if_newsletter_archive", !self.website_url.is_empty()),
            ("newsletter.header_image", non_empty(nl.header_image.as_deref())),
            ("newsletter.settings.show_header_icon", nl.show_header_icon),
            ("newsletter.settings.show_header_title", nl.show_header_title),
            ("newsletter.settings.show_feature_image", nl.show_feature_image),
            ("newsletter.settings.show_excerpt", nl.show_excerpt),
            ("newsletter.settings.show_author", nl.show_author),
            ("newsletter.settings.show_latest_posts", nl.show_latest_posts),
            (
                "newsletter.settings.show_subscription_details",
                nl.show_subscription_details,
            ),
            (
                "newsletter.settings.footer_content",
                non_empty(nl.footer_content.as_deref()),
            ),
            ("email.support_address", non_empty(self.email.support_address.as_deref())),
        ]
        .into_iter()
        .collect()
    }
}

/// Re-keys the settings object as `newsletter.settings.<name>` entries.
fn prefixed_settings(settings: &Value) -> Map<String, Value> {
    settings
        .as_object()
        .into_iter()
        .flatten()
        .map(|(k, v)| (format!("newsletter.settings.{k}"), v.clone()))
        .collect()
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{Author, Tag};

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.site.website_url = "https://blog.example.com/".into();
        settings.site.from_name = "Example".into();
        settings
    }

    fn posts() -> Vec<Post> {
        vec![
            Post {
                slug: "first".into(),
                title: Some("First".into()),
                url: "/first/".into(),
                excerpt: Some("The first post".into()),
                html: Some(r#"<p>Body <a href="/about/">about</a></p>"#.into()),
                feature_image: Some("https://cdn.example.com/1.jpg".into()),
                tags: vec![Tag {
                    name: "News".into(),
                    slug: "news".into(),
                }],
                authors: vec![Author {
                    name: "Ada".into(),
                    slug: "ada".into(),
                }],
                ..Post::default()
            },
            Post {
                title: Some("Second".into()),
                url: "https://blog.example.com/second/".into(),
                plaintext: Some("Second body".into()),
                ..Post::default()
            },
        ]
    }

    fn digest() -> Digest {
        DigestBuilder::new(&settings())
            .today(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
            .build(&posts())
    }

    fn text(ctx: &Context, path: &str) -> String {
        ctx.lookup_leaf(path)
            .map(|v| v.to_display_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_branding_fallbacks() {
        let b = Branding::default();
        assert_eq!(b.accent(), "#2b546d");
        assert_eq!(b.brand(), "#2b546d");
        let b = Branding {
            accent_color: Some("#ff0000".into()),
            brand_color: None,
        };
        assert_eq!(b.brand(), "#ff0000");
    }

    #[test]
    fn test_build_prepares_posts() {
        let d = digest();
        assert_eq!(d.website_url, "https://blog.example.com");
        assert_eq!(d.date, "March 04, 2024");
        assert_eq!(d.posts.len(), 2);
        assert_eq!(d.posts[0].url, "https://blog.example.com/first/");
        assert_eq!(d.posts[0].tag, "News");
        assert!(d.posts[0].text.contains("utm_campaign=newsletter-2410"));
        assert_eq!(d.posts[1].author, "Example");
        assert_eq!(d.posts[1].text, "Second body");
        assert_eq!(d.subject(), "Example: First");
    }

    #[test]
    fn test_sender_name_override() {
        let settings = settings();
        let d = DigestBuilder::new(&settings)
            .newsletter(NewsletterOptions {
                sender_name: Some("The Desk".into()),
                ..NewsletterOptions::default()
            })
            .build(&[]);
        assert_eq!(d.sender_name, "The Desk");
        assert_eq!(d.blog_title(), "The Desk");
        assert_eq!(d.subject(), "The Desk: Newsletter");
    }

    #[test]
    fn test_context_exposes_all_shapes() {
        let ctx = digest().context();
        assert_eq!(text(&ctx, "blog_title"), "Example");
        assert_eq!(text(&ctx, "blog.title"), "Example");
        assert_eq!(text(&ctx, "blog.website_url"), "https://blog.example.com");
        assert_eq!(text(&ctx, "newsletter.date"), "March 04, 2024");
        assert_eq!(text(&ctx, "newsletter_interval"), "weekly");
        assert_eq!(text(&ctx, "featured_title"), "First");
        assert_eq!(text(&ctx, "featured_tag"), "News");
        assert_eq!(text(&ctx, "featured_author"), "Ada");
        assert_eq!(text(&ctx, "newsletter_preview"), "The first post...");
        assert_eq!(text(&ctx, "newsletter_archive_url"), "https://blog.example.com/newsletters");
        assert_eq!(text(&ctx, "newsletter.settings.show_author"), "False");
        assert_eq!(text(&ctx, "comment_url"), "https://blog.example.com/first/#ghost-comments-root");
        assert_eq!(text(&ctx, "accent_color"), "#2b546d");
        assert_eq!(text(&ctx, "text_color"), "#15212A");
        assert!(text(&ctx, "additional_posts_content").contains(">Second</a>"));
        assert!(text(&ctx, "social_twitter_url").starts_with("https://twitter.com/intent/tweet?text=Example%20Newsletter"));
        assert!(matches!(ctx.resolve("posts"), Some(newsletter_rs_template::ContextValue::List(items)) if items.len() == 2));
    }

    #[test]
    fn test_context_omits_featured_keys_without_posts() {
        let ctx = DigestBuilder::new(&settings()).build(&[]).context();
        assert!(ctx.get("featured_title").is_none());
        assert!(ctx.get("newsletter_preview").is_none());
        assert_eq!(text(&ctx, "social_twitter_url"), "");
    }

    #[test]
    fn test_conditions() {
        let c = digest().conditions();
        assert_eq!(c.get("if_featured_post"), Some(true));
        assert_eq!(c.get("if_featured_image"), Some(true));
        assert_eq!(c.get("if_no_featured_image"), Some(false));
        assert_eq!(c.get("if_featured_excerpt"), Some(true));
        assert_eq!(c.get("if_featured_image_caption"), Some(false));
        assert_eq!(c.get("if_additional_posts"), Some(true));
        assert_eq!(c.get("if_social_sharing"), Some(true));
        assert_eq!(c.get("if_newsletter_archive"), Some(true));
        assert_eq!(c.get("if_blog_logo"), Some(false));
        assert_eq!(c.get("newsletter.header_image"), Some(false));
        assert_eq!(c.get("newsletter.settings.show_header_icon"), Some(true));
        assert_eq!(c.get("newsletter.settings.show_author"), Some(false));
        assert_eq!(c.get("newsletter.settings.footer_content"), Some(false));
        assert_eq!(c.get("email.support_address"), Some(false));
    }

    #[test]
    fn test_conditions_without_posts() {
        let c = DigestBuilder::new(&Settings::default()).build(&[]).conditions();
        assert_eq!(c.get("if_featured_post"), Some(false));
        assert_eq!(c.get("if_featured_image"), Some(false));
        assert_eq!(c.get("if_no_featured_image"), Some(false));
        assert_eq!(c.get("if_additional_posts"), Some(false));
        assert_eq!(c.get("if_social_sharing"), Some(false));
        assert_eq!(c.get("if_newsletter_archive"), Some(false));
    }

    #[test]
    fn test_metadata_deserializes_with_defaults() {
        let options: NewsletterOptions =
            serde_json::from_str(r#"{"show_author": true, "footer_content": "Bye"}"#).unwrap();
        assert!(options.show_author);
        assert!(options.show_header_icon);
        assert_eq!(options.footer_content.as_deref(), Some("Bye"));

        let email: EmailSettings = serde_json::from_str("{}").unwrap();
        assert!(email.track_opens);
    }
}
