//! Full newsletter issue: API payload in, personalized email out.

use chrono::{DateTime, NaiveDate, Utc};
use newsletter_rs_core::settings_loader;
use newsletter_rs_digest::{
    parse_posts, personalize, portal_unsubscribe_url, render_digest, suggest_days_back, Branding,
    DigestBuilder, EmailSettings, PostFilter, SiteMetadata,
};

const PAYLOAD: &str = r#"{"posts": [
  {
    "id": "p1", "slug": "launch", "title": "We launched", "url": "/launch/",
    "featured": true, "published_at": "2024-03-05T09:00:00.000+00:00",
    "excerpt": "Everything about the launch",
    "html": "<p>Read <a href=\"/docs/\">the docs</a>.</p><div class=\"kg-callout-card kg-callout-card-blue\"><div class=\"kg-callout-text\">Tip</div></div>",
    "feature_image": "https://cdn.example.com/launch.jpg",
    "feature_image_caption": "Launch day",
    "tags": [{"name": "News", "slug": "news"}],
    "authors": [{"name": "Ada", "slug": "ada"}]
  },
  {
    "id": "p2", "slug": "notes", "title": "Release notes", "url": "https://blog.example.com/notes/",
    "published_at": "2024-03-03T09:00:00.000+00:00",
    "plaintext": "Bug fixes & improvements",
    "tags": [{"name": "Changelog", "slug": "changelog"}]
  },
  {
    "id": "p3", "slug": "old", "title": "Old post", "url": "/old/",
    "published_at": "2023-12-01T09:00:00.000+00:00",
    "tags": [{"name": "News", "slug": "news"}]
  }
]}"#;

const TEMPLATE: &str = r#"<html><head><title>{{blog_title}}</title></head><body>
{{#if_blog_logo}}<img src="{{blog_logo}}">{{/if_blog_logo}}
<p class="date">{{newsletter.date}}</p>
{{#if_featured_post}}
<h1><a href="{{featured_url}}">{{featured_title}}</a></h1>
{{#if_featured_image}}<img src="{{featured_image}}">{{#if_featured_image_caption}}<figcaption>{{featured_image_caption}}</figcaption>{{/if_featured_image_caption}}{{/if_featured_image}}
{{#newsletter.settings.show_author}}<p class="author">{{featured_author}}</p>{{/newsletter.settings.show_author}}
<div class="content">{{{featured_content}}}</div>
{{/if_featured_post}}
{{#if_additional_posts}}{{#newsletter.settings.show_latest_posts}}<h3>Latest</h3>{{{additional_posts_content}}}{{/newsletter.settings.show_latest_posts}}{{/if_additional_posts}}
{{#if_social_sharing}}<a href="{{{social_twitter_url}}}">Share</a>{{/if_social_sharing}}
{{#email.support_address}}<a href="mailto:{{email.support_address}}">Help</a>{{/email.support_address}}
<a href="{{unsubscribe_url}}">Unsubscribe</a>
</body></html>"#;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-06T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn test_full_issue() {
    let settings = settings_loader::from_toml_str(
        r#"
        [site]
        website_url = "https://blog.example.com"
        from_name = "Example"

        [digest]
        days_back = 30
        max_posts = 5
        "#,
    )
    .unwrap();

    let posts = PostFilter::from_settings(&settings.digest, now()).apply(parse_posts(PAYLOAD).unwrap());
    assert_eq!(posts.len(), 2);

    let digest = DigestBuilder::new(&settings)
        .site(SiteMetadata {
            title: Some("The Example Blog".into()),
            ..SiteMetadata::default()
        })
        .branding(Branding {
            accent_color: Some("#ff5500".into()),
            brand_color: None,
        })
        .email(EmailSettings {
            support_address: Some("help@example.com".into()),
            ..EmailSettings::default()
        })
        .today(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
        .build(&posts);

    let html = render_digest(TEMPLATE, &digest, &settings);

    assert!(html.contains("<title>The Example Blog</title>"));
    assert!(!html.contains("<img src=\"\">"));
    assert!(html.contains("<p class=\"date\">March 04, 2024</p>"));
    assert!(html.contains("<h1><a href=\"https://blog.example.com/launch/\">We launched</a></h1>"));
    assert!(html.contains("<figcaption>Launch day</figcaption>"));
    assert!(!html.contains("class=\"author\""));

    // Featured body went through the transformer and link decoration.
    assert!(html.contains("background-color: #e7f3ff"));
    assert!(html.contains("href=\"/docs/?utm_source=blog.example.com&amp;utm_medium=email&amp;utm_campaign=newsletter-2410\""));

    // Latest posts block.
    assert!(html.contains("<h3>Latest</h3>"));
    assert!(html.contains(">Release notes</a>"));
    assert!(html.contains(">Bug fixes &amp; improvements</a>"));
    assert!(!html.contains("Old post"));

    assert!(html.contains("https://twitter.com/intent/tweet?text=Example%20Newsletter%20%2D%20We%20launched"));
    assert!(html.contains("<a href=\"mailto:help@example.com\">Help</a>"));

    // No markers other than the late-bound one survive.
    assert!(!html.contains("{{#"));
    assert!(!html.contains("{{/"));
    assert_eq!(html.matches("{{").count(), 1);

    let personal = personalize(&html, &portal_unsubscribe_url(&settings.site.website_url));
    assert!(personal.contains("<a href=\"https://blog.example.com/#/portal/account/newsletters\">Unsubscribe</a>"));
    assert!(!personal.contains("{{"));
}

#[test]
fn test_empty_issue_uses_defaults() {
    let settings = newsletter_rs_core::Settings::default();
    let digest = DigestBuilder::new(&settings)
        .today(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
        .build(&[]);
    let html = render_digest(
        "{{blog_title}}|{{featured_title}}|{{#if_featured_post}}F{{/if_featured_post}}{{#if_social_sharing}}S{{/if_social_sharing}}",
        &digest,
        &settings,
    );
    // No title or sender name, so the standard defaults show through.
    assert_eq!(html, "Newsletter|Latest Updates|");
}

#[test]
fn test_filters_compose_with_interval_suggestion() {
    let posts = parse_posts(PAYLOAD).unwrap();
    let dates: Vec<_> = posts.iter().filter_map(|p| p.published_at).collect();
    assert_eq!(suggest_days_back(&dates), Some(30));

    let news = PostFilter::new().with_tags(["news"]).apply(posts);
    assert_eq!(news.len(), 2);
    assert!(news.iter().all(|p| p.tags[0].name == "News"));
}
