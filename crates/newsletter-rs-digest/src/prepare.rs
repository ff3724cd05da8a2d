//! Turns API posts into the flat shape templates consume.

use newsletter_rs_html::{transform, LinkDecorator};
use serde::Serialize;

use crate::post::Post;

/// Tag shown for posts without tags.
pub const DEFAULT_TAG: &str = "General";

/// Title shown for posts without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// A post ready for the template.
///
/// `text` is the email-safe HTML body for the featured (first) post and the
/// excerpt for every other post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigestPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub text: String,
    pub url: String,
    pub tag: String,
    pub author: String,
    pub picture: String,
    pub feature_image_caption: String,
    pub excerpt: String,
    pub featured: bool,
    pub published_at: String,
}

/// Inputs for [`prepare_posts`] that come from the site rather than the posts.
#[derive(Debug, Clone)]
pub struct PrepareOptions<'a> {
    /// Base for relative post URLs, without a trailing slash.
    pub website_url: &'a str,
    /// Author shown for posts without authors.
    pub default_author: &'a str,
    /// Plaintext excerpts are cut at this many characters.
    pub excerpt_length: usize,
    /// Decorates links in the featured body when set.
    pub decorator: Option<&'a LinkDecorator>,
}

/// Prepares `posts` in order. The first post is the featured one.
pub fn prepare_posts(posts: &[Post], options: &PrepareOptions<'_>) -> Vec<DigestPost> {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| prepare_post(post, i == 0, options))
        .collect()
}

fn prepare_post(post: &Post, featured_slot: bool, options: &PrepareOptions<'_>) -> DigestPost {
    let excerpt = post.excerpt_or_plaintext(options.excerpt_length);

    let text = if featured_slot {
        let body = transform(post.html.as_deref().unwrap_or_default());
        match options.decorator {
            Some(decorator) => decorator.decorate(&body),
            None => body,
        }
    } else {
        excerpt.clone()
    };

    DigestPost {
        id: post.id.clone(),
        slug: post.slug.clone(),
        title: post
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        text,
        url: absolute_url(&post.url, options.website_url),
        tag: post
            .tags
            .first()
            .map_or_else(|| DEFAULT_TAG.to_string(), |t| t.name.clone()),
        author: post
            .authors
            .first()
            .map_or_else(|| options.default_author.to_string(), |a| a.name.clone()),
        picture: post.feature_image.clone().unwrap_or_default(),
        feature_image_caption: post.feature_image_caption.clone().unwrap_or_default(),
        excerpt,
        featured: post.featured,
        published_at: post
            .published_at
            .map(|d| d.to_rfc3339())
            .unwrap_or_default(),
    }
}

/// Prefixes `url` with `website_url` unless it is empty or already starts
/// with `http`.
pub fn absolute_url(url: &str, website_url: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        url.to_string()
    } else {
        format!("{website_url}{url}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::post::{Author, Tag};

    fn options() -> PrepareOptions<'static> {
        PrepareOptions {
            website_url: "https://blog.example.com",
            default_author: "The Team",
            excerpt_length: 10,
            decorator: None,
        }
    }

    #[test]
    fn test_absolute_url() {
        let site = "https://blog.example.com";
        assert_eq!(absolute_url("/hello/", site), "https://blog.example.com/hello/");
        assert_eq!(absolute_url("https://x.org/a", site), "https://x.org/a");
        assert_eq!(absolute_url("", site), "");
    }

    #[test]
    fn test_defaults_for_sparse_post() {
        let prepared = prepare_posts(&[Post::default(), Post::default()], &options());
        let second = &prepared[1];
        assert_eq!(second.title, "Untitled");
        assert_eq!(second.tag, "General");
        assert_eq!(second.author, "The Team");
        assert_eq!(second.picture, "");
        assert_eq!(second.text, "");
        assert_eq!(second.published_at, "");
    }

    #[test]
    fn test_first_tag_and_author() {
        let post = Post {
            tags: vec![
                Tag {
                    name: "Rust".into(),
                    slug: "rust".into(),
                },
                Tag {
                    name: "Go".into(),
                    slug: "go".into(),
                },
            ],
            authors: vec![Author {
                name: "Ferris".into(),
                slug: "ferris".into(),
            }],
            ..Post::default()
        };
        let prepared = prepare_posts(&[post], &options());
        assert_eq!(prepared[0].tag, "Rust");
        assert_eq!(prepared[0].author, "Ferris");
    }

    #[test]
    fn test_featured_gets_body_others_get_excerpt() {
        let posts = vec![
            Post {
                html: Some("<p>Full body</p>".into()),
                excerpt: Some("first".into()),
                ..Post::default()
            },
            Post {
                html: Some("<p>Ignored</p>".into()),
                plaintext: Some("A long plaintext body".into()),
                ..Post::default()
            },
        ];
        let prepared = prepare_posts(&posts, &options());
        assert!(prepared[0].text.starts_with("<p style=\"font-family: Inter"));
        assert!(prepared[0].text.contains("Full body"));
        assert_eq!(prepared[0].excerpt, "first");
        assert_eq!(prepared[1].text, "A long pla...");
        assert_eq!(prepared[1].excerpt, "A long pla...");
    }

    #[test]
    fn test_featured_links_decorated() {
        let decorator = LinkDecorator::new("blog.example.com")
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        let opts = PrepareOptions {
            decorator: Some(&decorator),
            ..options()
        };
        let posts = vec![Post {
            html: Some(r#"<p><a href="/next/">next</a> <a href="https://x.org/">x</a></p>"#.into()),
            ..Post::default()
        }];
        let text = &prepare_posts(&posts, &opts)[0].text;
        assert!(text.contains("href=\"/next/?utm_source=blog.example.com&amp;utm_medium=email&amp;utm_campaign=newsletter-2410\""));
        assert!(text.contains("href=\"https://x.org/\""));
    }
}
