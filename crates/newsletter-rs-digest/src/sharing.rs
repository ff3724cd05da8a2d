//! Social sharing links for an issue.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::prepare::DigestPost;

/// Share links pointing at the newsletter archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SocialSharing {
    pub twitter_url: String,
    pub facebook_url: String,
    pub linkedin_url: String,
    pub newsletter_title: String,
    pub newsletter_url: String,
}

impl SocialSharing {
    /// Builds share links for an issue made of `posts`.
    ///
    /// The title names the first featured post, or the first post when none
    /// is featured. Returns `None` when there are no posts.
    pub fn for_posts(posts: &[DigestPost], sender_name: &str, website_url: &str) -> Option<Self> {
        let lead = posts.iter().find(|p| p.featured).or_else(|| posts.first())?;
        let newsletter_title = format!("{sender_name} Newsletter - {}", lead.title);
        let newsletter_url = archive_url(website_url);

        let title = encode(&newsletter_title);
        let url = encode(&newsletter_url);
        Some(Self {
            twitter_url: format!("https://twitter.com/intent/tweet?text={title}&url={url}"),
            facebook_url: format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            linkedin_url: format!("https://www.linkedin.com/sharing/share-offsite/?url={url}"),
            newsletter_title,
            newsletter_url,
        })
    }
}

/// The newsletter archive page, or an empty string without a site URL.
pub fn archive_url(website_url: &str) -> String {
    if website_url.is_empty() {
        String::new()
    } else {
        format!("{website_url}/newsletters")
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
