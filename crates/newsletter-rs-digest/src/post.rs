//! Posts as returned by the Ghost Content API.
//!
//! Every field is optional on the wire; missing values decode to their
//! defaults so a sparse API response never fails to load.

use chrono::{DateTime, FixedOffset};
use newsletter_rs_core::error::{NewsletterError, NewsletterResult};
use serde::{Deserialize, Serialize};

/// A post tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    pub slug: String,
}

/// A post author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub slug: String,
}

/// A published post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: Option<String>,
    pub url: String,
    pub excerpt: Option<String>,
    pub custom_excerpt: Option<String>,
    pub html: Option<String>,
    pub plaintext: Option<String>,
    pub feature_image: Option<String>,
    pub feature_image_caption: Option<String>,
    pub featured: bool,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub tags: Vec<Tag>,
    pub authors: Vec<Author>,
}

impl Post {
    /// Returns `true` if any tag name equals one of `wanted`, ignoring case.
    pub fn has_any_tag<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        wanted.iter().any(|w| {
            self.tags
                .iter()
                .any(|tag| tag.name.to_lowercase() == w.as_ref().to_lowercase())
        })
    }

    /// The excerpt to show for this post.
    ///
    /// The API excerpt wins. Otherwise the plaintext is used, cut at `limit`
    /// characters with `...` appended when it was longer.
    pub fn excerpt_or_plaintext(&self, limit: usize) -> String {
        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.is_empty()) {
            return excerpt.to_string();
        }
        let plaintext = self.plaintext.as_deref().unwrap_or_default();
        if plaintext.chars().count() > limit {
            let mut cut: String = plaintext.chars().take(limit).collect();
            cut.push_str("...");
            cut
        } else {
            plaintext.to_string()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PostsPayload {
    Envelope { posts: Vec<Post> },
    List(Vec<Post>),
}

/// Decodes posts from either a bare JSON array or a `{"posts": [...]}`
/// API response.
///
/// # Errors
///
/// Returns `SerializationError` if the JSON is malformed or has neither shape.
pub fn parse_posts(json: &str) -> NewsletterResult<Vec<Post>> {
    let payload: PostsPayload = serde_json::from_str(json)
        .map_err(|e| NewsletterError::SerializationError(format!("invalid posts payload: {e}")))?;
    Ok(match payload {
        PostsPayload::Envelope { posts } | PostsPayload::List(posts) => posts,
    })
}
