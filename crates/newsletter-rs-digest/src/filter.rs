//! Post selection.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use newsletter_rs_core::settings::DigestSettings;

use crate::post::Post;

/// Which posts make it into a digest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Keep only posts flagged as featured.
    pub featured_only: bool,
    /// Keep only posts carrying at least one of these tags (case-insensitive).
    /// Empty keeps everything.
    pub tags: Vec<String>,
    /// Drop posts published before this instant. Posts without a date are kept.
    pub published_after: Option<DateTime<Utc>>,
    /// Keep at most this many posts, after the other criteria.
    pub limit: Option<usize>,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the filter described by the digest settings, counting
    /// `days_back` from `now`.
    pub fn from_settings(settings: &DigestSettings, now: DateTime<Utc>) -> Self {
        Self {
            featured_only: settings.featured_only,
            tags: settings.filter_tags.clone(),
            published_after: Some(now - Duration::days(i64::from(settings.days_back))),
            limit: Some(settings.max_posts),
        }
    }

    #[must_use]
    pub const fn featured_only(mut self, featured_only: bool) -> Self {
        self.featured_only = featured_only;
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if `post` passes the featured, tag and date criteria.
    pub fn matches(&self, post: &Post) -> bool {
        if self.featured_only && !post.featured {
            return false;
        }
        if !self.tags.is_empty() && !post.has_any_tag(&self.tags) {
            return false;
        }
        match (self.published_after, post.published_at) {
            (Some(cutoff), Some(published)) => published >= cutoff,
            _ => true,
        }
    }

    /// Filters `posts`, preserving order, then applies the limit.
    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        let total = posts.len();
        let selected: Vec<Post> = posts
            .into_iter()
            .filter(|p| self.matches(p))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();
        tracing::info!(total, selected = selected.len(), "selected posts");
        selected
    }
}

/// Suggests how many days a digest should look back, from the publication
/// dates of recent posts.
///
/// The average whole-day gap between consecutive posts decides: two days or
/// less gives 7, a week or less gives 14, anything longer gives 30. Returns
/// `None` with fewer than two dates.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use newsletter_rs_digest::suggest_days_back;
///
/// let dates: Vec<_> = ["2024-03-10T00:00:00Z", "2024-03-09T00:00:00Z", "2024-03-08T00:00:00Z"]
///     .iter()
///     .map(|d| DateTime::parse_from_rfc3339(d).unwrap())
///     .collect();
/// assert_eq!(suggest_days_back(&dates), Some(7));
/// ```
pub fn suggest_days_back(dates: &[DateTime<FixedOffset>]) -> Option<u32> {
    if dates.len() < 2 {
        return None;
    }
    let mut sorted = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let gaps: Vec<i64> = sorted
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let average = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;

    Some(if average <= 2.0 {
        7
    } else if average <= 7.0 {
        14
    } else {
        30
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Tag;

    fn post(title: &str, featured: bool, tags: &[&str], published: &str) -> Post {
        Post {
            title: Some(title.into()),
            featured,
            tags: tags
                .iter()
                .map(|t| Tag {
                    name: (*t).into(),
                    slug: t.to_lowercase(),
                })
                .collect(),
            published_at: Some(DateTime::parse_from_rfc3339(published).unwrap()),
            ..Post::default()
        }
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().filter_map(|p| p.title.as_deref()).collect()
    }

    fn sample() -> Vec<Post> {
        vec![
            post("a", true, &["Rust"], "2024-03-10T00:00:00Z"),
            post("b", false, &["Go"], "2024-03-09T00:00:00Z"),
            post("c", true, &["rust", "WASM"], "2024-02-01T00:00:00Z"),
            post("d", false, &[], "2024-03-08T00:00:00Z"),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        assert_eq!(titles(&PostFilter::new().apply(sample())), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_featured_only() {
        let f = PostFilter::new().featured_only(true);
        assert_eq!(titles(&f.apply(sample())), ["a", "c"]);
    }

    #[test]
    fn test_tags_case_insensitive() {
        let f = PostFilter::new().with_tags(["RUST"]);
        assert_eq!(titles(&f.apply(sample())), ["a", "c"]);
        let f = PostFilter::new().with_tags(["wasm", "go"]);
        assert_eq!(titles(&f.apply(sample())), ["b", "c"]);
    }

    #[test]
    fn test_from_settings_applies_window_and_limit() {
        let settings = DigestSettings {
            max_posts: 2,
            days_back: 7,
            ..DigestSettings::default()
        };
        let now = DateTime::parse_from_rfc3339("2024-03-11T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let f = PostFilter::from_settings(&settings, now);
        assert_eq!(titles(&f.apply(sample())), ["a", "b"]);
    }

    #[test]
    fn test_undated_posts_kept() {
        let f = PostFilter {
            published_after: Some(Utc::now()),
            ..PostFilter::default()
        };
        assert!(f.matches(&Post::default()));
    }

    fn dates(list: &[&str]) -> Vec<DateTime<FixedOffset>> {
        list.iter()
            .map(|d| DateTime::parse_from_rfc3339(d).unwrap())
            .collect()
    }

    #[test]
    fn test_suggest_days_back() {
        assert_eq!(suggest_days_back(&[]), None);
        assert_eq!(suggest_days_back(&dates(&["2024-03-10T00:00:00Z"])), None);
        assert_eq!(
            suggest_days_back(&dates(&["2024-03-10T00:00:00Z", "2024-03-05T00:00:00Z"])),
            Some(14)
        );
        assert_eq!(
            suggest_days_back(&dates(&["2024-03-10T00:00:00Z", "2024-02-10T00:00:00Z"])),
            Some(30)
        );
        // Order of the input does not matter.
        assert_eq!(
            suggest_days_back(&dates(&[
                "2024-03-01T00:00:00Z",
                "2024-03-03T00:00:00Z",
                "2024-03-02T00:00:00Z"
            ])),
            Some(7)
        );
    }

    #[test]
    fn test_partial_days_round_down() {
        // 2 days 23 hours counts as 2.
        assert_eq!(
            suggest_days_back(&dates(&["2024-03-03T23:00:00Z", "2024-03-01T00:00:00Z"])),
            Some(7)
        );
    }
}
