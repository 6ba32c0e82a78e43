//! Core types for newswire

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier of an article within one fetch result
///
/// Assigned as the zero-based position of the article in the parsed results
/// array. Unique within a single result set only: two fetches of the same
/// query may order articles differently, so ids must not be reused across
/// result sets. The image cache is cleared whenever the active search
/// changes for exactly this reason.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ArticleId(pub u32);

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ArticleId {
    fn from(id: u32) -> Self {
        ArticleId(id)
    }
}

/// One parsed search-result item
///
/// Immutable value produced by the query pipeline. Collections of articles
/// are replaced wholesale on each search execution, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Positional id within this result set (see [`ArticleId`])
    pub id: ArticleId,

    /// Article headline (empty string if absent)
    pub title: String,

    /// Contributor names, in the order the API listed them (possibly empty)
    pub authors: Vec<String>,

    /// Section name (empty string if absent)
    pub section: String,

    /// Publication timestamp, stored verbatim as the API sent it
    /// (ISO-8601-like, e.g. `2024-03-01T09:30:00Z`; empty string if absent)
    pub published_at: String,

    /// Thumbnail image URL, if the article has one
    pub thumbnail_url: Option<String>,

    /// URL of the web version of the article (empty string if absent)
    pub article_url: String,
}

impl Article {
    /// Publication date formatted for display (e.g. "1 Mar 2024"), or `None`
    /// if the stored timestamp does not parse
    ///
    /// Reformatting failure is deliberately non-fatal: the record itself is
    /// always produced, and a renderer simply shows no date.
    #[must_use]
    pub fn display_date(&self) -> Option<String> {
        display_date(&self.published_at)
    }
}

/// Reformat an ISO-8601-like timestamp (`yyyy-MM-ddTHH:mm:ssZ`) for display
///
/// Returns `None` on any parse failure instead of an error; a missing or
/// garbled date never blocks rendering the rest of the article.
#[must_use]
pub fn display_date(published_at: &str) -> Option<String> {
    let parsed = NaiveDateTime::parse_from_str(published_at, "%Y-%m-%dT%H:%M:%SZ").ok()?;
    Some(parsed.format("%-d %b %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> Article {
        Article {
            id: ArticleId(0),
            title: "Rust 2.0 announced".to_string(),
            authors: vec!["Jane Doe".to_string()],
            section: "Technology".to_string(),
            published_at: "2024-03-01T09:30:00Z".to_string(),
            thumbnail_url: Some("https://media.example.com/thumb.jpg".to_string()),
            article_url: "https://example.com/article".to_string(),
        }
    }

    #[test]
    fn test_display_date_formats_valid_timestamp() {
        assert_eq!(
            sample_article().display_date(),
            Some("1 Mar 2024".to_string())
        );
    }

    #[test]
    fn test_display_date_tolerates_garbage() {
        assert_eq!(display_date("not-a-date"), None);
        assert_eq!(display_date(""), None);
        // Date-only string lacks the time component, so it does not parse
        assert_eq!(display_date("2024-03-01"), None);
    }

    #[test]
    fn test_article_id_display() {
        assert_eq!(ArticleId(7).to_string(), "7");
    }

    #[test]
    fn test_article_serde_round_trip() {
        let article = sample_article();
        let json = serde_json::to_string(&article).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(article, back);
    }
}
