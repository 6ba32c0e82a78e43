//! Search response parsing
//!
//! The search API wraps results as `response.results[]`, with per-article
//! optional nests: a `fields` object carrying the thumbnail URL and a `tags`
//! array carrying contributor names. A missing or malformed top level fails
//! the whole batch; anything missing below the article level degrades only
//! that article's affected attribute.

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::types::{Article, ArticleId};

/// Parse a raw search response body into article records
///
/// Article ids are assigned as the zero-based position within the results
/// array, so they are stable only for this one result set.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the body is not JSON or the
/// top-level `response.results` array is missing. Per-article problems never
/// produce an error; the affected fields default instead.
pub fn parse_articles(body: &str) -> Result<Vec<Article>> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {e}")))?;
    let results = root
        .get("response")
        .and_then(|response| response.get("results"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::MalformedResponse("missing top-level response.results array".to_string())
        })?;

    let articles: Vec<Article> = results
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_article(index, raw))
        .collect();
    debug!(count = articles.len(), "parsed search results");
    Ok(articles)
}

/// Build one article record, defaulting any missing or malformed field
fn parse_article(index: usize, raw: &Value) -> Article {
    let thumbnail_url = raw
        .get("fields")
        .and_then(|fields| fields.get("thumbnail"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let authors: Vec<String> = match raw.get("tags").and_then(Value::as_array) {
        Some(tags) => tags
            .iter()
            .filter_map(|tag| tag.get("webTitle").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        None => {
            trace!(index, "article has no tags array, defaulting authors");
            Vec::new()
        }
    };

    #[allow(clippy::cast_possible_truncation)]
    let id = ArticleId(index as u32);
    Article {
        id,
        title: string_field(raw, "webTitle"),
        authors,
        section: string_field(raw, "sectionName"),
        published_at: string_field(raw, "webPublicationDate"),
        thumbnail_url,
        article_url: string_field(raw, "webUrl"),
    }
}

/// Optional scalar field, defaulting to the empty string
fn string_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_json(title: &str) -> String {
        format!(
            r#"{{
                "webTitle": "{title}",
                "sectionName": "Technology",
                "webPublicationDate": "2024-03-01T09:30:00Z",
                "webUrl": "https://example.com/{title}",
                "fields": {{"thumbnail": "https://media.example.com/{title}.jpg"}},
                "tags": [{{"webTitle": "Jane Doe"}}, {{"webTitle": "John Smith"}}]
            }}"#
        )
    }

    fn response_body(articles: &[String]) -> String {
        format!(
            r#"{{"response": {{"status": "ok", "results": [{}]}}}}"#,
            articles.join(",")
        )
    }

    #[test]
    fn test_full_article_parsed() {
        let body = response_body(&[article_json("rust")]);
        let articles = parse_articles(&body).unwrap();

        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.id, ArticleId(0));
        assert_eq!(article.title, "rust");
        assert_eq!(article.section, "Technology");
        assert_eq!(article.published_at, "2024-03-01T09:30:00Z");
        assert_eq!(article.article_url, "https://example.com/rust");
        assert_eq!(
            article.thumbnail_url.as_deref(),
            Some("https://media.example.com/rust.jpg")
        );
        assert_eq!(article.authors, vec!["Jane Doe", "John Smith"]);
    }

    #[test]
    fn test_zero_results_is_empty_list_not_failure() {
        let articles = parse_articles(r#"{"response": {"results": []}}"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_missing_response_object_is_failure() {
        let err = parse_articles(r#"{"results": []}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_results_array_is_failure() {
        let err = parse_articles(r#"{"response": {"status": "ok"}}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_results_not_an_array_is_failure() {
        let err = parse_articles(r#"{"response": {"results": 42}}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_invalid_json_is_failure() {
        let err = parse_articles("definitely not json").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_article_without_tags_keeps_siblings() {
        // Three articles, the middle one missing its tags array: all three
        // records survive, only record 1 loses its authors.
        let middle = r#"{
            "webTitle": "no tags here",
            "sectionName": "World",
            "webPublicationDate": "2024-03-02T10:00:00Z",
            "webUrl": "https://example.com/no-tags",
            "fields": {"thumbnail": "https://media.example.com/no-tags.jpg"}
        }"#
        .to_string();
        let body = response_body(&[article_json("first"), middle, article_json("third")]);

        let articles = parse_articles(&body).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(
            articles.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![ArticleId(0), ArticleId(1), ArticleId(2)]
        );
        assert!(articles[1].authors.is_empty());
        assert_eq!(articles[0].authors.len(), 2);
        assert_eq!(articles[2].authors.len(), 2);
    }

    #[test]
    fn test_article_without_fields_defaults_thumbnail() {
        let bare = r#"{"webTitle": "bare", "tags": []}"#.to_string();
        let articles = parse_articles(&response_body(&[bare])).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].thumbnail_url, None);
        assert_eq!(articles[0].section, "");
        assert_eq!(articles[0].published_at, "");
    }

    #[test]
    fn test_malformed_tag_entries_skipped() {
        let odd_tags = r#"{
            "webTitle": "odd",
            "tags": [{"webTitle": "Real Author"}, {"id": "no title"}, "not an object"]
        }"#
        .to_string();
        let articles = parse_articles(&response_body(&[odd_tags])).unwrap();

        assert_eq!(articles[0].authors, vec!["Real Author"]);
    }

    #[test]
    fn test_empty_thumbnail_string_becomes_none() {
        let empty_thumb = r#"{"webTitle": "t", "fields": {"thumbnail": ""}}"#.to_string();
        let articles = parse_articles(&response_body(&[empty_thumb])).unwrap();
        assert_eq!(articles[0].thumbnail_url, None);
    }
}
