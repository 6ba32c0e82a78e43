//! Search URL construction

use url::Url;

use crate::error::Result;

/// Sort order for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Most recently published first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Best match for the query term first
    Relevance,
}

impl OrderBy {
    /// The query-parameter value the API expects
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Newest => "newest",
            OrderBy::Oldest => "oldest",
            OrderBy::Relevance => "relevance",
        }
    }
}

/// Builder for a fully-formed article search URL
///
/// Always requests contributor tags and the thumbnail field, since the
/// parser and the image pipeline depend on both being present when the API
/// has them.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    endpoint: String,
    api_key: String,
    query: String,
    order_by: OrderBy,
    page_size: u32,
}

impl SearchRequest {
    /// Create a request against `endpoint` (e.g. a `/search` path on the
    /// content API) authorized by `api_key`
    #[must_use]
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            query: String::new(),
            order_by: OrderBy::default(),
            page_size: 10,
        }
    }

    /// Set the search term
    #[must_use]
    pub fn query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    /// Set the result ordering
    #[must_use]
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    /// Set how many results one fetch returns
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the absolute search URL
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidUrl`] if the endpoint does not parse.
    pub fn build(&self) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("q", &self.query)
            .append_pair("order-by", self.order_by.as_str())
            .append_pair("show-tags", "contributor")
            .append_pair("show-fields", "thumbnail")
            .append_pair("page-size", &self.page_size.to_string())
            .append_pair("api-key", &self.api_key);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_includes_all_parameters() {
        let url = SearchRequest::new("https://content.example.com/search", "test-key")
            .query("technology")
            .order_by(OrderBy::Relevance)
            .page_size(25)
            .build()
            .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "technology".to_string())));
        assert!(pairs.contains(&("order-by".to_string(), "relevance".to_string())));
        assert!(pairs.contains(&("show-tags".to_string(), "contributor".to_string())));
        assert!(pairs.contains(&("show-fields".to_string(), "thumbnail".to_string())));
        assert!(pairs.contains(&("page-size".to_string(), "25".to_string())));
        assert!(pairs.contains(&("api-key".to_string(), "test-key".to_string())));
    }

    #[test]
    fn test_query_term_is_percent_encoded() {
        let url = SearchRequest::new("https://content.example.com/search", "k")
            .query("climate change")
            .build()
            .unwrap();
        assert!(url.as_str().contains("q=climate+change"));
    }

    #[test]
    fn test_defaults() {
        let url = SearchRequest::new("https://content.example.com/search", "k")
            .build()
            .unwrap();
        assert!(url.as_str().contains("order-by=newest"));
        assert!(url.as_str().contains("page-size=10"));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = SearchRequest::new("not an endpoint", "k").build().unwrap_err();
        assert!(matches!(err, crate::Error::InvalidUrl(_)));
    }
}
