//! Timed HTTP GET helper shared by the query and image pipelines

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Thin wrapper around [`reqwest::Client`] that performs timed GET requests
/// and maps transport failures onto the crate error taxonomy
///
/// Carries no business logic: callers interpret bodies, the fetcher only
/// enforces timeouts and status checks. Cloning is cheap (the underlying
/// client is reference-counted) and shares the connection pool.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given timeouts and User-Agent
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        connect_timeout: Duration,
        request_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL and return the response body as text
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `url` does not parse
    /// - [`Error::NetworkUnavailable`] if the connection cannot be established
    /// - [`Error::Timeout`] if the request exceeds its deadline
    /// - [`Error::Http`] on a non-2xx status
    /// - [`Error::EmptyResponse`] on a 2xx response with an empty body
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(e, url))?;
        if body.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(body)
    }

    /// GET a URL and return the raw response bytes
    ///
    /// Used for image downloads; unlike [`fetch_text`](Self::fetch_text) an
    /// empty body is not rejected here, it simply fails to decode later.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_text`](Self::fetch_text), minus the empty-body check.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_transport_error(e, url))?;
        Ok(bytes.to_vec())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let parsed = Url::parse(url)?;
        debug!(%url, "GET");
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, url))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

/// Map a reqwest error onto the crate taxonomy
///
/// Timeouts and connection failures get their own variants so consumers can
/// distinguish "no connection" from other transport problems.
fn classify_transport_error(err: reqwest::Error, url: &str) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            url: url.to_string(),
        }
    } else if err.is_connect() {
        Error::NetworkUnavailable {
            url: url.to_string(),
        }
    } else {
        Error::Network(err)
    }
}
