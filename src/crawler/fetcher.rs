//! HTTP fetcher implementation
//!
//! This module turns a URL into a parsed [`Page`]:
//! - Building the HTTP client with the configured user agent
//! - Issuing one GET per call, with no retry
//! - Accepting only HTTP 200 responses
//! - Classifying failures as transport, status, or body errors

use crate::config::HttpConfig;
use crate::crawler::document::Page;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

/// Errors raised while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Error opening link {url}: {code} - {status}")]
    Status {
        url: String,
        code: u16,
        status: String,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// The URL the failed request was aimed at
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Builds an HTTP client with the configured user agent
///
/// No request timeout is set; the transport defaults apply.
///
/// # Example
///
/// ```no_run
/// use workshop_harvest::config::HttpConfig;
/// use workshop_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and parses the body into a [`Page`]
///
/// | Condition | Result |
/// |-----------|--------|
/// | URL does not parse | `InvalidUrl` |
/// | DNS / connect / timeout | `Transport` |
/// | Any status other than 200 | `Status` with code and status line |
/// | Body cannot be decoded | `Body` |
///
/// Relative links on the returned page resolve against the final URL after
/// redirects.
///
/// # Arguments
///
/// * `client` - HTTP client built by [`build_http_client`]
/// * `url` - Absolute URL of the catalog or detail page
///
/// # Returns
///
/// * `Ok(Page)` - Parsed document with its final URL
/// * `Err(FetchError)` - The request failed or the status was not 200
pub async fn fetch_document(client: &Client, url: &str) -> Result<Page, FetchError> {
    let target = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    let response = client
        .get(target)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status {
            url: url.to_string(),
            code: status.as_u16(),
            status: status.to_string(),
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    tracing::trace!("Fetched {} ({} bytes)", final_url, body.len());
    Ok(Page::parse(final_url, &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::document::{select_text, Node};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&HttpConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_parses_ok_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><h1 class=\"t\">Hello</h1></body></html>"),
            )
            .mount(&server)
            .await;

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let page = fetch_document(&client, &format!("{}/page", server.uri()))
            .await
            .unwrap();

        assert_eq!(select_text(&page.root(), ".t"), "Hello");
        assert_eq!(page.root().query("h1").len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let url = format!("{}/missing", server.uri());
        let err = fetch_document(&client, &url).await.unwrap_err();

        match err {
            FetchError::Status { code, status, .. } => {
                assert_eq!(code, 404);
                assert!(status.contains("Not Found"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_other_success_codes_are_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let err = fetch_document(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { code: 204, .. }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is very likely closed
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = build_http_client(&HttpConfig::default()).unwrap();
        let url = format!("http://127.0.0.1:{port}/");
        let err = fetch_document(&client, &url).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.url(), url);
    }

    #[tokio::test]
    async fn test_fetch_empty_url_is_invalid() {
        let client = build_http_client(&HttpConfig::default()).unwrap();
        let err = fetch_document(&client, "").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
