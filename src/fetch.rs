//! HTTP fetching of source pages.
//!
//! A single [`reqwest::Client`] carries the fixed desktop User-Agent; every
//! page is one GET with no timeout and no retry. Non-2xx answers surface as
//! [`ScrapeError::HttpStatus`], connection problems as
//! [`ScrapeError::Transport`].

use crate::error::ScrapeError;
use reqwest::{Client, ClientBuilder};
use tracing::{debug, info, instrument};
use url::Url;

/// Desktop browser User-Agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

/// Build the HTTP client shared by both sources.
///
/// # Errors
///
/// Returns [`ScrapeError::Transport`] if the TLS backend cannot be initialized.
pub fn build_client() -> Result<Client, ScrapeError> {
    client_builder()
        .build()
        .map_err(|e| ScrapeError::from_reqwest("<client>", e))
}

fn client_builder() -> ClientBuilder {
    Client::builder().user_agent(USER_AGENT)
}

/// GET `url` and return the body as text.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_html(client: &Client, url: &Url) -> Result<String, ScrapeError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ScrapeError::from_reqwest(url.as_str(), e))?;

    let status = response.status();
    debug!(%status, "Received response");

    let body = response
        .error_for_status()
        .map_err(|e| ScrapeError::from_reqwest(url.as_str(), e))?
        .text()
        .await
        .map_err(|e| ScrapeError::from_reqwest(url.as_str(), e))?;

    info!(bytes = body.len(), "Fetched page");
    Ok(body)
}


#[cfg(test)]
mod tests {
    use super::testing::{http_response, local_client, one_shot_server, refused_url};
    use super::*;

    #[test]
    fn test_build_client() {
        assert!(build_client().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_user_agent() {
        let (url, server) = one_shot_server("/bonuses", http_response("200 OK", "<p>hello</p>\n")).await;

        let client = local_client();
        let body = fetch_html(&client, &url).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(body, "<p>hello</p>\n");
        assert!(request.starts_with("GET /bonuses HTTP/1.1"));
        assert!(request.to_lowercase().contains(&format!("user-agent: {}", USER_AGENT.to_lowercase())));
    }

    #[tokio::test]
    async fn test_error_status_is_http_status_error() {
        let (url, server) = one_shot_server("/bonuses", http_response("503 Service Unavailable", "")).await;

        let client = local_client();
        let err = fetch_html(&client, &url).await.unwrap_err();
        server.await.unwrap();

        match err {
            ScrapeError::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 503),
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        let client = local_client();
        let url = refused_url("/partners").await;
        let err = fetch_html(&client, &url).await.unwrap_err();

        assert!(matches!(err, ScrapeError::Transport { .. }));
    }
}
