// GitHub API HTTP client.
// Handles default headers, optional authentication, rate limit tracking and status mapping.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{Result, TimelineError};

use super::types::RateLimit;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub API client with rate limit tracking.
///
/// Requests take `&self` so one client can serve many concurrent enrichment calls.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client against `base_url`. The token is optional; unauthenticated
    /// requests work but get a much lower rate limit.
    pub fn new(base_url: &str, user_agent: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| TimelineError::Config(e.to_string()))?,
            );
        }
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| TimelineError::Config(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(TimelineError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Snapshot of the rate limit seen on the last response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).query(params).send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let mut rate_limit = self.rate_limit.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(TimelineError::Unauthorized),
            StatusCode::NOT_FOUND => Err(TimelineError::NotFound(response.url().to_string())),
            StatusCode::FORBIDDEN if has_exhausted_rate_limit(&response) => {
                let reset = self.rate_limit().reset;
                let reset_at = chrono::DateTime::from_timestamp(reset as i64, 0)
                    .map(|dt| dt.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                tracing::warn!(%reset_at, "GitHub rate limit exhausted");
                Err(TimelineError::RateLimited { reset_at })
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), %body, "GitHub request failed");
                Err(TimelineError::Status(status.as_u16()))
            }
        }
    }
}

fn has_exhausted_rate_limit(response: &Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_headers_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rate_limit")
            .match_header("accept", GITHUB_ACCEPT)
            .match_header("user-agent", "timeline-test")
            .with_status(200)
            .with_header("x-ratelimit-limit", "60")
            .with_header("x-ratelimit-remaining", "59")
            .with_header("x-ratelimit-reset", "1700000000")
            .with_body("{}")
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "timeline-test", None).unwrap();
        client.get("/rate_limit").await.unwrap();

        mock.assert_async().await;
        let rate_limit = client.rate_limit();
        assert_eq!(rate_limit.limit, 60);
        assert_eq!(rate_limit.remaining, 59);
        assert_eq!(rate_limit.reset, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_token_sent_as_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/user")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "timeline-test", Some("secret")).unwrap();
        client.get("/user").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/forbidden")
            .with_status(403)
            .with_header("x-ratelimit-remaining", "12")
            .create_async()
            .await;
        server
            .mock("GET", "/limited")
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .with_header("x-ratelimit-reset", "1700000000")
            .create_async()
            .await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), "timeline-test", None).unwrap();

        let err = client.get("/forbidden").await.unwrap_err();
        assert!(matches!(err, TimelineError::Status(403)));

        let err = client.get("/limited").await.unwrap_err();
        assert!(matches!(err, TimelineError::RateLimited { .. }));

        let err = client.get("/missing").await.unwrap_err();
        assert!(matches!(err, TimelineError::NotFound(_)));
    }
}
