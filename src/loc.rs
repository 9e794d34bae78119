// Lines-of-code service client.
// Counts a repository branch's lines through a ghloc-style HTTP service.

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;

use crate::error::{Result, TimelineError};

pub const LOC_API_BASE: &str = "https://ghloc.ifels.dev";

/// Client for the lines-of-code counting service.
pub struct LocClient {
    client: Client,
    base_url: String,
}

impl LocClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| TimelineError::Config(e.to_string()))?,
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Total lines of code on `branch`. A response without a numeric `loc` counts as zero.
    pub async fn lines_of_code(&self, owner: &str, repo: &str, branch: &str) -> Result<u64> {
        let url = format!("{}/{}/{}/{}", self.base_url, owner, repo, branch);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .query(&[("pretty", "false")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimelineError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        Ok(extract_loc(&body))
    }
}

fn extract_loc(body: &Value) -> u64 {
    match body.get("loc") {
        Some(loc) => loc
            .as_u64()
            .or_else(|| loc.as_f64().filter(|v| *v > 0.0).map(|v| v as u64))
            .unwrap_or(0),
        None => 0,
    }
}
