// GitHub API endpoint functions.
// Typed methods for the repository listing and contributor statistics.

use serde_json::Value;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{Contributor, RawRepo};

/// Largest page the listing endpoint accepts.
pub const MAX_PER_PAGE: u32 = 100;

impl GitHubClient {
    /// List an account's public repositories, most recently pushed first.
    pub async fn list_user_repos(&self, account: &str, per_page: u32) -> Result<Vec<RawRepo>> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let params = [("sort", "pushed"), ("per_page", per_page.as_str())];
        let response = self
            .get_with_params(&format!("/users/{}/repos", account), &params)
            .await?;
        let repos: Vec<RawRepo> = response.json().await?;
        Ok(repos)
    }

    /// Raw contributors payload. GitHub answers 202 with an empty object while it
    /// computes statistics, so the body is not guaranteed to be an array.
    pub async fn get_contributors(&self, owner: &str, repo: &str) -> Result<Value> {
        let response = self
            .get(&format!("/repos/{}/{}/contributors", owner, repo))
            .await?;
        let body: Value = response.json().await?;
        Ok(body)
    }

    /// Total commit contributions across all contributors.
    pub async fn commit_count(&self, owner: &str, repo: &str) -> Result<u64> {
        let body = self.get_contributors(owner, repo).await?;
        Ok(sum_contributions(&body))
    }
}

/// Sum `contributions` over a contributors array. Anything that is not an array counts as
/// no contributors; entries without a usable count add nothing.
pub fn sum_contributions(body: &Value) -> u64 {
    let Some(entries) = body.as_array() else {
        return 0;
    };

    entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<Contributor>(entry.clone()).ok())
        .map(|c| c.contributions)
        .sum()
}
