// GitHub API response types.
// Defines structs for deserializing the repository listing and contributor responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub repository as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRepo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    /// Repository size in KB.
    #[serde(default)]
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Null for repositories that never received a push.
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

impl RawRepo {
    /// Forks, archived and disabled repositories are left off the timeline.
    pub fn is_listable(&self) -> bool {
        !self.fork && !self.archived && !self.disabled
    }
}

pub(crate) fn default_branch() -> String {
    "main".to_string()
}

/// Entry of the contributors endpoint. Only the contribution count is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub login: Option<String>,
    #[serde(default)]
    pub contributions: u64,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_repo() {
        let json = r#"{
            "id": 1,
            "name": "lantern",
            "description": null,
            "html_url": "https://github.com/octo/lantern",
            "language": "Rust",
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "pushed_at": null
        }"#;

        let repo: RawRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.default_branch, "main");
        assert!(repo.topics.is_empty());
        assert!(repo.pushed_at.is_none());
        assert!(repo.is_listable());
    }

    #[test]
    fn test_is_listable() {
        let json = r#"{
            "id": 2,
            "name": "old",
            "description": "retired",
            "html_url": "https://github.com/octo/old",
            "language": null,
            "created_at": "2020-01-01T00:00:00Z",
            "updated_at": "2020-01-01T00:00:00Z",
            "pushed_at": "2020-01-01T00:00:00Z",
            "archived": true
        }"#;

        let repo: RawRepo = serde_json::from_str(json).unwrap();
        assert!(!repo.is_listable());
    }
}
