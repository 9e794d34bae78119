// Timeline record types.
// Turns raw GitHub repositories plus fetched metrics into display-ready records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::github::RawRepo;

/// Window that counts as recent activity.
pub const RECENT_WINDOW_DAYS: i64 = 70;

/// Size bucket derived from lines of code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Minimal,
    Small,
    Medium,
    Large,
    Massive,
}

impl SizeCategory {
    /// Half-open buckets: [0, 500), [500, 2000), [2000, 10000), [10000, 50000), [50000, ..).
    pub fn from_loc(lines_of_code: u64) -> Self {
        match lines_of_code {
            50_000.. => SizeCategory::Massive,
            10_000.. => SizeCategory::Large,
            2_000.. => SizeCategory::Medium,
            500.. => SizeCategory::Small,
            _ => SizeCategory::Minimal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeCategory::Minimal => "minimal",
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
            SizeCategory::Massive => "massive",
        }
    }
}

/// Repository enriched with commit and size metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRepo {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    /// Size in KB as reported by GitHub.
    pub size: u64,
    pub commit_count: u64,
    pub lines_of_code: u64,
    pub size_category: SizeCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
    pub topics: Vec<String>,
    pub is_fork: bool,
    pub is_archived: bool,
    /// Evaluated against `now` when the record is built, not when it is read.
    pub is_within_last_10_weeks: bool,
}

/// Build a display record. A repository that was never pushed to uses its creation date.
pub fn process_repo(
    repo: &RawRepo,
    commit_count: u64,
    lines_of_code: u64,
    now: DateTime<Utc>,
) -> ProcessedRepo {
    let pushed_at = repo.pushed_at.unwrap_or(repo.created_at);

    ProcessedRepo {
        id: repo.id,
        name: repo.name.clone(),
        display_name: format_repo_name(&repo.name),
        description: repo.description.clone(),
        url: repo.html_url.clone(),
        homepage: repo.homepage.clone(),
        language: repo.language.clone(),
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        size: repo.size,
        commit_count,
        lines_of_code,
        size_category: SizeCategory::from_loc(lines_of_code),
        created_at: repo.created_at,
        updated_at: repo.updated_at,
        pushed_at,
        topics: repo.topics.clone(),
        is_fork: repo.fork,
        is_archived: repo.archived,
        is_within_last_10_weeks: is_within_last_10_weeks(pushed_at, now)
            || is_within_last_10_weeks(repo.created_at, now),
    }
}

/// "my-cool_project" -> "My Cool Project".
pub fn format_repo_name(name: &str) -> String {
    name.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn ten_weeks_ago(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENT_WINDOW_DAYS)
}

pub fn is_within_last_10_weeks(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    date >= ten_weeks_ago(now)
}
