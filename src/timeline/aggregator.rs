// Repository timeline aggregator.
// Lists, filters, enriches, sorts and caches an account's repositories.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::error::{Result, TimelineError};
use crate::github::RawRepo;
use crate::source::RepoSource;

use super::model::{ProcessedRepo, process_repo, ten_weeks_ago};

/// Cache key for the aggregated timeline.
pub const CACHE_KEY: &str = "github-timeline-data";

/// Error reported when the aggregation fails without an upstream status.
pub const CONNECT_ERROR: &str = "Failed to connect to GitHub API";

/// What gets stored in the cache for one aggregation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTimeline {
    pub repos: Vec<ProcessedRepo>,
    pub ten_weeks_ago_date: DateTime<Utc>,
}

/// Result handed to the presentation layer. Failures show up in `error`, never as `Err`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineData {
    pub repos: Vec<ProcessedRepo>,
    pub ten_weeks_ago_date: DateTime<Utc>,
    pub error: Option<String>,
    pub from_cache: bool,
}

impl TimelineData {
    fn failed(error: String, now: DateTime<Utc>) -> Self {
        Self {
            repos: Vec::new(),
            ten_weeks_ago_date: ten_weeks_ago(now),
            error: Some(error),
            from_cache: false,
        }
    }
}

/// Builds the repository timeline for one account, at most once per cache window.
pub struct TimelineLoader<S> {
    source: S,
    cache: Arc<TtlCache<CachedTimeline>>,
    clock: Arc<dyn Clock>,
    account: String,
    max_concurrency: usize,
}

impl<S: RepoSource> TimelineLoader<S> {
    pub fn new(
        source: S,
        cache: Arc<TtlCache<CachedTimeline>>,
        clock: Arc<dyn Clock>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            source,
            cache,
            clock,
            account: account.into(),
            max_concurrency: 8,
        }
    }

    /// Cap on repositories enriched at once. Zero is treated as one.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &Arc<TtlCache<CachedTimeline>> {
        &self.cache
    }

    /// Return the cached timeline, or rebuild it from upstream on a miss.
    pub async fn load(&self) -> TimelineData {
        if let Some(cached) = self.cache.get(CACHE_KEY) {
            debug!(account = %self.account, repos = cached.repos.len(), "timeline cache hit");
            return TimelineData {
                repos: cached.repos,
                ten_weeks_ago_date: cached.ten_weeks_ago_date,
                error: None,
                from_cache: true,
            };
        }

        match self.build().await {
            Ok(data) => data,
            Err(TimelineError::Status(status)) => {
                warn!(account = %self.account, status, "repository listing failed");
                TimelineData::failed(
                    format!("Failed to fetch repos: {}", status),
                    self.clock.now(),
                )
            }
            Err(e) => {
                warn!(account = %self.account, error = %e, "failed to build timeline");
                TimelineData::failed(CONNECT_ERROR.to_string(), self.clock.now())
            }
        }
    }

    /// Drop the cached timeline and rebuild it.
    pub async fn refresh(&self) -> TimelineData {
        self.cache.invalidate(CACHE_KEY);
        self.load().await
    }

    async fn build(&self) -> Result<TimelineData> {
        let listed = self
            .source
            .list_repos(&self.account)
            .await
            .map_err(listing_error)?;

        let repos = filter_listable(listed);
        info!(account = %self.account, repos = repos.len(), "enriching repositories");

        let stats: Vec<(u64, u64)> = stream::iter(repos.iter())
            .map(|repo| self.fetch_stats(repo))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let now = self.clock.now();
        let mut processed: Vec<ProcessedRepo> = repos
            .iter()
            .zip(stats)
            .map(|(repo, (commits, loc))| process_repo(repo, commits, loc, now))
            .collect();
        sort_by_push_desc(&mut processed);

        let ten_weeks_ago_date = ten_weeks_ago(now);
        self.cache.set(
            CACHE_KEY,
            CachedTimeline {
                repos: processed.clone(),
                ten_weeks_ago_date,
            },
        );

        Ok(TimelineData {
            repos: processed,
            ten_weeks_ago_date,
            error: None,
            from_cache: false,
        })
    }

    /// Commit count and lines of code for one repository, fetched together.
    /// Either failing counts as zero.
    async fn fetch_stats(&self, repo: &RawRepo) -> (u64, u64) {
        let (commits, loc) = tokio::join!(
            self.source.commit_count(&self.account, &repo.name),
            self.source
                .lines_of_code(&self.account, &repo.name, &repo.default_branch),
        );

        let commits = commits.unwrap_or_else(|e| {
            debug!(repo = %repo.name, error = %e, "commit count unavailable");
            0
        });
        let loc = loc.unwrap_or_else(|e| {
            debug!(repo = %repo.name, error = %e, "lines of code unavailable");
            0
        });
        (commits, loc)
    }
}

/// A listing failure that carries an HTTP status is reported with that status.
fn listing_error(e: TimelineError) -> TimelineError {
    match e.status() {
        Some(status) => TimelineError::Status(status),
        None => e,
    }
}

/// Drop forks, archived and disabled repositories, keeping listing order.
pub fn filter_listable(repos: Vec<RawRepo>) -> Vec<RawRepo> {
    repos.into_iter().filter(RawRepo::is_listable).collect()
}

/// Most recently pushed first. Stable, so ties keep listing order.
pub fn sort_by_push_desc(repos: &mut [ProcessedRepo]) {
    repos.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
}
