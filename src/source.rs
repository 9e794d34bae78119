// Upstream data source.
// The aggregator talks to this trait so it can run against fakes as well as the real services.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::github::{GitHubClient, RawRepo};
use crate::loc::LocClient;

/// Everything the aggregator needs from the outside world.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Repositories of `account`, most recently pushed first.
    async fn list_repos(&self, account: &str) -> Result<Vec<RawRepo>>;

    /// Sum of commit contributions for one repository.
    async fn commit_count(&self, account: &str, repo: &str) -> Result<u64>;

    /// Lines of code on one branch of a repository.
    async fn lines_of_code(&self, account: &str, repo: &str, branch: &str) -> Result<u64>;
}

#[async_trait]
impl<T: RepoSource + ?Sized> RepoSource for Arc<T> {
    async fn list_repos(&self, account: &str) -> Result<Vec<RawRepo>> {
        (**self).list_repos(account).await
    }

    async fn commit_count(&self, account: &str, repo: &str) -> Result<u64> {
        (**self).commit_count(account, repo).await
    }

    async fn lines_of_code(&self, account: &str, repo: &str, branch: &str) -> Result<u64> {
        (**self).lines_of_code(account, repo, branch).await
    }
}

/// `RepoSource` backed by the GitHub REST API and the lines-of-code service.
pub struct HttpSource {
    github: GitHubClient,
    loc: LocClient,
    per_page: u32,
}

impl HttpSource {
    pub fn new(github: GitHubClient, loc: LocClient, per_page: u32) -> Self {
        Self {
            github,
            loc,
            per_page,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let github = GitHubClient::new(
            &config.github_api_base,
            &config.user_agent,
            config.token.as_deref(),
        )?;
        let loc = LocClient::new(&config.loc_api_base, &config.user_agent)?;
        Ok(Self::new(github, loc, config.per_page))
    }

    pub fn github(&self) -> &GitHubClient {
        &self.github
    }
}

#[async_trait]
impl RepoSource for HttpSource {
    async fn list_repos(&self, account: &str) -> Result<Vec<RawRepo>> {
        self.github.list_user_repos(account, self.per_page).await
    }

    async fn commit_count(&self, account: &str, repo: &str) -> Result<u64> {
        self.github.commit_count(account, repo).await
    }

    async fn lines_of_code(&self, account: &str, repo: &str, branch: &str) -> Result<u64> {
        self.loc.lines_of_code(account, repo, branch).await
    }
}
