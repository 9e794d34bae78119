// GitHub API module.
// Provides the client and types for the repository listing and contributor endpoints.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GITHUB_API_BASE, GitHubClient};
pub use endpoints::{MAX_PER_PAGE, sum_contributions};
pub use types::*;
