//! Repository source: GitHub REST v3 client behind a per-user fetch cache.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::project::ProjectRecord;

pub mod cache;
pub mod client;

pub use cache::CachedGitHub;
pub use client::GitHubClient;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GitHub rejected the supplied token")]
    Unauthorized,

    #[error("GitHub rate limit exceeded")]
    RateLimited,
}

/// Where portfolio projects come from.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Owned, non-fork repositories with a description or README.
    /// An unknown user yields an empty list, not an error.
    async fn fetch_projects(
        &self,
        username: &str,
        token: Option<&str>,
    ) -> Result<Vec<ProjectRecord>, GitHubError>;
}

/// Accepts a bare username or a profile URL and returns the username.
pub fn parse_username(input: &str) -> String {
    input
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

static LOGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,37}[A-Za-z0-9])?$")
        .expect("static login pattern is a valid regex")
});

/// GitHub login rules: 1-39 ASCII alphanumerics or hyphens, no leading or
/// trailing hyphen. Anything else must not reach a request path.
pub fn is_valid_login(username: &str) -> bool {
    LOGIN.is_match(username)
}
