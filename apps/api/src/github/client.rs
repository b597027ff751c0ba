use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{is_valid_login, GitHubError};
use crate::models::project::{ProjectRecord, UNSPECIFIED_LANGUAGE};

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const USER_AGENT: &str = concat!("portfolio-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct RepoPayload {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default)]
    fork: bool,
    owner: OwnerPayload,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

/// Thin GitHub REST client. Tokens are sent as bearer credentials; the
/// configured default token is used when a request supplies none.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    default_token: Option<String>,
    max_commit_pages: u32,
}

impl GitHubClient {
    pub fn new(
        base_url: &str,
        default_token: Option<String>,
        max_commit_pages: u32,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        Ok(Self {
            http: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_token,
            max_commit_pages,
        })
    }

    /// The token a request would actually use.
    pub fn effective_token<'a>(&'a self, token: Option<&'a str>) -> Option<&'a str> {
        token
            .filter(|t| !t.trim().is_empty())
            .or(self.default_token.as_deref())
    }

    fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        self.get_as(path, token, JSON_MEDIA_TYPE)
    }

    fn get_as(&self, path: &str, token: Option<&str>, accept: &str) -> RequestBuilder {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", API_VERSION);
        match self.effective_token(token) {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    pub async fn fetch_projects(
        &self,
        username: &str,
        token: Option<&str>,
    ) -> Result<Vec<ProjectRecord>, GitHubError> {
        if !is_valid_login(username) {
            warn!("Refusing to query invalid GitHub login {username:?}");
            return Ok(Vec::new());
        }
        let user = self.get(&format!("/users/{username}"), token).send().await?;
        if user.status() == StatusCode::NOT_FOUND {
            info!("GitHub user '{username}' not found");
            return Ok(Vec::new());
        }
        check(user).await?;

        let repos = self.list_repos(username, token).await?;
        let mut projects = Vec::new();
        for repo in repos {
            if repo.fork {
                continue;
            }
            let readme = self.readme(&repo.owner.login, &repo.name, token).await?;
            let description = repo.description.unwrap_or_default();
            if description.trim().is_empty() && readme.trim().is_empty() {
                debug!("Skipping '{}': no description or README", repo.name);
                continue;
            }
            let commits = self
                .commit_dates(&repo.owner.login, &repo.name, token)
                .await?;

            let mut project = ProjectRecord::new(repo.name, description)
                .with_readme(readme)
                .with_stars(repo.stargazers_count)
                .with_language(
                    repo.language
                        .filter(|l| !l.trim().is_empty())
                        .unwrap_or_else(|| UNSPECIFIED_LANGUAGE.to_string()),
                );
            project.commits = commits;
            projects.push(project);
        }

        info!(
            username,
            projects = projects.len(),
            "Fetched GitHub repositories"
        );
        Ok(projects)
    }

    async fn list_repos(
        &self,
        username: &str,
        token: Option<&str>,
    ) -> Result<Vec<RepoPayload>, GitHubError> {
        let mut repos = Vec::new();
        for page in 1.. {
            let response = self
                .get(
                    &format!("/users/{username}/repos?per_page={PER_PAGE}&type=owner&page={page}"),
                    token,
                )
                .send()
                .await?;
            let batch: Vec<RepoPayload> = check(response).await?.json().await?;
            let done = batch.len() < PER_PAGE;
            repos.extend(batch);
            if done {
                break;
            }
        }
        Ok(repos)
    }

    /// Raw README text; missing or unreadable READMEs are empty.
    async fn readme(
        &self,
        owner: &str,
        repo: &str,
        token: Option<&str>,
    ) -> Result<String, GitHubError> {
        let response = self
            .get_as(&format!("/repos/{owner}/{repo}/readme"), token, RAW_MEDIA_TYPE)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(String::new());
        }
        match check(response).await {
            Ok(r) => Ok(r.text().await?),
            Err(e @ (GitHubError::Unauthorized | GitHubError::RateLimited)) => Err(e),
            Err(e) => {
                warn!("README for {owner}/{repo} unavailable: {e}");
                Ok(String::new())
            }
        }
    }

    /// Author dates of up to `max_commit_pages` pages of commits. Empty
    /// repositories (409) and inaccessible histories yield no dates.
    async fn commit_dates(
        &self,
        owner: &str,
        repo: &str,
        token: Option<&str>,
    ) -> Result<Vec<DateTime<Utc>>, GitHubError> {
        let mut dates = Vec::new();
        for page in 1..=self.max_commit_pages {
            let response = self
                .get(
                    &format!("/repos/{owner}/{repo}/commits?per_page={PER_PAGE}&page={page}"),
                    token,
                )
                .send()
                .await?;
            if matches!(
                response.status(),
                StatusCode::NOT_FOUND | StatusCode::CONFLICT
            ) {
                break;
            }
            let batch: Vec<CommitPayload> = match check(response).await {
                Ok(r) => r.json().await?,
                Err(e @ (GitHubError::Unauthorized | GitHubError::RateLimited)) => return Err(e),
                Err(e) => {
                    warn!("Commits for {owner}/{repo} unavailable: {e}");
                    break;
                }
            };
            let done = batch.len() < PER_PAGE;
            dates.extend(
                batch
                    .into_iter()
                    .filter_map(|c| c.commit.author.and_then(|a| a.date)),
            );
            if done {
                break;
            }
        }
        Ok(dates)
    }
}

async fn check(response: Response) -> Result<Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(GitHubError::Unauthorized);
    }
    let exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0");
    if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted) {
        return Err(GitHubError::RateLimited);
    }
    let message = response.text().await.unwrap_or_default();
    Err(GitHubError::Api {
        status: status.as_u16(),
        message,
    })
}
