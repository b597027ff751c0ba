//! Time-bounded cache of fetched repositories, keyed by user and token presence.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{GitHubClient, GitHubError, RepositorySource};
use crate::models::project::ProjectRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    username: String,
    authenticated: bool,
}

impl CacheKey {
    pub fn new(username: &str, authenticated: bool) -> Self {
        Self {
            username: username.to_lowercase(),
            authenticated,
        }
    }
}

struct CacheEntry {
    stored_at: Instant,
    projects: Vec<ProjectRecord>,
}

pub struct FetchCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &CacheKey, now: Instant) -> Option<Vec<ProjectRecord>> {
        let mut entries = self.entries.lock().await;
        let fresh = entries
            .get(key)
            .map(|e| now.saturating_duration_since(e.stored_at) < self.ttl);
        match fresh {
            Some(true) => entries.get(key).map(|e| e.projects.clone()),
            Some(false) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `projects` and drops every entry that has outlived the TTL.
    pub async fn insert(&self, key: CacheKey, projects: Vec<ProjectRecord>, now: Instant) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, e| now.saturating_duration_since(e.stored_at) < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                stored_at: now,
                projects,
            },
        );
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// [`GitHubClient`] with successful fetches cached for the configured TTL.
pub struct CachedGitHub {
    client: GitHubClient,
    cache: FetchCache,
}

impl CachedGitHub {
    pub fn new(client: GitHubClient, ttl: Duration) -> Self {
        Self {
            client,
            cache: FetchCache::new(ttl),
        }
    }
}

#[async_trait]
impl RepositorySource for CachedGitHub {
    async fn fetch_projects(
        &self,
        username: &str,
        token: Option<&str>,
    ) -> Result<Vec<ProjectRecord>, GitHubError> {
        let key = CacheKey::new(username, self.client.effective_token(token).is_some());
        if let Some(projects) = self.cache.get(&key, Instant::now()).await {
            debug!(username, "Serving repositories from cache");
            return Ok(projects);
        }
        let projects = self.client.fetch_projects(username, token).await?;
        self.cache
            .insert(key, projects.clone(), Instant::now())
            .await;
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = FetchCache::new(Duration::from_secs(60));
        let key = CacheKey::new("Octo", false);
        let t0 = Instant::now();
        cache
            .insert(key.clone(), vec![ProjectRecord::new("a", "d")], t0)
            .await;

        assert!(cache.get(&key, t0 + Duration::from_secs(59)).await.is_some());
        assert!(cache.get(&key, t0 + Duration::from_secs(61)).await.is_none());
        // Expired entries are evicted.
        assert!(cache.get(&key, t0).await.is_none());
    }

    #[tokio::test]
    async fn test_insert_evicts_expired_entries_for_other_users() {
        let cache = FetchCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        for user in ["alice", "bob", "carol"] {
            cache.insert(CacheKey::new(user, false), Vec::new(), t0).await;
        }
        cache
            .insert(CacheKey::new("dave", false), Vec::new(), t0 + Duration::from_secs(120))
            .await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_key_ignores_case_but_not_authentication() {
        let cache = FetchCache::new(Duration::from_secs(60));
        let now = Instant::now();
        cache
            .insert(CacheKey::new("Octo", false), Vec::new(), now)
            .await;
        assert!(cache.get(&CacheKey::new("octo", false), now).await.is_some());
        assert!(cache.get(&CacheKey::new("octo", true), now).await.is_none());
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "octo" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octo/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&server.uri(), None, 1, Duration::from_secs(5)).unwrap();
        let source = CachedGitHub::new(client, Duration::from_secs(3600));
        assert!(source.fetch_projects("octo", None).await.unwrap().is_empty());
        assert!(source.fetch_projects("OCTO", None).await.unwrap().is_empty());
    }
}
