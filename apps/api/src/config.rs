use anyhow::{bail, Context, Result};

pub const EMBEDDING_PROVIDERS: &[&str] = &["local", "ollama", "disabled"];
pub const SUMMARY_PROVIDERS: &[&str] = &["anthropic", "ollama", "disabled"];

/// Application configuration loaded from environment variables.
/// Startup fails if a provider name is unknown or a provider's key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub fetch_cache_ttl_secs: u64,
    pub github_max_commit_pages: u32,
    pub embedding_provider: String,
    pub embedding_model: Option<String>,
    pub summary_provider: String,
    pub summary_model: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub ollama_url: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            github_api_url: optional("GITHUB_API_URL")
                .unwrap_or_else(|| "https://api.github.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            github_token: optional("GITHUB_TOKEN"),
            fetch_cache_ttl_secs: parse_or(&lookup, "FETCH_CACHE_TTL_SECS", 3600)?,
            github_max_commit_pages: parse_or(&lookup, "GITHUB_MAX_COMMIT_PAGES", 10)?,
            embedding_provider: optional("EMBEDDING_PROVIDER")
                .unwrap_or_else(|| "local".to_string())
                .to_lowercase(),
            embedding_model: optional("EMBEDDING_MODEL"),
            summary_provider: optional("SUMMARY_PROVIDER")
                .unwrap_or_else(|| "disabled".to_string())
                .to_lowercase(),
            summary_model: optional("SUMMARY_MODEL"),
            anthropic_api_key: optional("ANTHROPIC_API_KEY"),
            ollama_url: optional("OLLAMA_URL")
                .unwrap_or_else(|| "http://localhost:11434".to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !EMBEDDING_PROVIDERS.contains(&self.embedding_provider.as_str()) {
            bail!(
                "EMBEDDING_PROVIDER must be one of {:?}, got '{}'",
                EMBEDDING_PROVIDERS,
                self.embedding_provider
            );
        }
        if !SUMMARY_PROVIDERS.contains(&self.summary_provider.as_str()) {
            bail!(
                "SUMMARY_PROVIDER must be one of {:?}, got '{}'",
                SUMMARY_PROVIDERS,
                self.summary_provider
            );
        }
        if self.summary_provider == "anthropic" && self.anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when SUMMARY_PROVIDER=anthropic");
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
