use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub reddit: RedditConfig,
    pub classifier: ClassifierConfig,
    pub cache: CacheConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    pub auth_url: String,
    pub api_url: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Upper bound on collapsed "more comments" stubs expanded per post
    #[serde(default = "default_more_expansions")]
    pub more_expansions: usize,
    // Loaded from env
    #[serde(skip)]
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: String,
    #[serde(skip)]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    // Loaded from env, optional
    #[serde(skip)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub search_capacity: usize,
    pub analysis_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub max_sessions: usize,
    #[serde(default = "default_topic")]
    pub default_topic: String,
    #[serde(default = "default_subreddit")]
    pub default_subreddit: String,
}

fn default_search_limit() -> u32 {
    15
}

fn default_more_expansions() -> usize {
    50
}

fn default_max_length() -> usize {
    512
}

fn default_batch_size() -> usize {
    32
}

fn default_topic() -> String {
    "AI ethics".to_string()
}

fn default_subreddit() -> String {
    "technology".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::var("READIT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let config_text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path))?;
        let mut config = Self::parse(&config_text)?;

        config.reddit.client_id = required_env("REDDIT_CLIENT_ID")?;
        config.reddit.client_secret = required_env("REDDIT_CLIENT_SECRET")?;
        config.reddit.user_agent = required_env("REDDIT_USER_AGENT")?;
        config.classifier.api_token = std::env::var("HF_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Ok(config)
    }

    fn parse(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text).context("Failed to parse config file")?;

        if config.classifier.batch_size == 0 {
            anyhow::bail!("classifier.batch_size must be at least 1");
        }
        if config.cache.search_capacity == 0
            || config.cache.analysis_capacity == 0
            || config.web.max_sessions == 0
        {
            anyhow::bail!("cache capacities and web.max_sessions must be at least 1");
        }

        Ok(config)
    }
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| {
            format!(
                "Reddit credentials not found: {} is not set. Add it to the environment or .env",
                name
            )
        })
}
