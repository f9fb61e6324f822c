use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::fetcher::{FetcherSettings, DEFAULT_GITHUB_API_URL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub github_api_url: String,
    /// Optional; raises the GitHub rate limit for repository listings.
    pub github_token: Option<String>,
    /// Timeout for page scrapes and GitHub calls.
    pub http_timeout_secs: u64,
    /// Timeout for a single model round-trip.
    pub llm_timeout_secs: u64,
    /// Upper bound on model turns in a tool-augmented call.
    pub max_tool_rounds: u32,
    pub max_page_text_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            github_api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
            github_token: std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 15)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 90)?,
            max_tool_rounds: parse_env("MAX_TOOL_ROUNDS", 6)?,
            max_page_text_bytes: parse_env("MAX_PAGE_TEXT_BYTES", 50 * 1024)?,
        })
    }

    pub fn fetcher_settings(&self) -> FetcherSettings {
        FetcherSettings {
            timeout: Duration::from_secs(self.http_timeout_secs),
            github_api_url: self.github_api_url.clone(),
            github_token: self.github_token.clone(),
            max_text_bytes: self.max_page_text_bytes,
        }
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}
