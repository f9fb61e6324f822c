//! Profile fetcher: pulls raw material for skill analysis from the outside
//! world: visible text of arbitrary profile pages, and repository listings
//! from the GitHub REST API.
//!
//! Generic scrapes never fail: they degrade to a placeholder sentence so that
//! enrichment keeps going. Repository listings do fail, because "no
//! repositories" and "GitHub unreachable" mean different things to callers.

pub mod github;
pub mod html;

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::fetcher::github::{is_valid_login, RepositoryRow, MAX_REPOSITORIES};
use crate::fetcher::html::{html_to_text, truncate_text};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const HTML_BYTES_PER_TEXT_BYTE: usize = 8;
const API_USER_AGENT: &str = concat!("talent-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for user '{username}'")]
    Status { status: StatusCode, username: String },

    #[error("'{0}' is not a valid GitHub username")]
    InvalidUsername(String),
}

/// Placeholder handed to the model when a page cannot be scraped.
pub fn unavailable_placeholder(url: &str) -> String {
    format!("Could not retrieve content from {url}.")
}

#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub timeout: Duration,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub max_text_bytes: usize,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_token: None,
            max_text_bytes: 50 * 1024,
        }
    }
}

#[derive(Clone)]
pub struct ProfileFetcher {
    client: Client,
    github_api_url: String,
    github_token: Option<String>,
    max_text_bytes: usize,
}

impl ProfileFetcher {
    pub fn new(settings: FetcherSettings) -> Result<Self, FetchError> {
        Ok(Self {
            client: Client::builder().timeout(settings.timeout).build()?,
            github_api_url: settings.github_api_url.trim_end_matches('/').to_string(),
            github_token: settings.github_token,
            max_text_bytes: settings.max_text_bytes,
        })
    }

    /// Returns the visible text of the page at `url`.
    ///
    /// Empty `url` → empty string. Any failure → `unavailable_placeholder(url)`.
    pub async fn fetch_generic_text(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return String::new();
        }

        info!("Scraping URL: {url}");
        match self.scrape(url).await {
            Ok(text) => truncate_text(text, self.max_text_bytes),
            Err(e) => {
                warn!("Failed to scrape {url}: {e}");
                unavailable_placeholder(url)
            }
        }
    }

    /// Raw HTML read per page. Markup outweighs visible text, so the cap is a
    /// multiple of the text budget.
    fn max_html_bytes(&self) -> usize {
        self.max_text_bytes.saturating_mul(HTML_BYTES_PER_TEXT_BYTE)
    }

    async fn scrape(&self, url: &str) -> Result<String, reqwest::Error> {
        let mut response = self
            .client
            .get(url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        let cap = self.max_html_bytes();
        let declared = response.content_length().unwrap_or(0);
        if declared > cap as u64 {
            debug!("{url} declares {declared} bytes; reading the first {cap}");
        }

        let mut body = Vec::with_capacity(cap.min(declared as usize));
        while let Some(chunk) = response.chunk().await? {
            let room = cap - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(html_to_text(&String::from_utf8_lossy(&body)))
    }

    /// Lists up to 20 of the user's most recently updated repositories as
    /// `"name: description"` strings.
    pub async fn fetch_repository_summaries(
        &self,
        username: &str,
    ) -> Result<Vec<String>, FetchError> {
        let username = username.trim();
        if !is_valid_login(username) {
            return Err(FetchError::InvalidUsername(username.to_string()));
        }

        info!("Fetching repositories for {username} using the GitHub API");

        let per_page = MAX_REPOSITORIES.to_string();
        let mut request = self
            .client
            .get(format!("{}/users/{username}/repos", self.github_api_url))
            .query(&[
                ("type", "owner"),
                ("sort", "updated"),
                ("per_page", per_page.as_str()),
            ])
            .header(header::USER_AGENT, API_USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.github_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!("GitHub API returned {status} for {username}");
            return Err(FetchError::Status {
                status,
                username: username.to_string(),
            });
        }

        let repos: Vec<RepositoryRow> = response.json().await?;
        info!("Fetched {} repositories for {username}", repos.len());

        Ok(repos.iter().map(RepositoryRow::summary).collect())
    }
}
