//! Profile enrichment: orchestrates fetchers and the skill extractor to turn
//! a set of profile URLs into one structured profile.
//!
//! Flow: scrape LinkedIn + LeetCode concurrently → render combined prompt →
//!       tool-augmented extraction (model may list GitHub repos or scrape
//!       more pages on its own) → StructuredProfile, returned unchanged.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::analysis::error::AnalysisError;
use crate::analysis::extractor::SkillExtractor;
use crate::analysis::models::{EnrichmentRequest, SkillSuggestions, StructuredProfile};
use crate::analysis::prompts::ProfileTexts;
use crate::fetcher::github::github_username_from_url;
use crate::fetcher::{FetchError, ProfileFetcher};
use crate::llm_client::tools::{require_str, Capability, CapabilityError, CapabilitySet, ToolSpec};

pub const GITHUB_REPOSITORIES_TOOL: &str = "getGithubRepositories";
pub const SCRAPE_WEBSITE_TOOL: &str = "scrapeWebsite";

// ────────────────────────────────────────────────────────────────────────────
// Capabilities offered to the model
// ────────────────────────────────────────────────────────────────────────────

/// Lists repository summaries for a GitHub username.
pub struct GithubRepositoriesTool {
    fetcher: ProfileFetcher,
}

#[async_trait]
impl Capability for GithubRepositoriesTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: GITHUB_REPOSITORIES_TOOL.to_string(),
            description: "Fetches repository names and descriptions for a GitHub username. \
                Returns a list of \"name: description\" strings for public repositories."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "githubUsername": {"type": "string", "description": "GitHub login, e.g. octocat"}
                },
                "required": ["githubUsername"]
            }),
        }
    }

    async fn invoke(&self, input: Value) -> Result<Value, CapabilityError> {
        let raw = require_str(&input, "githubUsername")?;
        let username = github_username_from_url(raw)
            .ok_or_else(|| CapabilityError::InvalidInput(format!("'{raw}' is not a GitHub username")))?;

        let summaries = self
            .fetcher
            .fetch_repository_summaries(&username)
            .await
            .map_err(|e| CapabilityError::Failed(e.to_string()))?;
        Ok(json!(summaries))
    }
}

/// Returns the visible text of a web page.
pub struct ScrapeWebsiteTool {
    fetcher: ProfileFetcher,
}

#[async_trait]
impl Capability for ScrapeWebsiteTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: SCRAPE_WEBSITE_TOOL.to_string(),
            description: "Scrapes a website and returns its text content.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string", "description": "Absolute http(s) URL"}
                },
                "required": ["url"]
            }),
        }
    }

    async fn invoke(&self, input: Value) -> Result<Value, CapabilityError> {
        let url = require_str(&input, "url")?;
        Ok(Value::String(self.fetcher.fetch_generic_text(url).await))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ProfileEnricher {
    fetcher: ProfileFetcher,
    extractor: SkillExtractor,
}

impl ProfileEnricher {
    pub fn new(fetcher: ProfileFetcher, extractor: SkillExtractor) -> Self {
        Self { fetcher, extractor }
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
            .with(GithubRepositoriesTool {
                fetcher: self.fetcher.clone(),
            })
            .with(ScrapeWebsiteTool {
                fetcher: self.fetcher.clone(),
            })
    }

    /// Builds a structured profile from the given profile links.
    ///
    /// With no links at all this returns `StructuredProfile::empty()` without
    /// calling the model, so signup never fails on missing profiles.
    pub async fn enrich(
        &self,
        request: &EnrichmentRequest,
    ) -> Result<StructuredProfile, AnalysisError> {
        if request.is_empty() {
            info!("Enrichment requested with no profile URLs; returning empty profile");
            return Ok(StructuredProfile::empty());
        }

        // Scrape failures degrade to placeholder text, so the join never fails
        let (linkedin_content, leetcode_content) = tokio::join!(
            self.fetcher.fetch_generic_text(request.linkedin()),
            self.fetcher.fetch_generic_text(request.leetcode()),
        );

        let texts = ProfileTexts {
            github_url: request.github().to_string(),
            linkedin_url: request.linkedin().to_string(),
            leetcode_url: request.leetcode().to_string(),
            linkedin_content,
            leetcode_content,
        };

        self.extractor
            .extract_structured_profile(&texts, &self.capabilities())
            .await
    }

    /// Suggests skills from a user's GitHub repositories.
    /// Accepts a login or a github.com profile URL.
    pub async fn suggest_skills(
        &self,
        github_username: &str,
    ) -> Result<SkillSuggestions, AnalysisError> {
        let username = github_username_from_url(github_username)
            .ok_or_else(|| FetchError::InvalidUsername(github_username.to_string()))?;

        info!("Starting skill suggestion for {username}");
        let summaries = self.fetcher.fetch_repository_summaries(&username).await?;
        let skills = self
            .extractor
            .extract_skills_from_repositories(&summaries)
            .await?;
        Ok(SkillSuggestions { skills })
    }

    /// Suggests skills from LinkedIn and LeetCode pages.
    pub async fn suggest_social_skills(
        &self,
        linkedin_url: &str,
        leetcode_url: &str,
    ) -> Result<SkillSuggestions, AnalysisError> {
        if linkedin_url.trim().is_empty() && leetcode_url.trim().is_empty() {
            return Ok(SkillSuggestions::default());
        }

        let (linkedin_content, leetcode_content) = tokio::join!(
            self.fetcher.fetch_generic_text(linkedin_url),
            self.fetcher.fetch_generic_text(leetcode_url),
        );
        let skills = self
            .extractor
            .extract_skills_from_social_text(&linkedin_content, &leetcode_content)
            .await?;
        Ok(SkillSuggestions { skills })
    }
}
