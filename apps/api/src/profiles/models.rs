use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis::models::{
    EnrichmentRequest, FeedbackRequest, RoadmapRequest, Skill, StructuredProfile,
};

pub const MIN_YEAR: u8 = 1;
pub const MAX_YEAR: u8 = 5;
pub const MIN_NAME_LEN: usize = 2;
pub const MIN_WEEKLY_ACTIVITY_LEN: usize = 20;

/// A user's stored profile document. Every field except `uid` may be absent:
/// a freshly created account has no analysis yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leetcode_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// The view other users get: contact details stripped.
    pub fn public(self) -> Self {
        Self {
            email: None,
            ..self
        }
    }

    pub fn skill_names(&self) -> Vec<String> {
        self.skills
            .iter()
            .flatten()
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.skills
            .iter()
            .flatten()
            .any(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Profile links stored on the document.
    pub fn enrichment_request(&self) -> EnrichmentRequest {
        EnrichmentRequest {
            github_url: self.github_url.clone(),
            linkedin_url: self.linkedin_url.clone(),
            leetcode_url: self.leetcode_url.clone(),
        }
    }

    pub fn feedback_request(&self, weekly_activity: String) -> FeedbackRequest {
        FeedbackRequest {
            weekly_activity,
            skills: self.skill_names(),
            profile_summary: self.profile_summary.clone().unwrap_or_default(),
        }
    }

    /// Snapshot for roadmap generation. `None` until the profile has been
    /// analyzed and carries name, year and branch.
    pub fn roadmap_request(&self) -> Option<RoadmapRequest> {
        let skills = self.skills.clone().filter(|s| !s.is_empty())?;
        let profile_summary = self
            .profile_summary
            .clone()
            .filter(|s| !s.trim().is_empty())?;
        Some(RoadmapRequest {
            name: self.name.clone()?,
            year: self.year?,
            branch: self.branch.clone()?,
            skills,
            profile_summary,
        })
    }
}

/// Body of `POST /api/v1/profile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub branch: String,
    pub year: u8,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub leetcode_url: Option<String>,
}

impl ProfileDetails {
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(format!("Name must be at least {MIN_NAME_LEN} characters"));
        }
        if self.branch.trim().chars().count() < 2 {
            return Err("Branch is required".to_string());
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(format!("Year must be between {MIN_YEAR} and {MAX_YEAR}"));
        }
        if let Some(email) = self.email.as_deref().map(str::trim) {
            if !email.is_empty() && !email.contains('@') {
                return Err("Invalid email address".to_string());
            }
        }
        check_urls(&self.urls())
    }

    pub fn urls(&self) -> EnrichmentRequest {
        EnrichmentRequest {
            github_url: self.github_url.clone(),
            linkedin_url: self.linkedin_url.clone(),
            leetcode_url: self.leetcode_url.clone(),
        }
    }

    /// Document fields to merge. Blank optional fields are left out so they
    /// never clobber stored values.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from(self.name.trim()));
        fields.insert("branch".into(), Value::from(self.branch.trim()));
        fields.insert("year".into(), Value::from(self.year));
        if let Some(email) = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            fields.insert("email".into(), Value::from(email));
        }
        fields.extend(url_fields(&self.urls()));
        fields
    }
}

/// Rejects present URLs that are not http(s).
pub fn check_urls(urls: &EnrichmentRequest) -> Result<(), String> {
    for url in [urls.github(), urls.linkedin(), urls.leetcode()] {
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("Please enter a valid URL: {url}"));
        }
    }
    Ok(())
}

fn links(urls: &EnrichmentRequest) -> [(&'static str, &str); 3] {
    [
        ("githubUrl", urls.github()),
        ("linkedinUrl", urls.linkedin()),
        ("leetcodeUrl", urls.leetcode()),
    ]
}

/// Present profile links as document fields.
pub fn url_fields(urls: &EnrichmentRequest) -> Map<String, Value> {
    links(urls)
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .map(|(key, url)| (key.to_string(), Value::from(url)))
        .collect()
}

/// Document fields for a finished analysis. Skills are replaced wholesale and
/// all three links are written, blank ones as `""`, so the stored links are
/// exactly the set the skills were derived from.
pub fn analysis_fields(urls: &EnrichmentRequest, profile: &StructuredProfile) -> Map<String, Value> {
    let mut fields: Map<String, Value> = links(urls)
        .into_iter()
        .map(|(key, url)| (key.to_string(), Value::from(url)))
        .collect();
    fields.insert("skills".into(), serde_json::json!(profile.skills));
    fields.insert("profileSummary".into(), Value::from(profile.profile_summary.as_str()));
    fields.insert("overallRating".into(), Value::from(profile.overall_rating));
    fields
}
