use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MIN_ROADMAP_STEPS: usize = 3;
pub const MAX_ROADMAP_STEPS: usize = 5;

/// Summary used when there was nothing to analyze.
pub const EMPTY_PROFILE_SUMMARY: &str = "No external profiles were provided yet, so no skills \
    could be analyzed. Link a GitHub, LinkedIn or LeetCode profile and re-analyze to build \
    your skill portfolio.";

/// A single rated skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// 1 (beginner) – 5 (expert)
    pub rating: u8,
    pub evidence: String,
}

impl Skill {
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("skill name is empty".to_string());
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "skill '{}' has rating {} outside {MIN_RATING}-{MAX_RATING}",
                self.name, self.rating
            ));
        }
        if self.evidence.trim().is_empty() {
            return Err(format!("skill '{}' has no evidence", self.name));
        }
        Ok(())
    }
}

/// The consolidated result of analyzing a user's external profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredProfile {
    pub skills: Vec<Skill>,
    pub profile_summary: String,
    pub overall_rating: f64,
}

impl StructuredProfile {
    pub fn empty() -> Self {
        Self {
            skills: Vec::new(),
            profile_summary: EMPTY_PROFILE_SUMMARY.to_string(),
            overall_rating: f64::from(MIN_RATING),
        }
    }

    pub fn check(&self) -> Result<(), String> {
        for skill in &self.skills {
            skill.check()?;
        }
        if !(f64::from(MIN_RATING)..=f64::from(MAX_RATING)).contains(&self.overall_rating) {
            return Err(format!(
                "overallRating {} outside {MIN_RATING}-{MAX_RATING}",
                self.overall_rating
            ));
        }
        if self.profile_summary.trim().is_empty() {
            return Err("profileSummary is empty".to_string());
        }
        Ok(())
    }
}

/// External profile links to analyze. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leetcode_url: Option<String>,
}

impl EnrichmentRequest {
    pub fn github(&self) -> &str {
        present(&self.github_url)
    }

    pub fn linkedin(&self) -> &str {
        present(&self.linkedin_url)
    }

    pub fn leetcode(&self) -> &str {
        present(&self.leetcode_url)
    }

    pub fn is_empty(&self) -> bool {
        self.github().is_empty() && self.linkedin().is_empty() && self.leetcode().is_empty()
    }
}

fn present(url: &Option<String>) -> &str {
    url.as_deref().map(str::trim).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub title: String,
    pub description: String,
    pub resources: String,
}

/// Ordered improvement plan, easiest step first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(rename = "roadmap")]
    pub steps: Vec<RoadmapStep>,
}

impl Roadmap {
    pub fn check(&self) -> Result<(), String> {
        let n = self.steps.len();
        if !(MIN_ROADMAP_STEPS..=MAX_ROADMAP_STEPS).contains(&n) {
            return Err(format!(
                "roadmap has {n} steps, expected {MIN_ROADMAP_STEPS}-{MAX_ROADMAP_STEPS}"
            ));
        }
        if let Some(step) = self.steps.iter().find(|s| s.title.trim().is_empty()) {
            return Err(format!("roadmap step without title: {step:?}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorFeedback {
    pub feedback: String,
}

/// Skill names suggested from GitHub or social profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSuggestions {
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidatedSkills {
    pub validated_skills: Vec<Skill>,
}

/// Inputs for mentor feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub weekly_activity: String,
    pub skills: Vec<String>,
    pub profile_summary: String,
}

/// Profile snapshot a roadmap is tailored to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapRequest {
    pub name: String,
    pub year: u8,
    pub branch: String,
    pub skills: Vec<Skill>,
    pub profile_summary: String,
}
