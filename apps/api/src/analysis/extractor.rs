//! Skill extractor: turns gathered profile material into schema-checked
//! skill data via the language model.

use std::sync::Arc;

use tracing::{debug, info};

use crate::analysis::error::AnalysisError;
use crate::analysis::models::{Skill, SkillSuggestions, StructuredProfile, ValidatedSkills};
use crate::analysis::prompts::{
    evaluator_system, render_social_skills, render_structured_profile, render_suggest_skills,
    render_validate_skills, ProfileTexts,
};
use crate::llm_client::tools::CapabilitySet;
use crate::llm_client::{call_json, call_json_with_tools, LanguageModel};

#[derive(Clone)]
pub struct SkillExtractor {
    llm: Arc<dyn LanguageModel>,
    max_tool_rounds: u32,
}

impl SkillExtractor {
    pub fn new(llm: Arc<dyn LanguageModel>, max_tool_rounds: u32) -> Self {
        Self {
            llm,
            max_tool_rounds,
        }
    }

    /// Skill names demonstrated by a list of `"name: description"` repository
    /// summaries. No summaries → no model call, no skills.
    pub async fn extract_skills_from_repositories(
        &self,
        repo_summaries: &[String],
    ) -> Result<Vec<String>, AnalysisError> {
        if repo_summaries.is_empty() {
            info!("No repository descriptions found; returning empty skills list");
            return Ok(Vec::new());
        }

        info!(
            "Extracting skills from {} repository summaries",
            repo_summaries.len()
        );
        let prompt = render_suggest_skills(repo_summaries);
        let suggestions: SkillSuggestions =
            call_json(self.llm.as_ref(), &prompt, &evaluator_system()).await?;

        Ok(clean_names(suggestions.skills))
    }

    /// Skill names suggested from scraped LinkedIn / LeetCode text.
    pub async fn extract_skills_from_social_text(
        &self,
        linkedin_content: &str,
        leetcode_content: &str,
    ) -> Result<Vec<String>, AnalysisError> {
        let prompt = render_social_skills(linkedin_content, leetcode_content);
        let suggestions: SkillSuggestions =
            call_json(self.llm.as_ref(), &prompt, &evaluator_system()).await?;

        Ok(clean_names(suggestions.skills))
    }

    /// Rates each named skill against the supplied proof. Skills the model
    /// could not assess are simply absent from the result.
    pub async fn validate_skills(
        &self,
        skill_names: &[String],
        proof_text: &str,
    ) -> Result<Vec<Skill>, AnalysisError> {
        let prompt = render_validate_skills(skill_names, proof_text);
        let validated: ValidatedSkills =
            call_json(self.llm.as_ref(), &prompt, &evaluator_system()).await?;

        for skill in &validated.validated_skills {
            skill.check().map_err(AnalysisError::SchemaViolation)?;
        }

        debug!(
            "Validated {}/{} skills",
            validated.validated_skills.len(),
            skill_names.len()
        );
        Ok(validated.validated_skills)
    }

    /// Builds a full structured profile. The model may call any of the
    /// supplied capabilities while gathering evidence.
    pub async fn extract_structured_profile(
        &self,
        profile_texts: &ProfileTexts,
        capabilities: &CapabilitySet,
    ) -> Result<StructuredProfile, AnalysisError> {
        let prompt = render_structured_profile(profile_texts);
        let profile: StructuredProfile = call_json_with_tools(
            self.llm.as_ref(),
            &prompt,
            &evaluator_system(),
            capabilities,
            self.max_tool_rounds,
        )
        .await?;

        profile.check().map_err(AnalysisError::SchemaViolation)?;

        info!(
            "Structured profile built: {} skills, overall rating {}",
            profile.skills.len(),
            profile.overall_rating
        );
        Ok(profile)
    }
}

/// Trims names and drops blanks and case-insensitive duplicates, keeping the
/// model's order.
fn clean_names(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(n.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{text_response, ScriptedModel};
    use crate::llm_client::LlmError;

    fn extractor(model: &Arc<ScriptedModel>) -> SkillExtractor {
        SkillExtractor::new(model.clone(), 4)
    }

    #[tokio::test]
    async fn empty_repositories_skip_the_model() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let skills = extractor(&model)
            .extract_skills_from_repositories(&[])
            .await
            .unwrap();
        assert!(skills.is_empty());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn repository_skills_are_cleaned() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(
            r#"{"skills": ["Go", " go ", "Docker", ""]}"#,
        )]));
        let skills = extractor(&model)
            .extract_skills_from_repositories(&["foo: A CLI tool in Go".to_string()])
            .await
            .unwrap();
        assert_eq!(skills, vec!["Go".to_string(), "Docker".to_string()]);
        assert_eq!(model.calls(), 1);

        let prompt = &model.requests()[0].messages[0];
        assert!(format!("{prompt:?}").contains("foo: A CLI tool in Go"));
    }

    #[tokio::test]
    async fn missing_skills_field_is_a_schema_violation() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(r#"{"tags": ["Go"]}"#)]));
        let err = extractor(&model)
            .extract_skills_from_repositories(&["foo".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn validate_skills_keeps_only_returned_skills() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(
            r#"{"validatedSkills": [{"name": "Rust", "rating": 4, "evidence": "Maintains a parser crate"}]}"#,
        )]));
        let skills = extractor(&model)
            .validate_skills(
                &["Rust".to_string(), "Haskell".to_string()],
                "https://github.com/octocat",
            )
            .await
            .unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "Rust");
        assert!((1..=5).contains(&skills[0].rating));
        assert!(!skills[0].evidence.is_empty());
    }

    #[tokio::test]
    async fn validate_skills_rejects_out_of_range_rating() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(
            r#"{"validatedSkills": [{"name": "Rust", "rating": 7, "evidence": "Lots"}]}"#,
        )]));
        let err = extractor(&model)
            .validate_skills(&["Rust".to_string()], "proof")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn validate_skills_rejects_empty_evidence() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(
            r#"{"validatedSkills": [{"name": "Rust", "rating": 3, "evidence": ""}]}"#,
        )]));
        let err = extractor(&model)
            .validate_skills(&["Rust".to_string()], "proof")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn structured_profile_rejects_bad_overall_rating() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(
            r#"{"skills": [], "profileSummary": "Promising.", "overallRating": 0}"#,
        )]));
        let err = extractor(&model)
            .extract_structured_profile(&ProfileTexts::default(), &CapabilitySet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn structured_profile_rejects_invalid_skills() {
        let bad_skills = [
            r#"{"name": "Go", "rating": 9, "evidence": "x"}"#,
            r#"{"name": "Go", "rating": 0, "evidence": "x"}"#,
            r#"{"name": "Go", "rating": 3, "evidence": "  "}"#,
        ];
        for skill in bad_skills {
            let model = Arc::new(ScriptedModel::new(vec![text_response(&format!(
                r#"{{"skills": [{skill}], "profileSummary": "Promising.", "overallRating": 3}}"#
            ))]));
            let err = extractor(&model)
                .extract_structured_profile(&ProfileTexts::default(), &CapabilitySet::new())
                .await
                .unwrap_err();
            assert!(matches!(err, AnalysisError::SchemaViolation(_)), "{skill}");
        }
    }

    #[tokio::test]
    async fn unreachable_model_is_upstream_unavailable() {
        let model = Arc::new(ScriptedModel::with_results(vec![Err(LlmError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })]));
        let err = extractor(&model)
            .extract_skills_from_social_text("Rust", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UpstreamUnavailable(_)));
    }
}
