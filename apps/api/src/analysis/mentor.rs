//! Mentor advisor: weekly feedback and improvement roadmaps.
//! Stateless: all tailoring lives in the prompt text.

use std::sync::Arc;

use tracing::info;

use crate::analysis::error::AnalysisError;
use crate::analysis::models::{MentorFeedback, Roadmap, RoadmapRequest};
use crate::analysis::prompts::{mentor_system, render_feedback, render_roadmap};
use crate::llm_client::{call_json, LanguageModel};

#[derive(Clone)]
pub struct MentorAdvisor {
    llm: Arc<dyn LanguageModel>,
}

impl MentorAdvisor {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub async fn get_feedback(
        &self,
        weekly_activity: &str,
        skills: &[String],
        profile_summary: &str,
    ) -> Result<MentorFeedback, AnalysisError> {
        let prompt = render_feedback(weekly_activity, skills, profile_summary);
        let feedback: MentorFeedback =
            call_json(self.llm.as_ref(), &prompt, &mentor_system()).await?;

        if feedback.feedback.trim().is_empty() {
            return Err(AnalysisError::SchemaViolation(
                "mentor feedback is empty".to_string(),
            ));
        }
        Ok(feedback)
    }

    pub async fn get_roadmap(&self, snapshot: &RoadmapRequest) -> Result<Roadmap, AnalysisError> {
        info!(
            "Generating roadmap for year {} {} student with {} skills",
            snapshot.year,
            snapshot.branch,
            snapshot.skills.len()
        );
        let prompt = render_roadmap(snapshot);
        let roadmap: Roadmap = call_json(self.llm.as_ref(), &prompt, &mentor_system()).await?;

        roadmap.check().map_err(AnalysisError::SchemaViolation)?;
        Ok(roadmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Skill;
    use crate::llm_client::testing::{text_response, ScriptedModel};
    use serde_json::json;

    fn snapshot() -> RoadmapRequest {
        RoadmapRequest {
            name: "Ravi".to_string(),
            year: 1,
            branch: "ECE".to_string(),
            skills: vec![Skill {
                name: "C".to_string(),
                rating: 2,
                evidence: "Lab assignments".to_string(),
            }],
            profile_summary: "First-year student starting out in embedded systems.".to_string(),
        }
    }

    fn roadmap_json(steps: usize) -> String {
        let steps: Vec<_> = (1..=steps)
            .map(|i| {
                json!({
                    "title": format!("Step {i}"),
                    "description": "Do the thing",
                    "resources": "A course"
                })
            })
            .collect();
        json!({ "roadmap": steps }).to_string()
    }

    async fn roadmap_with(steps: usize) -> Result<Roadmap, AnalysisError> {
        let model = Arc::new(ScriptedModel::new(vec![text_response(&roadmap_json(steps))]));
        MentorAdvisor::new(model).get_roadmap(&snapshot()).await
    }

    #[tokio::test]
    async fn roadmap_accepts_three_to_five_steps() {
        for n in 3..=5 {
            let roadmap = roadmap_with(n).await.unwrap();
            assert_eq!(roadmap.steps.len(), n);
            assert_eq!(roadmap.steps[0].title, "Step 1");
        }
    }

    #[tokio::test]
    async fn roadmap_with_two_or_six_steps_is_a_schema_violation() {
        for n in [2, 6] {
            let err = roadmap_with(n).await.unwrap_err();
            assert!(matches!(err, AnalysisError::SchemaViolation(_)), "{n} steps");
        }
    }

    #[tokio::test]
    async fn feedback_is_returned_as_is() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(
            r#"{"feedback": "Nice consistency. Next, write tests for your parser."}"#,
        )]));
        let advisor = MentorAdvisor::new(model.clone());
        let feedback = advisor
            .get_feedback(
                "Built a tokenizer and solved 5 DP problems",
                &["Rust".to_string(), "Algorithms".to_string()],
                "Systems-curious student.",
            )
            .await
            .unwrap();
        assert!(feedback.feedback.starts_with("Nice consistency"));

        let prompt = format!("{:?}", model.requests()[0].messages[0]);
        assert!(prompt.contains("Skills: Rust, Algorithms"));
        assert!(prompt.contains("Built a tokenizer"));
    }

    #[tokio::test]
    async fn blank_feedback_is_a_schema_violation() {
        let model = Arc::new(ScriptedModel::new(vec![text_response(r#"{"feedback": " "}"#)]));
        let err = MentorAdvisor::new(model)
            .get_feedback("nothing", &[], "")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaViolation(_)));
    }
}
