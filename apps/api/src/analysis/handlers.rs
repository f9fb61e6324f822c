use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::error::{ANALYSIS_FAILED, GITHUB_ANALYSIS_FAILED, MENTOR_FAILED};
use crate::analysis::models::{MentorFeedback, Roadmap, Skill, SkillSuggestions};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::profiles::models::MIN_WEEKLY_ACTIVITY_LEN;
use crate::profiles::store::get_profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestSkillsBody {
    pub github_username: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSkillsBody {
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub leetcode_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateSkillsBody {
    pub skills: Vec<String>,
    pub proof: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSkillsResponse {
    pub validated_skills: Vec<Skill>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackBody {
    pub weekly_activity: String,
}

/// POST /api/v1/skills/suggest
pub async fn handle_suggest_skills(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(body): Json<SuggestSkillsBody>,
) -> Result<Json<SkillSuggestions>, AppError> {
    let suggestions = state
        .enricher
        .suggest_skills(&body.github_username)
        .await
        .map_err(|e| AppError::analysis(GITHUB_ANALYSIS_FAILED, e))?;
    Ok(Json(suggestions))
}

/// POST /api/v1/skills/social
pub async fn handle_social_skills(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(body): Json<SocialSkillsBody>,
) -> Result<Json<SkillSuggestions>, AppError> {
    let suggestions = state
        .enricher
        .suggest_social_skills(&body.linkedin_url, &body.leetcode_url)
        .await
        .map_err(|e| AppError::analysis(ANALYSIS_FAILED, e))?;
    Ok(Json(suggestions))
}

/// POST /api/v1/skills/validate
pub async fn handle_validate_skills(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(body): Json<ValidateSkillsBody>,
) -> Result<Json<ValidateSkillsResponse>, AppError> {
    if body.skills.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::Validation("Please list at least one skill.".to_string()));
    }
    if body.proof.trim().is_empty() {
        return Err(AppError::Validation(
            "Please describe your proof of experience.".to_string(),
        ));
    }

    let validated_skills = state
        .extractor
        .validate_skills(&body.skills, &body.proof)
        .await
        .map_err(|e| AppError::analysis(ANALYSIS_FAILED, e))?;
    Ok(Json(ValidateSkillsResponse { validated_skills }))
}

/// POST /api/v1/mentor/feedback
pub async fn handle_mentor_feedback(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
    Json(body): Json<FeedbackBody>,
) -> Result<Json<MentorFeedback>, AppError> {
    if body.weekly_activity.trim().chars().count() < MIN_WEEKLY_ACTIVITY_LEN {
        return Err(AppError::Validation(format!(
            "Please describe your activities in at least {MIN_WEEKLY_ACTIVITY_LEN} characters."
        )));
    }

    let profile = get_profile(&state.db, &uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let request = profile.feedback_request(body.weekly_activity);

    let feedback = state
        .mentor
        .get_feedback(&request.weekly_activity, &request.skills, &request.profile_summary)
        .await
        .map_err(|e| AppError::analysis(MENTOR_FAILED, e))?;
    Ok(Json(feedback))
}

/// POST /api/v1/mentor/roadmap
pub async fn handle_mentor_roadmap(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
) -> Result<Json<Roadmap>, AppError> {
    let profile = get_profile(&state.db, &uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let snapshot = profile.roadmap_request().ok_or_else(|| {
        AppError::Validation(
            "Your profile must be analyzed before a roadmap can be generated.".to_string(),
        )
    })?;

    let roadmap = state
        .mentor
        .get_roadmap(&snapshot)
        .await
        .map_err(|e| AppError::analysis(MENTOR_FAILED, e))?;
    Ok(Json(roadmap))
}
