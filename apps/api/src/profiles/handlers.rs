use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info};

use crate::analysis::error::ANALYSIS_FAILED;
use crate::analysis::models::EnrichmentRequest;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::profiles::discover::{discover, DiscoverQuery, DiscoverResponse};
use crate::profiles::models::{analysis_fields, check_urls, ProfileDetails, UserProfile};
use crate::profiles::store::{get_profile, list_profiles, merge_profile};
use crate::state::AppState;

/// POST /api/v1/profile
///
/// Creates or updates the caller's profile details. A newly created profile
/// with any profile link gets analyzed in the background; the response does
/// not wait for it.
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
    Json(details): Json<ProfileDetails>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    details.check().map_err(AppError::Validation)?;

    let existing = get_profile(&state.db, &uid).await?;
    let created = existing.is_none();

    let mut fields = details.fields();
    if created {
        fields.insert("createdAt".into(), Value::from(Utc::now().to_rfc3339()));
    }
    merge_profile(&state.db, &uid, fields).await?;

    let urls = details.urls();
    if created && !urls.is_empty() {
        spawn_enrichment(state.clone(), uid.clone(), urls);
    }

    let profile = get_profile(&state.db, &uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {uid} not found")))?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(profile)))
}

/// Runs enrichment detached from the request. Failures are logged; the
/// user can re-run it from the profile page.
fn spawn_enrichment(state: AppState, uid: String, urls: EnrichmentRequest) {
    tokio::spawn(async move {
        info!("Background enrichment started for {uid}");
        match state.enricher.enrich(&urls).await {
            Ok(profile) => {
                if let Err(e) = merge_profile(&state.db, &uid, analysis_fields(&urls, &profile)).await
                {
                    error!("Failed to store enrichment for {uid}: {e:?}");
                }
            }
            Err(e) => error!("Background enrichment failed for {uid}: {e}"),
        }
    });
}

/// GET /api/v1/profile
pub async fn handle_get_own_profile(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile = get_profile(&state.db, &uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

/// POST /api/v1/profile/analyze
///
/// Re-analyzes the caller's profile from the links in the body, falling back
/// to the stored links. Result and links are merged into the document.
pub async fn handle_analyze_profile(
    State(state): State<AppState>,
    AuthUser(uid): AuthUser,
    headers: HeaderMap,
    body: Result<Json<EnrichmentRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, AppError> {
    let mut urls = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) if is_bodyless(&headers) => {
            EnrichmentRequest::default()
        }
        Err(rejection) => return Err(AppError::Validation(rejection.body_text())),
    };
    if urls.is_empty() {
        if let Some(stored) = get_profile(&state.db, &uid).await? {
            urls = stored.enrichment_request();
        }
    }
    if urls.is_empty() {
        return Err(AppError::Validation(
            "Please provide at least one profile URL.".to_string(),
        ));
    }
    check_urls(&urls).map_err(AppError::Validation)?;

    let profile = state
        .enricher
        .enrich(&urls)
        .await
        .map_err(|e| AppError::analysis(ANALYSIS_FAILED, e))?;

    merge_profile(&state.db, &uid, analysis_fields(&urls, &profile)).await?;

    let stored = get_profile(&state.db, &uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(stored))
}

/// True when the request carries no body at all.
fn is_bodyless(headers: &HeaderMap) -> bool {
    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    !headers.contains_key(header::TRANSFER_ENCODING) && content_length.unwrap_or(0) == 0
}

/// GET /api/v1/profiles
pub async fn handle_discover(
    State(state): State<AppState>,
    _caller: AuthUser,
    query: Result<Query<DiscoverQuery>, QueryRejection>,
) -> Result<Json<DiscoverResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let profiles = list_profiles(&state.db).await?;
    Ok(Json(discover(profiles, &query)))
}

/// GET /api/v1/profiles/:uid
pub async fn handle_get_profile(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = get_profile(&state.db, &uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {uid} not found")))?;
    Ok(Json(profile.public()))
}
