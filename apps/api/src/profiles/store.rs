use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::profiles::models::UserProfile;

/// Reads one profile document.
pub async fn get_profile(pool: &PgPool, uid: &str) -> Result<Option<UserProfile>> {
    let data: Option<Value> = sqlx::query_scalar("SELECT data FROM user_profiles WHERE uid = $1")
        .bind(uid)
        .fetch_optional(pool)
        .await?;

    data.map(|doc| {
        serde_json::from_value(doc).with_context(|| format!("Malformed profile document for {uid}"))
    })
    .transpose()
}

/// Merge-writes `fields` into the user's document, creating it if absent.
/// Existing keys not named in `fields` are kept.
pub async fn merge_profile(pool: &PgPool, uid: &str, mut fields: Map<String, Value>) -> Result<()> {
    fields.insert("uid".into(), Value::from(uid));

    sqlx::query(
        r#"
        INSERT INTO user_profiles (uid, data)
        VALUES ($1, $2)
        ON CONFLICT (uid) DO UPDATE
            SET data = user_profiles.data || EXCLUDED.data,
                updated_at = now()
        "#,
    )
    .bind(uid)
    .bind(Json(Value::Object(fields)))
    .execute(pool)
    .await?;

    info!("Merged profile fields for {uid}");
    Ok(())
}

/// All profile documents. Rows that fail to parse are skipped.
pub async fn list_profiles(pool: &PgPool) -> Result<Vec<UserProfile>> {
    let rows: Vec<(String, Value)> =
        sqlx::query_as("SELECT uid, data FROM user_profiles ORDER BY created_at")
            .fetch_all(pool)
            .await?;

    let profiles = rows
        .into_iter()
        .filter_map(|(uid, doc)| match serde_json::from_value::<UserProfile>(doc) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Skipping malformed profile document for {uid}: {e}");
                None
            }
        })
        .collect();
    Ok(profiles)
}
