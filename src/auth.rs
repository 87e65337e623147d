use axum::http::HeaderMap;
use sqlx::{PgPool, Row};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;

pub type SessionMap = Arc<RwLock<HashMap<String, Uuid>>>;

pub struct AuthState {
    pub user_id: Uuid,
    pub username: String,
}

pub async fn create_session(user_id: Uuid, sessions: &SessionMap) -> String {
    let session_id = Uuid::new_v4().to_string();
    sessions.write().await.insert(session_id.clone(), user_id);
    session_id
}

pub async fn remove_session(headers: &HeaderMap, sessions: &SessionMap) {
    if let Some(session_id) = extract_session_id(headers) {
        sessions.write().await.remove(&session_id);
    }
}

/// Resolve the request to a trusted user identity, or fail with 401.
pub async fn verify_session(
    headers: &HeaderMap,
    sessions: &SessionMap,
    db: &PgPool,
) -> Result<AuthState, ApiError> {
    let session_id = extract_session_id(headers).ok_or(ApiError::Unauthorized)?;

    let user_id = {
        let sessions_read = sessions.read().await;
        *sessions_read.get(&session_id).ok_or(ApiError::Unauthorized)?
    };

    let user_row = sqlx::query("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(AuthState {
        user_id,
        username: user_row.get("username"),
    })
}

fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    use axum::http::header;

    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookie_str| {
            cookie_str
                .split(';')
                .find(|cookie| cookie.trim().starts_with("session_id="))
                .map(|cookie| {
                    cookie
                        .trim()
                        .strip_prefix("session_id=")
                        .unwrap_or("")
                        .to_string()
                })
        })
}
