use anyhow::anyhow;
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::sessions::{UserSession, USER_SESSION_KEY},
};

pub async fn auth_middleware(session: Session, req: Request, next: Next) -> AppResult<Response> {
    // Check if the session has a user session
    current_user_id(&session).await?;
    Ok(next.run(req).await)
}

/// The signed-in user's id, or `Unauthorized`.
pub async fn current_user_id(session: &Session) -> AppResult<Uuid> {
    let user_session = session
        .get::<UserSession>(USER_SESSION_KEY)
        .await
        .map_err(|e| AppError::InternalServerError(anyhow!("Failed to read session: {}", e)))?;

    match user_session {
        Some(user_data) => Ok(user_data.user_id),
        None => Err(AppError::Unauthorized(anyhow!("User session not found"))),
    }
}
