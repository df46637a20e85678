use anyhow::anyhow;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    middlewares::auth::current_user_id,
    models::{
        follows::{FollowAction, UpsertOutcome},
        responses::ApiResponse,
    },
    services::follows,
};

fn parse_user_id(user_id: &str) -> AppResult<Uuid> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest(anyhow!("User ID is required")));
    }
    Uuid::parse_str(user_id).map_err(|_| AppError::BadRequest(anyhow!("Invalid user ID format")))
}

// GET /api/v1/users/{user_id}/follows (public)
pub async fn get_follows(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&user_id)?;
    let follows = follows::list_follows(state.store.as_ref(), user_id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(follows))))
}

// POST /api/v1/follows/{user_id}
pub async fn create_follow(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let follower_id = current_user_id(&session).await?;
    let followee_id = parse_user_id(&user_id)?;

    let followee = follows::create_follow(state.store.as_ref(), follower_id, followee_id).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(followee))))
}

// DELETE /api/v1/follows/{user_id}
pub async fn delete_follow(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let follower_id = current_user_id(&session).await?;
    let followee_id = parse_user_id(&user_id)?;

    let followee = follows::delete_follow(state.store.as_ref(), follower_id, followee_id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(followee))))
}

#[derive(Deserialize)]
pub struct UpdateFollowQuery {
    pub action: Option<String>,
}

// PUT /api/v1/follows/{user_id}?action=follow|unfollow
pub async fn update_follow(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<String>,
    query: Result<Query<UpdateFollowQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let follower_id = current_user_id(&session).await?;
    let followee_id = parse_user_id(&user_id)?;
    let Query(query) = query.map_err(|e| {
        AppError::BadRequest(anyhow!("Invalid query string: {}", e.body_text()))
    })?;

    // A missing action means follow
    let action = match query.action.as_deref() {
        Some(action) => action.parse::<FollowAction>()?,
        None => FollowAction::Follow,
    };

    let outcome =
        follows::upsert_follow(state.store.as_ref(), follower_id, followee_id, action).await?;

    let response = match outcome {
        UpsertOutcome::Created(follow) => {
            (StatusCode::CREATED, Json(ApiResponse::ok(Some(follow))))
        }
        UpsertOutcome::Existing(follow) => (StatusCode::OK, Json(ApiResponse::ok(Some(follow)))),
        UpsertOutcome::Removed(removed) => (StatusCode::OK, Json(ApiResponse::ok(removed))),
    };

    Ok(response)
}
