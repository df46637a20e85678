use crate::app_state::AppState;
use crate::handlers::v1::follows;
use axum::{routing::get, Router};

pub fn users_routes() -> Router<AppState> {
    // Public routes
    Router::new().route("/{user_id}/follows", get(follows::get_follows)) // /api/v1/users/{user_id}/follows
}
