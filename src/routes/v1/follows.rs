use crate::handlers::v1::follows;
use crate::{app_state::AppState, middlewares::auth::auth_middleware};
use axum::routing::post;
use axum::{middleware, Router};

pub fn follows_routes() -> Router<AppState> {
    // Protected routes that require authentication
    Router::new()
        .route(
            "/{user_id}",
            post(follows::create_follow)
                .delete(follows::delete_follow)
                .put(follows::update_follow),
        )
        .layer(middleware::from_fn(auth_middleware))
}
