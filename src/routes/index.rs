use crate::app_state::AppState;
use crate::handlers::index::hello;
use axum::{routing::get, Router};

pub fn index_route() -> Router<AppState> {
    Router::new().route("/", get(hello))
}
