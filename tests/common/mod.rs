//! Common test utilities for E2E tests

use axum::{extract::Path, http::StatusCode, routing::post, Router};
use follow_backend::{
    models::{
        sessions::{UserSession, USER_SESSION_KEY},
        users::UserSummary,
    },
    routes::create_routes,
    store::InMemoryStore,
    AppState,
};
use tokio::net::TcpListener;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub store: InMemoryStore,
}

/// Stands in for the external auth service: signs the caller in as `user_id`.
async fn login(session: Session, Path(user_id): Path<Uuid>) -> StatusCode {
    match session
        .insert(USER_SESSION_KEY, UserSession { user_id })
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl TestServer {
    /// Create a new test server instance backed by an in-memory store
    pub async fn new() -> Self {
        let store = InMemoryStore::new();
        let state = AppState::new(store.clone());

        let app = Router::new()
            .route("/test/login/{user_id}", post(login))
            .merge(create_routes())
            .with_state(state)
            .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: format!("http://{}", addr),
            store,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Create a user the service can resolve
    pub fn create_user(&self, name: &str, photo_url: Option<&str>) -> UserSummary {
        let user = UserSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            photo_url: photo_url.map(str::to_string),
        };
        self.store.insert_user(user.clone());
        user
    }

    /// HTTP client without a session
    pub fn anonymous_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap()
    }

    /// HTTP client holding a session for `user_id`
    pub async fn client_for(&self, user_id: Uuid) -> reqwest::Client {
        let client = self.anonymous_client();
        let response = client
            .post(self.url(&format!("/test/login/{}", user_id)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 204);
        client
    }
}
