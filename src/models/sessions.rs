use serde::{Deserialize, Serialize};

/// Session key the auth layer stores the signed-in user under.
pub const USER_SESSION_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: uuid::Uuid,
}
