use serde::{Deserialize, Serialize};
use uuid::Uuid;

/*
id UUID PRIMARY KEY,
name TEXT NOT NULL,
photo_url TEXT,
 */
/// The slice of a user record exposed next to follow edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
}
