use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{error::AppError, models::users::UserSummary};

/*
id UUID PRIMARY KEY,
follower_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
followee_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
UNIQUE (follower_id, followee_id)
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: Uuid,
    #[sqlx(rename = "follower_id")]
    pub follower: Uuid,
    #[sqlx(rename = "followee_id")]
    pub followee: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(follower: Uuid, followee: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            follower,
            followee,
            created_at: Utc::now(),
        }
    }
}

/// A follow edge as listed for its follower, with the followee projected in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowWithFollowee {
    pub id: Uuid,
    pub followee: UserSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAction {
    Follow,
    Unfollow,
}

impl FromStr for FollowAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "follow" => Ok(Self::Follow),
            "unfollow" => Ok(Self::Unfollow),
            other => Err(AppError::BadRequest(anyhow!(
                "Unknown follow action `{}`, expected `follow` or `unfollow`",
                other
            ))),
        }
    }
}

/// What an upsert did to the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(Follow),
    Existing(Follow),
    Removed(Option<Follow>),
}
