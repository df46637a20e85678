//! Persistence seam for follow edges.
//!
//! The relationship service only talks to [`FollowStore`]. Implementations
//! must make every method individually atomic and must reject a second edge
//! for the same `(follower, followee)` pair with [`AppError::Conflict`]
//! themselves, since the service's existence check can race.
//!
//! [`AppError::Conflict`]: crate::error::AppError::Conflict

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        follows::{Follow, FollowWithFollowee},
        users::UserSummary,
    },
};

#[async_trait]
pub trait FollowStore: Send + Sync {
    async fn find_user_summary(&self, user_id: Uuid) -> AppResult<Option<UserSummary>>;

    async fn list_follows(&self, follower_id: Uuid) -> AppResult<Vec<FollowWithFollowee>>;

    async fn find_follow(&self, follower_id: Uuid, followee_id: Uuid)
        -> AppResult<Option<Follow>>;

    async fn insert_follow(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<Follow>;

    /// Removes the edge and returns it, or `None` if there was nothing to remove.
    async fn delete_follow(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> AppResult<Option<Follow>>;
}
