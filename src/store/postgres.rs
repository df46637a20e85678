use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{pool::PoolConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        follows::{Follow, FollowWithFollowee},
        users::UserSummary,
    },
    queries::{follows, users},
};

use super::FollowStore;

#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        self.db_pool.acquire().await.map_err(|e| {
            AppError::ServiceUnavailable(anyhow!(
                "Failed to acquire database connection: {}",
                e
            ))
        })
    }
}

#[async_trait]
impl FollowStore for PgStore {
    async fn find_user_summary(&self, user_id: Uuid) -> AppResult<Option<UserSummary>> {
        let mut conn = self.acquire().await?;
        users::find_user_summary_by_id(&mut *conn, user_id).await
    }

    async fn list_follows(&self, follower_id: Uuid) -> AppResult<Vec<FollowWithFollowee>> {
        let mut conn = self.acquire().await?;
        follows::list_follows_by_follower(&mut *conn, follower_id).await
    }

    async fn find_follow(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> AppResult<Option<Follow>> {
        let mut conn = self.acquire().await?;
        follows::find_follow(&mut *conn, follower_id, followee_id).await
    }

    async fn insert_follow(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<Follow> {
        let mut conn = self.acquire().await?;
        follows::insert_follow(&mut *conn, follower_id, followee_id).await
    }

    async fn delete_follow(
        &self,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> AppResult<Option<Follow>> {
        let mut conn = self.acquire().await?;
        follows::delete_follow(&mut *conn, follower_id, followee_id).await
    }
}
