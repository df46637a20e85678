use anyhow::anyhow;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        follows::{Follow, FollowWithFollowee},
        users::UserSummary,
    },
};

const FOLLOW_UNIQUE_CONSTRAINT: &str = "follows_follower_followee_key";

#[derive(sqlx::FromRow)]
struct FollowListingRow {
    id: Uuid,
    followee_id: Uuid,
    followee_name: String,
    followee_photo_url: Option<String>,
}

impl From<FollowListingRow> for FollowWithFollowee {
    fn from(row: FollowListingRow) -> Self {
        Self {
            id: row.id,
            followee: UserSummary {
                id: row.followee_id,
                name: row.followee_name,
                photo_url: row.followee_photo_url,
            },
        }
    }
}

pub async fn list_follows_by_follower(
    conn: &mut PgConnection,
    follower_id: Uuid,
) -> AppResult<Vec<FollowWithFollowee>> {
    let rows = sqlx::query_as::<_, FollowListingRow>(
        r#"
        SELECT f.id,
               u.id AS followee_id, u.name AS followee_name, u.photo_url AS followee_photo_url
        FROM follows f
        JOIN users u ON u.id = f.followee_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at, f.id
        "#,
    )
    .bind(follower_id)
    .fetch_all(conn)
    .await
    .map_err(|e| AppError::InternalServerError(anyhow!("Failed to fetch follows: {}", e)))?;

    Ok(rows.into_iter().map(FollowWithFollowee::from).collect())
}

pub async fn find_follow(
    conn: &mut PgConnection,
    follower_id: Uuid,
    followee_id: Uuid,
) -> AppResult<Option<Follow>> {
    let follow = sqlx::query_as::<_, Follow>(
        "SELECT id, follower_id, followee_id, created_at FROM follows WHERE follower_id = $1 AND followee_id = $2",
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| AppError::InternalServerError(anyhow!("Failed to fetch follow: {}", e)))?;

    Ok(follow)
}

pub async fn insert_follow(
    conn: &mut PgConnection,
    follower_id: Uuid,
    followee_id: Uuid,
) -> AppResult<Follow> {
    let result = sqlx::query_as::<_, Follow>(
        r#"
        INSERT INTO follows (id, follower_id, followee_id)
        VALUES ($1, $2, $3)
        RETURNING id, follower_id, followee_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(follower_id)
    .bind(followee_id)
    .fetch_one(conn)
    .await;

    match result {
        Ok(follow) => Ok(follow),
        Err(e) => {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(FOLLOW_UNIQUE_CONSTRAINT)
                {
                    return Err(AppError::Conflict(anyhow!(
                        "User with id {} is already following user with id {}",
                        follower_id,
                        followee_id
                    )));
                }
                if db_err.is_foreign_key_violation() {
                    return Err(AppError::NotFound(anyhow!(
                        "Follower {} or followee {} does not exist",
                        follower_id,
                        followee_id
                    )));
                }
            }
            Err(AppError::InternalServerError(anyhow!(
                "Failed to create follow: {}",
                e
            )))
        }
    }
}

pub async fn delete_follow(
    conn: &mut PgConnection,
    follower_id: Uuid,
    followee_id: Uuid,
) -> AppResult<Option<Follow>> {
    let follow = sqlx::query_as::<_, Follow>(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followee_id = $2
        RETURNING id, follower_id, followee_id, created_at
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| AppError::InternalServerError(anyhow!("Failed to delete follow: {}", e)))?;

    Ok(follow)
}
