use anyhow::anyhow;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::users::UserSummary,
};

pub async fn find_user_summary_by_id(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> AppResult<Option<UserSummary>> {
    let user = sqlx::query_as::<_, UserSummary>("SELECT id, name, photo_url FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| AppError::InternalServerError(anyhow!("Failed to fetch user: {}", e)))?;

    Ok(user)
}
