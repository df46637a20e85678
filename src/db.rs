use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;

pub async fn connect_to_db(config: &Config) -> Result<PgPool> {
    let db_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(db_url)
        .await
        .context("Failed to connect to database")?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(())
}
