pub mod schema;

pub use schema::CURRENT_SCHEMA;

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// Opens (creating if missing) the store at `database_url` and brings its
/// schema up to date.
#[instrument]
pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>, AppError> {
    info!("Opening database");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    apply_schema(&pool).await?;

    Ok(pool)
}

/// Same as [`connect`], with the location taken from `DATABASE_URL`
/// (a `.env` file is honoured when present).
pub async fn connect_from_env() -> Result<Pool<Sqlite>, AppError> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Internal("DATABASE_URL is not set".to_string()))?;
    connect(&database_url).await
}

/// Applies [`CURRENT_SCHEMA`]. The DDL is idempotent, so this is safe to run
/// on every startup.
#[instrument(skip(pool))]
pub async fn apply_schema(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    sqlx::raw_sql(schema::CURRENT_SCHEMA).execute(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}
