use crate::types::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to connect: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

pub async fn connect(cfg: &DatabaseConfig) -> Result<PgPool, Error> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&cfg.url)
        .await
        .map_err(|err| {
            tracing::error!("Error connecting to database: {}", err);
            Error::Connect(err)
        })?;

    tracing::info!("Connected to database");
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> Result<(), Error> {
    sqlx::migrate!().run(pool).await.map_err(|err| {
        tracing::error!("Failed to run database migrations: {}", err);
        Error::Migrate(err)
    })?;

    tracing::info!("Database migrations applied");
    Ok(())
}

/// Whether `err` is a unique violation raised by the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
