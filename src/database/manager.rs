use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Store errors, each tagged with the operation that produced them.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("{operation}: unique constraint {constraint:?} violated")]
    UniqueViolation {
        operation: &'static str,
        constraint: Option<String>,
    },

    #[error("{operation}: foreign key {constraint:?} violated")]
    ForeignKeyViolation {
        operation: &'static str,
        constraint: Option<String>,
    },

    #[error("{operation}: database unavailable: {source}")]
    Unavailable {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("{operation}: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DatabaseError {
    pub fn classify(operation: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().map(str::to_string);
            if db_err.is_unique_violation() {
                return DatabaseError::UniqueViolation { operation, constraint };
            }
            if db_err.is_foreign_key_violation() {
                return DatabaseError::ForeignKeyViolation { operation, constraint };
            }
        }

        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound(operation),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::Unavailable { operation, source: err }
            }
            other => DatabaseError::Query { operation, source: other },
        }
    }
}

/// Attaches operation context to raw sqlx results.
pub trait DbResultExt<T> {
    fn during(self, operation: &'static str) -> Result<T, DatabaseError>;
}

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn during(self, operation: &'static str) -> Result<T, DatabaseError> {
        self.map_err(|e| DatabaseError::classify(operation, e))
    }
}

/// Builds the shared pool. Connections are opened lazily so the process can
/// start (and report itself unhealthy) while the database is down.
pub fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_lazy(&config.url)
        .during("pool.connect")?;

    info!(max_connections = config.max_connections, "database pool configured");
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await.during("health.ping")?;
    Ok(())
}
