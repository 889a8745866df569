//! # Propdesk DB
//!
//! Database pool initialization for the Propdesk API.
//!
//! The database URL is read from the `DATABASE_URL` environment variable.
//! The returned pool is cheaply cloneable and is passed down through the
//! application state for all database operations.

use std::env;

/// Initializes a PostgreSQL connection pool.
///
/// # Panics
///
/// Panics if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Run pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &sqlx::PgPool) {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .expect("Failed to run database migrations");
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
