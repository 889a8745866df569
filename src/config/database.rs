//! Database connection pool initialization.
//!
//! Thin wrapper over [`propdesk_db::init_db_pool`]; the connection string
//! comes from the `DATABASE_URL` environment variable.

pub use propdesk_db::init_db_pool;
