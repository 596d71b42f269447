//! Database configuration, connection and migration orchestration shared by
//! the backend and the migration CLI.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db;
pub use error::DbInfraError;
pub use infra::db::core::{
    bootstrap_app_db, build_admin_pool, connect_pool, orchestrate_migration,
    orchestrate_migration_internal, sanitize_db_url,
};
