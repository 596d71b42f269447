pub mod core;

pub use self::core::{
    bootstrap_app_db, build_admin_pool, connect_pool, orchestrate_migration,
    orchestrate_migration_internal,
};
