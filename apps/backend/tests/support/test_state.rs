use std::env;
use std::str::FromStr;

use actix_web::web;
use db_infra::db::{DbKind, RuntimeEnv};
use food_backend::infra::state::build_state;
use food_backend::state::app_state::AppState;
use food_backend::{AppConfig, AppError};

/// `FOOD_TEST_DB_KIND` selects the backend; defaults to in-memory SQLite so
/// every test gets a fresh, migrated database.
pub fn resolve_test_db_kind() -> Result<DbKind, AppError> {
    match env::var("FOOD_TEST_DB_KIND") {
        Ok(raw) => Ok(DbKind::from_str(&raw)?),
        Err(_) => Ok(DbKind::SqliteMemory),
    }
}

pub async fn build_test_state() -> Result<web::Data<AppState>, AppError> {
    build_test_state_with(AppConfig::default()).await
}

pub async fn build_test_state_with(config: AppConfig) -> Result<web::Data<AppState>, AppError> {
    let state = build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(resolve_test_db_kind()?)
        .with_config(config)
        .build()
        .await?;
    Ok(web::Data::new(state))
}
