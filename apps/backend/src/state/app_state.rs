use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::AppConfig;

/// Shared resources handed to every request via `web::Data`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (absent in some unit-test scenarios)
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig, config: AppConfig) -> Self {
        Self {
            db: Some(db),
            security,
            config,
        }
    }

    pub fn without_db(security: SecurityConfig, config: AppConfig) -> Self {
        Self {
            db: None,
            security,
            config,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
