use db_infra::db::{DbKind, RuntimeEnv};
use db_infra::bootstrap_app_db;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for `AppState`, shared by `main`, the admin binary and tests.
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    security: SecurityConfig,
    config: AppConfig,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Test,
            db_kind: None,
            security: SecurityConfig::default(),
            config: AppConfig::default(),
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        match self.db_kind {
            Some(kind) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_app_db(self.env, kind).await?;
                info!(env = ?self.env, db_kind = ?kind, "database ready");
                Ok(AppState::new(conn, self.security, self.config))
            }
            None => Ok(AppState::without_db(self.security, self.config)),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
