//! Connection spec resolution from the environment.
//!
//! Variables:
//! - `POSTGRES_HOST` (default `localhost`), `POSTGRES_PORT` (default `5432`)
//! - `PROD_DB`, `TEST_DB` (the latter must end in `_test`)
//! - `APP_DB_USER` / `APP_DB_PASSWORD`, `OWNER_DB_USER` / `OWNER_DB_PASSWORD`
//! - `SQLITE_DB_DIR` (default `./data`) for file-backed SQLite
//! - `DB_MAX_CONNECTIONS` to override the runtime pool size

use std::env;
use std::str::FromStr;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::DbInfraError;

/// Characters left untouched in URL userinfo.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(Self::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(Self::SqliteMemory),
            other => Err(DbInfraError::config(format!(
                "unknown database kind '{other}' (expected postgres | sqlite-file | sqlite-memory)"
            ))),
        }
    }
}

impl From<DbKind> for sea_orm::DatabaseBackend {
    fn from(kind: DbKind) -> Self {
        match kind {
            DbKind::Postgres => sea_orm::DatabaseBackend::Postgres,
            DbKind::SqliteFile | DbKind::SqliteMemory => sea_orm::DatabaseBackend::Sqlite,
        }
    }
}

/// Which credentials to connect with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Least-privilege runtime role
    App,
    /// Schema owner, used for migrations
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolPurpose {
    Runtime,
    Migration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// Reject combinations that can never work.
pub fn validate_db_config(env: RuntimeEnv, db_kind: DbKind) -> Result<(), DbInfraError> {
    if env == RuntimeEnv::Prod && db_kind == DbKind::SqliteMemory {
        return Err(DbInfraError::config(
            "in-memory SQLite is only supported for the test environment",
        ));
    }
    Ok(())
}

/// Build the connection URL for the given environment, kind and owner.
pub fn make_conn_spec(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
) -> Result<String, DbInfraError> {
    validate_db_config(env, db_kind)?;

    match db_kind {
        DbKind::Postgres => {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            port.parse::<u16>().map_err(|_| {
                DbInfraError::config(format!("POSTGRES_PORT must be a port number, got '{port}'"))
            })?;
            let db_name = db_name(env)?;
            let (user, password) = credentials(owner)?;
            Ok(format!(
                "postgresql://{}:{}@{host}:{port}/{db_name}",
                utf8_percent_encode(&user, USERINFO),
                utf8_percent_encode(&password, USERINFO),
            ))
        }
        DbKind::SqliteFile => {
            let dir = sqlite_dir();
            let file = match env {
                RuntimeEnv::Prod => "food.db",
                RuntimeEnv::Test => "food_test.db",
            };
            Ok(format!("sqlite://{dir}/{file}?mode=rwc"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Pool sizing for a connection purpose.
///
/// In-memory SQLite is pinned to a single connection; every extra connection
/// would open a separate empty database.
pub fn pool_settings(
    env: RuntimeEnv,
    db_kind: DbKind,
    purpose: PoolPurpose,
) -> Result<PoolSettings, DbInfraError> {
    let acquire_timeout = match env {
        RuntimeEnv::Prod => Duration::from_secs(5),
        RuntimeEnv::Test => Duration::from_secs(10),
    };

    if db_kind == DbKind::SqliteMemory || purpose == PoolPurpose::Migration {
        return Ok(PoolSettings {
            min_connections: 1,
            max_connections: 1,
            acquire_timeout,
        });
    }

    let max_connections = match env::var("DB_MAX_CONNECTIONS") {
        Ok(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
            DbInfraError::config(format!(
                "DB_MAX_CONNECTIONS must be a positive integer, got '{raw}'"
            ))
        })?,
        Err(_) => match db_kind {
            DbKind::SqliteFile => 4,
            _ => (num_cpus::get() as u32 * 2).clamp(4, 32),
        },
    };

    Ok(PoolSettings {
        min_connections: 1,
        max_connections,
        acquire_timeout,
    })
}

pub fn sqlite_dir() -> String {
    env::var("SQLITE_DB_DIR").unwrap_or_else(|_| "./data".to_string())
}

fn db_name(env: RuntimeEnv) -> Result<String, DbInfraError> {
    match env {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let name = must_var("TEST_DB")?;
            if !name.ends_with("_test") {
                return Err(DbInfraError::config(format!(
                    "test environment requires a database name ending in '_test', got '{name}'"
                )));
            }
            Ok(name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), DbInfraError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((must_var("OWNER_DB_USER")?, must_var("OWNER_DB_PASSWORD")?)),
    }
}

fn must_var(name: &str) -> Result<String, DbInfraError> {
    env::var(name).map_err(|_| {
        DbInfraError::config(format!("required environment variable '{name}' is not set"))
    })
}
