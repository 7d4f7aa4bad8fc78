//! ModKit Database crate.
//!
//! Two concerns live here:
//! - [`DbHandle`]: a pooled SQLx connection for SQLite or PostgreSQL, exposed to the rest of
//!   the workspace as a SeaORM `DatabaseConnection`.
//! - [`listing`]: the dynamic list query layer. It turns a `page_core::ListQuery` (sort keys,
//!   typed filter predicates, a free-text search term, page/size) into one composed SeaORM
//!   select and runs the count + bounded fetch that back a paginated list endpoint.
//!
//! # Example
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> modkit_db::Result<()> {
//!     use modkit_db::{ConnectOpts, DbHandle};
//!
//!     let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//!     let conn = db.sea();
//!     // hand `conn` to repositories / migrations
//!     # let _ = conn;
//!     db.close().await;
//!     Ok(())
//! }
//! ```

pub mod listing;

use std::collections::HashMap;
use std::time::Duration;

#[cfg(feature = "pg")]
use sea_orm::SqlxPostgresConnector;
#[cfg(feature = "sqlite")]
use sea_orm::SqlxSqliteConnector;
use sea_orm::DatabaseConnection;
#[cfg(feature = "pg")]
use sqlx::{postgres::PgPoolOptions, PgPool};
#[cfg(feature = "sqlite")]
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use thiserror::Error;

pub use listing::{FieldKind, FieldMap, LimitCfg, Listable};

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the DB handle and helpers.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Connection options; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// SQLite `busy_timeout` in milliseconds when the DSN doesn't set one.
    pub busy_timeout_ms: u32,
    /// For SQLite file DSNs, create parent directories if missing.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            busy_timeout_ms: 5000,
            create_sqlite_dirs: true,
        }
    }
}

/// One concrete sqlx pool.
#[derive(Clone, Debug)]
pub enum DbPool {
    #[cfg(feature = "pg")]
    Postgres(PgPool),
    #[cfg(feature = "sqlite")]
    Sqlite(SqlitePool),
}

/// Main handle.
#[derive(Debug)]
pub struct DbHandle {
    engine: DbEngine,
    pool: DbPool,
    dsn: String,
    sea: DatabaseConnection,
}

impl DbHandle {
    /// Detect engine by DSN scheme.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(dsn.to_string()))
        }
    }

    /// Connect and build handle.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        match engine {
            #[cfg(feature = "pg")]
            DbEngine::Postgres => {
                let mut o = PgPoolOptions::new();
                if let Some(n) = opts.max_conns {
                    o = o.max_connections(n);
                }
                if let Some(n) = opts.min_conns {
                    o = o.min_connections(n);
                }
                if let Some(t) = opts.acquire_timeout {
                    o = o.acquire_timeout(t);
                }
                if let Some(t) = opts.idle_timeout {
                    o = o.idle_timeout(t);
                }
                let pool = o.connect(dsn).await?;
                let sea = SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone());
                tracing::info!(engine = "postgres", "database pool ready");
                Ok(Self {
                    engine,
                    pool: DbPool::Postgres(pool),
                    dsn: dsn.to_string(),
                    sea,
                })
            }
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => {
                prepare_sqlite_path(dsn, opts.create_sqlite_dirs)?;
                let pragmas = parse_sqlite_pragmas_from_dsn(dsn);
                let clean_dsn = remove_sqlite_pragmas_from_dsn(dsn);
                let in_memory = is_memory_dsn(&clean_dsn);

                let mut o = SqlitePoolOptions::new();
                // Every connection to `sqlite::memory:` is a separate database.
                if in_memory {
                    o = o
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None);
                } else if let Some(n) = opts.max_conns {
                    o = o.max_connections(n);
                }
                if let Some(t) = opts.acquire_timeout {
                    o = o.acquire_timeout(t);
                }
                if !in_memory {
                    if let Some(t) = opts.idle_timeout {
                        o = o.idle_timeout(t);
                    }
                }

                let busy_default = opts.busy_timeout_ms;
                o = o.after_connect(move |conn, _meta| {
                    let stmts = sqlite_pragma_statements(&pragmas, in_memory, busy_default);
                    Box::pin(async move {
                        for stmt in stmts {
                            sqlx::query(&stmt).execute(&mut *conn).await?;
                        }
                        Ok(())
                    })
                });

                let pool = o.connect(&clean_dsn).await?;
                let sea = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
                tracing::info!(engine = "sqlite", in_memory, "database pool ready");
                Ok(Self {
                    engine,
                    pool: DbPool::Sqlite(pool),
                    dsn: clean_dsn,
                    sea,
                })
            }
            #[cfg(not(feature = "pg"))]
            DbEngine::Postgres => Err(DbError::FeatureDisabled("PostgreSQL feature not enabled")),
            #[cfg(not(feature = "sqlite"))]
            DbEngine::Sqlite => Err(DbError::FeatureDisabled("SQLite feature not enabled")),
        }
    }

    /// Graceful pool close. (Dropping the pool also closes it; this just makes it explicit.)
    pub async fn close(self) {
        match self.pool {
            #[cfg(feature = "pg")]
            DbPool::Postgres(p) => p.close().await,
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(p) => p.close().await,
        }
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    /// DSN with driver-specific pragmas stripped.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    #[cfg(feature = "sqlite")]
    pub fn sqlx_sqlite(&self) -> Option<&SqlitePool> {
        match self.pool {
            DbPool::Sqlite(ref p) => Some(p),
            #[cfg(feature = "pg")]
            _ => None,
        }
    }

    #[cfg(feature = "pg")]
    pub fn sqlx_postgres(&self) -> Option<&PgPool> {
        match self.pool {
            DbPool::Postgres(ref p) => Some(p),
            #[cfg(feature = "sqlite")]
            _ => None,
        }
    }

    /// Get SeaORM connection (clone; cheap handle).
    pub fn sea(&self) -> DatabaseConnection {
        self.sea.clone()
    }
}

// ===================== sqlite helpers =====================

const SQLITE_PRAGMA_PARAMS: &[&str] = &["wal", "synchronous", "busy_timeout", "journal_mode"];

fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> Result<()> {
    if !create_dirs || is_memory_dsn(dsn) {
        return Ok(());
    }
    let raw = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    let path = raw.split('?').next().unwrap_or(raw);
    if path.starts_with("file:") {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Strip the pragma parameters SQLx doesn't understand.
fn remove_sqlite_pragmas_from_dsn(dsn: &str) -> String {
    let Some((base, query)) = dsn.split_once('?') else {
        return dsn.to_string();
    };
    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default().to_lowercase();
            !key.is_empty() && !SQLITE_PRAGMA_PARAMS.contains(&key.as_str())
        })
        .collect();
    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

/// Whitelisted pragmas from the DSN query string. Invalid values are logged and ignored.
fn parse_sqlite_pragmas_from_dsn(dsn: &str) -> HashMap<String, String> {
    let mut pragmas = HashMap::new();
    let Some((_, query)) = dsn.split_once('?') else {
        return pragmas;
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let key = key.to_lowercase();
        let validated = match key.as_str() {
            "wal" => match value.to_lowercase().as_str() {
                "true" | "1" => Some("WAL".to_string()),
                "false" | "0" => Some("DELETE".to_string()),
                _ => None,
            },
            "synchronous" => Some(value.to_uppercase())
                .filter(|v| matches!(v.as_str(), "OFF" | "NORMAL" | "FULL" | "EXTRA")),
            "busy_timeout" => value
                .parse::<u32>()
                .ok()
                .map(|ms| ms.to_string()),
            "journal_mode" => Some(value.to_uppercase()).filter(|v| {
                matches!(
                    v.as_str(),
                    "DELETE" | "WAL" | "MEMORY" | "TRUNCATE" | "PERSIST" | "OFF"
                )
            }),
            _ => continue,
        };
        match validated {
            Some(v) => {
                let name = if key == "wal" { "journal_mode" } else { key.as_str() };
                pragmas.entry(name.to_string()).or_insert(v);
            }
            None => tracing::warn!(param = %key, value = %value, "invalid SQLite pragma in DSN, ignoring"),
        }
    }
    pragmas
}

fn sqlite_pragma_statements(
    pragmas: &HashMap<String, String>,
    in_memory: bool,
    busy_default: u32,
) -> Vec<String> {
    let journal = match pragmas.get("journal_mode") {
        Some(mode) => mode.clone(),
        // In-memory databases don't support WAL.
        None if in_memory => "DELETE".to_string(),
        None => "WAL".to_string(),
    };
    let sync = pragmas
        .get("synchronous")
        .cloned()
        .unwrap_or_else(|| "NORMAL".to_string());

    let mut out = vec![
        format!("PRAGMA journal_mode = {journal}"),
        format!("PRAGMA synchronous = {sync}"),
        "PRAGMA foreign_keys = ON".to_string(),
    ];
    if !in_memory {
        let busy = pragmas
            .get("busy_timeout")
            .cloned()
            .unwrap_or_else(|| busy_default.to_string());
        out.push(format!("PRAGMA busy_timeout = {busy}"));
    }
    out
}
