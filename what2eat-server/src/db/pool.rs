//! Connection pool and per-request sessions
//!
//! `Database` owns the single pool for the configured backend. `DbSession`
//! holds one pooled connection; dropping it hands the connection back.

use std::time::Duration;

use log::LevelFilter;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Postgres, Sqlite};

use super::repos::DbError;
use crate::config::{AppConfig, DbKind, PoolTuning};

/// SQLite serializes writers anyway; a few readers are plenty.
const SQLITE_MAX_CONNECTIONS: u32 = 5;

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide connection pool
#[derive(Debug, Clone)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// One pooled connection, borrowed for the duration of a request.
#[derive(Debug)]
pub enum DbSession {
    Postgres(PoolConnection<Postgres>),
    Sqlite(PoolConnection<Sqlite>),
}

impl Database {
    /// Open the pool described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the first connection can't be established, or if
    /// the SQLite parent directory can't be created.
    pub async fn connect(config: &AppConfig) -> Result<Self, DbError> {
        let settings = config.settings();
        let descriptor = config.connection();
        let echo = descriptor.options().echo;

        tracing::info!(url = %descriptor.redacted_url(), "Connecting to database");

        let db = match settings.db_type {
            DbKind::Postgres => {
                let connect = PgConnectOptions::new()
                    .host(&settings.db_host)
                    .port(settings.db_port)
                    .username(&settings.db_user)
                    .password(&settings.db_password)
                    .database(&settings.db_name);

                let pool = postgres_pool_options(descriptor.options().pool.as_ref())
                    .connect_with(statement_logging(connect, echo))
                    .await?;
                Self::Postgres(pool)
            }
            DbKind::Sqlite => {
                let path = &settings.sqlite_db_path;

                // Ensure parent directory exists
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }

                let connect = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .busy_timeout(SQLITE_BUSY_TIMEOUT);

                let pool = SqlitePoolOptions::new()
                    .max_connections(SQLITE_MAX_CONNECTIONS)
                    .connect_with(statement_logging(connect, echo))
                    .await?;
                Self::Sqlite(pool)
            }
        };

        tracing::info!(backend = %db.kind(), "Database pool ready");
        Ok(db)
    }

    pub fn kind(&self) -> DbKind {
        match self {
            Self::Postgres(_) => DbKind::Postgres,
            Self::Sqlite(_) => DbKind::Sqlite,
        }
    }

    /// Borrow one connection from the pool.
    ///
    /// Waits at most the configured pool timeout.
    pub async fn acquire(&self) -> Result<DbSession, DbError> {
        let session = match self {
            Self::Postgres(pool) => DbSession::Postgres(pool.acquire().await?),
            Self::Sqlite(pool) => DbSession::Sqlite(pool.acquire().await?),
        };
        Ok(session)
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }
}

fn statement_logging<O: ConnectOptions>(options: O, echo: bool) -> O {
    if echo {
        options.log_statements(LevelFilter::Info)
    } else {
        options.disable_statement_logging()
    }
}

fn postgres_pool_options(tuning: Option<&PoolTuning>) -> PgPoolOptions {
    let Some(tuning) = tuning else {
        return PgPoolOptions::new();
    };

    if tuning.use_lifo {
        tracing::warn!("pool_use_lifo is set but the pool has no LIFO mode; ignoring");
    }

    // Connections open on demand; pool_size only widens the ceiling.
    PgPoolOptions::new()
        .max_connections(tuning.max_connections())
        .acquire_timeout(tuning.pool_timeout)
        .test_before_acquire(tuning.pre_ping)
        .max_lifetime(tuning.recycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn sqlite_config(path: std::path::PathBuf) -> AppConfig {
        AppConfig::new(Settings {
            sqlite_db_path: path,
            ..Settings::default()
        })
    }

    #[tokio::test]
    async fn sqlite_creates_parent_dir_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dishes.sqlite3");

        let db = Database::connect(&sqlite_config(path.clone())).await.unwrap();
        assert_eq!(db.kind(), DbKind::Sqlite);
        assert!(path.exists());

        db.close().await;
    }

    #[tokio::test]
    async fn dropped_sessions_return_to_pool() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::connect(&sqlite_config(dir.path().join("pool.sqlite3")))
            .await
            .unwrap();

        // More sequential acquisitions than the pool holds; a leaked
        // connection would make this block until the acquire timeout.
        for _ in 0..(SQLITE_MAX_CONNECTIONS * 3) {
            let session = db.acquire().await.unwrap();
            assert!(matches!(session, DbSession::Sqlite(_)));
            drop(session);
        }

        db.close().await;
    }

    #[test]
    fn pool_options_follow_tuning() {
        let settings = Settings {
            db_type: DbKind::Postgres,
            pool_size: 4,
            max_overflow: 2,
            pool_timeout: 7,
            ..Settings::default()
        };
        let tuning = settings.engine_options().pool.unwrap();
        let options = postgres_pool_options(Some(&tuning));

        assert_eq!(options.get_max_connections(), 6);
        assert_eq!(options.get_min_connections(), 0);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(7));
        assert!(options.get_test_before_acquire());
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(3600)));
    }

    // Integration tests require a real database
    // Run with: DB_TYPE=postgres DB_HOST=... cargo test -p what2eat-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn postgres_pool_acquires_connection() {
        let config = AppConfig::load(None).expect("settings");
        let db = Database::connect(&config).await.expect("pool creation failed");
        assert_eq!(db.kind(), DbKind::Postgres);

        let mut session = db.acquire().await.expect("acquire failed");
        let DbSession::Postgres(conn) = &mut session else {
            panic!("expected a postgres session");
        };
        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&mut **conn)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
