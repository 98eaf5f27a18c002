//! Schema initialization
//!
//! Create-if-absent only. Never drops or alters existing tables.

use super::pool::Database;
use super::repos::DbError;

const POSTGRES_DISHES: &str = r#"
    CREATE TABLE IF NOT EXISTS dishes (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

// Timestamps are stored as RFC 3339 text with millisecond precision.
const SQLITE_DISHES: &str = r#"
    CREATE TABLE IF NOT EXISTS dishes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(255) NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    )
"#;

/// Create all tables that don't exist yet.
pub async fn create_tables(db: &Database) -> Result<(), DbError> {
    tracing::info!(backend = %db.kind(), "Creating tables if absent");

    match db {
        Database::Postgres(pool) => {
            sqlx::query(POSTGRES_DISHES).execute(pool).await?;
        }
        Database::Sqlite(pool) => {
            sqlx::query(SQLITE_DISHES).execute(pool).await?;
        }
    }

    Ok(())
}
