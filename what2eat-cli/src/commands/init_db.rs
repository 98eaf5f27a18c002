//! One-shot schema initialization

use anyhow::{Context, Result};

use what2eat_server::{create_tables, AppConfig, Database};

/// Create any missing tables, then exit
pub async fn run_init_db(config: &AppConfig) -> Result<()> {
    let db = Database::connect(config)
        .await
        .context("Failed to create database pool")?;

    create_tables(&db)
        .await
        .context("Failed to create tables")?;
    db.close().await;

    println!(
        "Tables ready ({})",
        config.connection().redacted_url()
    );
    Ok(())
}
