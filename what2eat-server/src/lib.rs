//! what2eat-server: dish records over HTTP
//!
//! Create, read, update, delete and search dishes stored in PostgreSQL or
//! SQLite, plus a greeting, a health check and a schema initialization
//! endpoint.
//!
//! Layers, leaves first: [`config`] → [`db`] (pool, sessions, schema,
//! repositories) → [`service`] → [`http`].

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use config::{AppConfig, ConfigError, DbKind, Settings};
pub use db::{create_tables, Database, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
