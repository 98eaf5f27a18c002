//! Database layer - connection pool, sessions, schema and repositories
//!
//! # Design Principles
//!
//! - One process-wide pool, one pooled connection (session) per request
//! - Sessions return their connection on drop, whatever the exit path
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Every repository call is a single autocommit statement

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{Database, DbSession};
pub use repos::*;
pub use schema::create_tables;
