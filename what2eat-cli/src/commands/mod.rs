//! Command implementations for the what2eat CLI

pub mod config;
pub mod init_db;
pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use config::run_config;
pub use init_db::run_init_db;
pub use serve::run_serve;
