//! Application settings and the derived connection descriptor
//!
//! Settings are layered, later sources win:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config <path>`)
//! 3. Process environment (including anything loaded from `.env`)
//!
//! Key names are matched case-insensitively in every source, so `DB_TYPE`,
//! `db_type` and `Db_Type` all set the same field.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder JWT secret. Declared for deployments; no route checks it.
const DEFAULT_JWT_SECRET: &str = "uyb*&TGBB^F7fb88g7";

/// Shown in place of secrets by `redacted()` and `redacted_url()`.
const REDACTED: &str = "***";

/// Configuration error. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported DB_TYPE '{0}' (expected 'postgres' or 'sqlite')")]
    UnsupportedDbType(String),

    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Store kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DbKind {
    Postgres,
    Sqlite,
}

impl DbKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

impl FromStr for DbKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(ConfigError::UnsupportedDbType(s.to_owned())),
        }
    }
}

impl TryFrom<String> for DbKind {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for DbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw settings, one field per recognized key.
///
/// Missing keys keep their defaults. Unknown keys in a config file are
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub app_name: String,
    pub debug: bool,

    pub db_type: DbKind,

    // PostgreSQL
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,

    // PostgreSQL connection pool
    pub pool_size: u32,
    pub max_overflow: u32,
    /// Seconds to wait for a pooled connection
    pub pool_timeout: u64,
    pub pool_pre_ping: bool,
    /// Maximum connection lifetime in seconds; zero or negative disables recycling
    pub pool_recycle: i64,
    pub pool_use_lifo: bool,

    /// Log every SQL statement
    pub echo: bool,

    pub sqlite_db_path: PathBuf,

    pub jwt_secret: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "What To Eat".to_string(),
            debug: false,
            db_type: DbKind::Sqlite,
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_user: "postgres".to_string(),
            db_password: "postgres".to_string(),
            db_name: "what2eat".to_string(),
            pool_size: 20,
            max_overflow: 10,
            pool_timeout: 30,
            pool_pre_ping: true,
            pool_recycle: 3600,
            pool_use_lifo: false,
            echo: false,
            sqlite_db_path: PathBuf::from("./data/what2eat.sqlite3"),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional TOML file, then the environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match config_file {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };

        // Non-UTF-8 variables can't name one of our keys; skip them.
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        settings.apply_overrides(vars)?;

        Ok(settings)
    }

    /// Parse a TOML document over the defaults.
    ///
    /// Keys are case-insensitive; values must have the field's TOML type.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content)?;
        let table: toml::Table = table
            .into_iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value))
            .collect();

        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Apply environment-style string overrides. Unrecognized keys are ignored.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            self.set(key.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Set one setting by case-insensitive name.
    ///
    /// Returns `Ok(false)` when the key isn't a recognized setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool, ConfigError> {
        match key.to_ascii_lowercase().as_str() {
            "app_name" => self.app_name = value.to_owned(),
            "debug" => self.debug = parse_bool("debug", value)?,
            "db_type" => self.db_type = value.parse()?,
            "db_host" => self.db_host = value.to_owned(),
            "db_port" => self.db_port = parse_num("db_port", value)?,
            "db_user" => self.db_user = value.to_owned(),
            "db_password" => self.db_password = value.to_owned(),
            "db_name" => self.db_name = value.to_owned(),
            "pool_size" => self.pool_size = parse_num("pool_size", value)?,
            "max_overflow" => self.max_overflow = parse_num("max_overflow", value)?,
            "pool_timeout" => self.pool_timeout = parse_num("pool_timeout", value)?,
            "pool_pre_ping" => self.pool_pre_ping = parse_bool("pool_pre_ping", value)?,
            "pool_recycle" => self.pool_recycle = parse_num("pool_recycle", value)?,
            "pool_use_lifo" => self.pool_use_lifo = parse_bool("pool_use_lifo", value)?,
            "echo" => self.echo = parse_bool("echo", value)?,
            "sqlite_db_path" => self.sqlite_db_path = PathBuf::from(value),
            "jwt_secret" => self.jwt_secret = value.to_owned(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Connection string for the configured store.
    pub fn database_url(&self) -> String {
        match self.db_type {
            DbKind::Postgres => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
            ),
            DbKind::Sqlite => format!("sqlite:///{}", self.sqlite_db_path.display()),
        }
    }

    /// Engine and pool options. Pool tuning only applies to PostgreSQL.
    pub fn engine_options(&self) -> EngineOptions {
        let pool = match self.db_type {
            DbKind::Postgres => Some(PoolTuning {
                pool_size: self.pool_size,
                max_overflow: self.max_overflow,
                pool_timeout: Duration::from_secs(self.pool_timeout),
                pre_ping: self.pool_pre_ping,
                recycle: u64::try_from(self.pool_recycle)
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
                use_lifo: self.pool_use_lifo,
            }),
            DbKind::Sqlite => None,
        };

        EngineOptions {
            echo: self.echo,
            pool,
        }
    }

    /// Copy with the database password and JWT secret masked.
    pub fn redacted(&self) -> Self {
        Self {
            db_password: REDACTED.to_string(),
            jwt_secret: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

/// Engine options derived from settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Log SQL statements
    pub echo: bool,
    /// Pool tuning (PostgreSQL only)
    pub pool: Option<PoolTuning>,
}

/// Connection pool tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTuning {
    pub pool_size: u32,
    pub max_overflow: u32,
    pub pool_timeout: Duration,
    pub pre_ping: bool,
    pub recycle: Option<Duration>,
    pub use_lifo: bool,
}

impl PoolTuning {
    /// Upper bound on open connections: persistent plus overflow.
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow).max(1)
    }
}

/// Connection string plus engine options, resolved once per process.
///
/// Only the redacted string is kept; pools connect from typed options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    redacted_url: String,
    options: EngineOptions,
}

impl ConnectionDescriptor {
    fn resolve(settings: &Settings) -> Self {
        Self {
            redacted_url: settings.redacted().database_url(),
            options: settings.engine_options(),
        }
    }

    /// Connection string safe for logs.
    pub fn redacted_url(&self) -> &str {
        &self.redacted_url
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

/// Immutable process configuration: settings plus their connection descriptor.
///
/// Build it once at startup and share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    settings: Settings,
    connection: ConnectionDescriptor,
}

impl AppConfig {
    pub fn new(settings: Settings) -> Self {
        let connection = ConnectionDescriptor::resolve(&settings);
        Self {
            settings,
            connection,
        }
    }

    /// Load settings (see [`Settings::load`]) and resolve them.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Settings::load(config_file).map(Self::new)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn connection(&self) -> &ConnectionDescriptor {
        &self.connection
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_owned(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_num<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_owned(),
        reason: e.to_string(),
    })
}
