use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set, or DB_USER, DB_PASSWORD and DB_DSN together")]
    MissingDatabase,

    #[error("DB_DSN must look like host[:port]/dbname, got '{0}'")]
    InvalidDsn(String),

    #[error("{key} must be a valid number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be true or false, got '{value}'")]
    InvalidFlag { key: &'static str, value: String },
}

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub url: String,
    pub max_size: u32,
    /// How long a request waits for a connection before giving up.
    pub connect_timeout: Duration,
}

impl DbSettings {
    pub const DEFAULT_MAX_SIZE: u32 = 10;
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db: DbSettings,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub run_migrations: bool,
}

impl Settings {
    /// Read the process environment. `.env` must already be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = match var("DATABASE_URL") {
            Some(url) => url,
            None => match (var("DB_USER"), var("DB_PASSWORD"), var("DB_DSN")) {
                (Some(user), Some(password), Some(dsn)) => credentials_url(&user, &password, &dsn)?,
                _ => return Err(ConfigError::MissingDatabase),
            },
        };

        let max_size = parse_number(var("DB_POOL_MAX_SIZE"), "DB_POOL_MAX_SIZE")?
            .unwrap_or(DbSettings::DEFAULT_MAX_SIZE);
        let connect_timeout = parse_number(var("DB_CONNECT_TIMEOUT_SECS"), "DB_CONNECT_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DbSettings::DEFAULT_CONNECT_TIMEOUT);

        Ok(Self {
            db: DbSettings {
                url,
                max_size,
                connect_timeout,
            },
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_number(var("PORT"), "PORT")?.unwrap_or(8080),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            run_migrations: parse_flag(var("RUN_MIGRATIONS"), "RUN_MIGRATIONS")?.unwrap_or(true),
        })
    }
}

/// Credentials are percent-encoded into the userinfo part.
fn credentials_url(user: &str, password: &str, dsn: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidDsn(dsn.to_string());
    let mut url = Url::parse(&format!("postgres://{}", dsn.trim_start_matches('/')))
        .map_err(|_| invalid())?;
    if !url.has_host() {
        return Err(invalid());
    }
    url.set_username(user).map_err(|_| invalid())?;
    url.set_password(Some(password)).map_err(|_| invalid())?;
    Ok(url.into())
}

fn parse_number<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value })
    })
    .transpose()
}

fn parse_flag(raw: Option<String>, key: &'static str) -> Result<Option<bool>, ConfigError> {
    raw.map(|value| match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    })
    .transpose()
}
