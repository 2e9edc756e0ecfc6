use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5500;
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set when DATABASE_URL is not provided")]
    MissingVar(&'static str),
    #[error("invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),
    #[error("invalid HOST {0:?}")]
    InvalidHost(String),
}

#[derive(Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub connect_options: PgConnectOptions,
    pub db_max_connections: u32,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

/// Leaves out the password carried by `connect_options`.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("bind_addr", &self.bind_addr)
            .field("db_host", &self.connect_options.get_host())
            .field("db_port", &self.connect_options.get_port())
            .field("db_name", &self.connect_options.get_database())
            .field("db_user", &self.connect_options.get_username())
            .field("db_max_connections", &self.db_max_connections)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same rules as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connect_options = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .map_err(ConfigError::InvalidDatabaseUrl)?,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
                let port = lookup("DB_PORT")
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or(DEFAULT_DB_PORT);
                // DB_LOCAL_* are accepted for existing local .env files.
                let database = lookup("DB_NAME")
                    .or_else(|| lookup("DB_LOCAL_DBNAME"))
                    .ok_or(ConfigError::MissingVar("DB_NAME"))?;
                let user = lookup("DB_USER")
                    .or_else(|| lookup("DB_LOCAL_USER"))
                    .ok_or(ConfigError::MissingVar("DB_USER"))?;
                let mut options = PgConnectOptions::new()
                    .host(&host)
                    .port(port)
                    .database(&database)
                    .username(&user);
                if let Some(password) =
                    lookup("DB_PASSWORD").or_else(|| lookup("DB_LOCAL_PASSWORD"))
                {
                    options = options.password(&password);
                }
                options
            }
        };

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
            .max(1);

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let ip: IpAddr = host.parse().map_err(|_| ConfigError::InvalidHost(host.clone()))?;
        let port = lookup("PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr: SocketAddr::from((ip, port)),
            connect_options,
            db_max_connections,
            cors_allowed_origins,
        })
    }
}
