use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use tracing::info;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub seed_sample_data: bool,
}

impl Config {
    /// Reads the process environment. Unset keys take their defaults.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://attendance.db")?,
            bind_addr: try_load("BIND_ADDR", "127.0.0.1:5000")?,
            max_connections: try_load("DB_MAX_CONNECTIONS", "5")?,
            seed_sample_data: try_load("SEED_SAMPLE_DATA", "true")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid {key} value {raw:?}: {e}")))
}
