use std::env;
use std::path::PathBuf;
use std::time::Duration;

use caduceus_core::{AppError, AppResult};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestStoreConfig {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegeStoreConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Rest(RestStoreConfig),
    Memory {
        seed_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub store: PrivilegeStoreConfig,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let backend = lookup("PRIVILEGE_STORE")
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "postgres".to_owned());

        let store = match backend.as_str() {
            "postgres" => {
                let max_connections = parse_u32(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
                if max_connections == 0 {
                    return Err(AppError::Validation(
                        "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
                    ));
                }

                PrivilegeStoreConfig::Postgres {
                    database_url: required(&lookup, "DATABASE_URL")?,
                    max_connections,
                }
            }
            "rest" => {
                let raw_url = required(&lookup, "STORE_REST_URL")?;
                let base_url = Url::parse(raw_url.as_str()).map_err(|error| {
                    AppError::Validation(format!(
                        "invalid STORE_REST_URL value '{raw_url}': {error}"
                    ))
                })?;
                let timeout_ms = parse_u64(&lookup, "STORE_TIMEOUT_MS", 10_000)?;
                if timeout_ms == 0 {
                    return Err(AppError::Validation(
                        "STORE_TIMEOUT_MS must be greater than zero".to_owned(),
                    ));
                }

                PrivilegeStoreConfig::Rest(RestStoreConfig {
                    base_url,
                    api_key: required(&lookup, "STORE_API_KEY")?,
                    timeout: Duration::from_millis(timeout_ms),
                })
            }
            "memory" => PrivilegeStoreConfig::Memory {
                seed_file: lookup("PRIVILEGE_SEED_FILE")
                    .filter(|value| !value.trim().is_empty())
                    .map(PathBuf::from),
            },
            other => {
                return Err(AppError::Validation(format!(
                    "PRIVILEGE_STORE must be one of 'postgres', 'rest' or 'memory', got '{other}'"
                )));
            }
        };

        Ok(Self { store })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_u32(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u32) -> AppResult<u32> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
