use std::env;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_address: String,
    pub max_connections: u32,
    pub store: StoreBackend,
}

impl Config {
    /// Reads settings from the process environment. Call `dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = lookup("BIND_ADDRESS")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid { name: "DATABASE_MAX_CONNECTIONS", value })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "postgres".to_string());
        let store = match backend.to_lowercase().as_str() {
            "postgres" => {
                let database_url = lookup("DATABASE_URL")
                    .filter(|value| !value.is_empty())
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?;
                StoreBackend::Postgres { database_url }
            }
            "memory" => StoreBackend::Memory,
            _ => return Err(ConfigError::Invalid { name: "STORE_BACKEND", value: backend }),
        };

        Ok(Config {
            bind_address,
            max_connections,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(config(&[]), Err(ConfigError::Missing("DATABASE_URL")));

        let cfg = config(&[("DATABASE_URL", "postgres://localhost/directory")]).unwrap();
        assert_eq!(cfg.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            cfg.store,
            StoreBackend::Postgres { database_url: "postgres://localhost/directory".to_string() }
        );
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let cfg = config(&[("STORE_BACKEND", "Memory"), ("BIND_ADDRESS", "0.0.0.0:9000")]).unwrap();
        assert_eq!(cfg.store, StoreBackend::Memory);
        assert_eq!(cfg.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn invalid_values_are_named() {
        assert_eq!(
            config(&[("STORE_BACKEND", "mysql")]),
            Err(ConfigError::Invalid { name: "STORE_BACKEND", value: "mysql".to_string() })
        );
        assert_eq!(
            config(&[("STORE_BACKEND", "memory"), ("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid { name: "DATABASE_MAX_CONNECTIONS", value: "0".to_string() })
        );
    }
}
