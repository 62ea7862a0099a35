//! Application state
//!
//! Configuration and the shared handles injected into every handler

use crate::device_registry::DeviceRegistryService;
use sqlx::mysql::MySqlConnectOptions;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database host
    pub db_host: String,
    /// Database port
    pub db_port: u16,
    /// Database user
    pub db_user: String,
    /// Database password
    pub db_password: String,
    /// Database (schema) name
    pub db_name: String,
    /// Connection pool size
    pub db_max_connections: u32,
    /// Server port
    pub port: u16,
    /// Server host
    pub host: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_host: required_env("DB_HOST", "localhost"),
            db_port: env_parse("DB_PORT").unwrap_or(3306),
            db_user: required_env("DB_USER", "root"),
            db_password: required_env("DB_PASSWORD", ""),
            db_name: required_env("DB_NAME", "device_registry"),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            port: env_parse("PORT").unwrap_or(3000),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}

impl AppConfig {
    /// MySQL connect options built from the discrete settings
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    /// Listen address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Store connection setting that deployments are expected to provide
fn required_env(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        tracing::warn!(key = key, fallback = fallback, "Required setting not set, using fallback");
        fallback.to_string()
    })
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// DeviceRegistryService (owns the pool)
    pub registry: Arc<DeviceRegistryService>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        let config = AppConfig {
            db_host: "db".to_string(),
            db_port: 3306,
            db_user: "app".to_string(),
            db_password: "p@ss:word".to_string(),
            db_name: "devices".to_string(),
            db_max_connections: 10,
            port: 3000,
            host: "0.0.0.0".to_string(),
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_required_env_fallback() {
        assert_eq!(
            required_env("DEVICE_REGISTRY_TEST_UNSET_KEY", "fallback"),
            "fallback"
        );
    }
}
