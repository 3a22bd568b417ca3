//! Account service configuration.

use std::env;
use std::str::FromStr;

use common::{DatabaseConfig, HashingConfig};

/// Account service configuration.
#[derive(Debug, Clone, Default)]
pub struct AccountServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Password hashing settings
    pub hashing: HashingConfig,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            database: DatabaseConfig {
                url: lookup("ACCOUNT_SERVICE_DATABASE_URL")
                    .or_else(|| lookup("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: parse_var(&lookup, "ACCOUNT_SERVICE_DB_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
                min_connections: parse_var(&lookup, "ACCOUNT_SERVICE_DB_MIN_CONNECTIONS")
                    .unwrap_or(defaults.database.min_connections),
            },
            hashing: HashingConfig {
                memory_kib: parse_var(&lookup, "PASSWORD_HASH_MEMORY_KIB")
                    .unwrap_or(defaults.hashing.memory_kib),
                iterations: parse_var(&lookup, "PASSWORD_HASH_ITERATIONS")
                    .unwrap_or(defaults.hashing.iterations),
                parallelism: parse_var(&lookup, "PASSWORD_HASH_PARALLELISM")
                    .unwrap_or(defaults.hashing.parallelism),
                equalize_timing: parse_var(&lookup, "AUTH_EQUALIZE_TIMING")
                    .unwrap_or(defaults.hashing.equalize_timing),
            },
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
