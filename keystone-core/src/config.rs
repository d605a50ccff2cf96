/// Configuration management for the backend
///
/// The host application supplies the database path at initialization time;
/// everything else (pool sizing, timeouts) is read from environment
/// variables with embedded-friendly defaults.
///
/// # Environment Variables
///
/// - `KEYSTONE_MAX_CONNECTIONS`: Maximum pool size (default: 5)
/// - `KEYSTONE_MIN_CONNECTIONS`: Idle connections to keep warm (default: 1)
/// - `KEYSTONE_ACQUIRE_TIMEOUT_SECONDS`: Bounded wait for a free connection (default: 5)
/// - `RUST_LOG`: Log filter (default: info-level for the keystone crates)
///
/// # Example
///
/// ```no_run
/// use keystone_core::config::CoreConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = CoreConfig::from_env("/data/app/keystone.db")?;
/// assert_eq!(config.database.path, "/data/app/keystone.db");
/// # Ok(())
/// # }
/// ```
use crate::db::pool::DatabaseConfig;
use std::env;

/// Complete backend configuration
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Database and pool configuration
    pub database: DatabaseConfig,
}

impl CoreConfig {
    /// Loads configuration from environment variables
    ///
    /// The database path comes from the caller (it is the one piece of
    /// configuration the host must provide); the pool settings fall back to
    /// `DatabaseConfig` defaults when the environment does not override them.
    ///
    /// # Errors
    ///
    /// Returns an error if an override variable is present but cannot be
    /// parsed as a number.
    pub fn from_env(db_path: &str) -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let defaults = DatabaseConfig::default();

        let max_connections = match env::var("KEYSTONE_MAX_CONNECTIONS") {
            Ok(v) => v.parse::<u32>().map_err(|_| {
                anyhow::anyhow!("KEYSTONE_MAX_CONNECTIONS must be a positive integer")
            })?,
            Err(_) => defaults.max_connections,
        };

        let min_connections = match env::var("KEYSTONE_MIN_CONNECTIONS") {
            Ok(v) => v.parse::<u32>().map_err(|_| {
                anyhow::anyhow!("KEYSTONE_MIN_CONNECTIONS must be a non-negative integer")
            })?,
            Err(_) => defaults.min_connections,
        };

        let acquire_timeout_seconds = match env::var("KEYSTONE_ACQUIRE_TIMEOUT_SECONDS") {
            Ok(v) => v.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("KEYSTONE_ACQUIRE_TIMEOUT_SECONDS must be a positive integer")
            })?,
            Err(_) => defaults.acquire_timeout_seconds,
        };

        if max_connections == 0 {
            anyhow::bail!("KEYSTONE_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            database: DatabaseConfig {
                path: db_path.to_string(),
                max_connections,
                min_connections,
                acquire_timeout_seconds,
                ..defaults
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_uses_defaults() {
        let config = CoreConfig::from_env("/tmp/test.db").expect("Config should load");
        assert_eq!(config.database.path, "/tmp/test.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.database.acquire_timeout_seconds, 5);
        assert!(config.database.create_if_missing);
    }
}
