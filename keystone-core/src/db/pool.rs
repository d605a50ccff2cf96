/// Database connection pool management
///
/// This module provides a bounded SQLite connection pool using sqlx. It
/// includes a creation-time health check, WAL journaling for concurrent
/// readers, and a bounded acquire timeout so no caller ever blocks
/// indefinitely waiting for a connection.
///
/// # Example
///
/// ```no_run
/// use keystone_core::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         path: "/data/app/keystone.db".to_string(),
///         max_connections: 5,
///         min_connections: 1,
///         acquire_timeout_seconds: 5,
///         idle_timeout_seconds: Some(300),
///         max_lifetime_seconds: Some(1800),
///         create_if_missing: true,
///     };
///
///     let pool = create_pool(config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT ?")
///         .bind(42i64)
///         .fetch_one(&pool)
///         .await?;
///
///     Ok(())
/// }
/// ```
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool
///
/// All timeouts are specified in seconds for ease of configuration from
/// environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,

    /// Maximum number of connections in the pool
    ///
    /// Default: 5. A mobile host rarely benefits from more; SQLite allows a
    /// single writer at a time regardless.
    pub max_connections: u32,

    /// Minimum number of idle connections to maintain
    ///
    /// Default: 1. Keeping one connection warm avoids reopening the file on
    /// every call.
    pub min_connections: u32,

    /// Bounded wait for acquiring a connection from the pool (seconds)
    ///
    /// Default: 5 seconds. When every connection is checked out, callers
    /// wait at most this long before the operation fails with a pool
    /// exhaustion error.
    pub acquire_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed (seconds)
    ///
    /// Default: Some(300). None = connections never closed due to idle time.
    pub idle_timeout_seconds: Option<u64>,

    /// Maximum lifetime of a connection before forced recycling (seconds)
    ///
    /// Default: Some(1800). None = connections live forever.
    pub max_lifetime_seconds: Option<u64>,

    /// Whether to create the database file if it does not exist
    ///
    /// Default: true. The mobile host passes a path inside its own sandbox;
    /// first launch has no file yet.
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_seconds: 5,
            idle_timeout_seconds: Some(300),
            max_lifetime_seconds: Some(1800),
            create_if_missing: true,
        }
    }
}

/// Creates and initializes a SQLite connection pool
///
/// This function:
/// 1. Creates a pool with the specified configuration
/// 2. Enables WAL journaling and a busy timeout on every connection
/// 3. Performs a health check to verify the database is usable
///
/// # Errors
///
/// Returns an error if:
/// - The database path is unreachable (missing parent directory, no
///   permission) and cannot be created
/// - The file exists but is not a SQLite database
/// - The health check fails
///
/// # Example
///
/// ```no_run
/// use keystone_core::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let config = DatabaseConfig {
///     path: "/data/app/keystone.db".to_string(),
///     ..Default::default()
/// };
///
/// let pool = create_pool(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(
        path = %config.path,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout_seconds = config.acquire_timeout_seconds,
        "Creating database connection pool"
    );

    // WAL lets readers proceed while a write is in flight; the busy timeout
    // makes concurrent writers queue instead of failing with SQLITE_BUSY.
    let connect_options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(config.create_if_missing)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
        debug!(idle_timeout_seconds = idle_timeout, "Set idle timeout");
    }

    if let Some(max_lifetime) = config.max_lifetime_seconds {
        pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
        debug!(max_lifetime_seconds = max_lifetime, "Set max lifetime");
    }

    let pool = pool_options.connect_with(connect_options).await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// Executes a simple query to verify the database is reachable and
/// responding.
///
/// # Errors
///
/// Returns an error if the health check query fails
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Current pool statistics for monitoring and tests
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub active_connections: usize,

    /// Number of idle connections available
    pub idle_connections: usize,

    /// Total connections in the pool
    pub total_connections: usize,
}

pub fn get_pool_stats(pool: &SqlitePool) -> PoolStats {
    let size = pool.size();
    let idle = pool.num_idle();

    PoolStats {
        active_connections: (size as usize).saturating_sub(idle),
        idle_connections: idle,
        total_connections: size as usize,
    }
}

/// Gracefully closes the connection pool
///
/// The FFI adapter never calls this (the pool lives for the remaining
/// process lifetime); it exists for tests and embedded Rust hosts that want
/// a clean shutdown.
pub async fn close_pool(pool: SqlitePool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}
