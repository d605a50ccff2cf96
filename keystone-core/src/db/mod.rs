/// Database layer for the Keystone backend
///
/// This module provides SQLite connection pooling and schema migrations.
///
/// # Modules
///
/// - `pool`: Connection pool management with health checks
/// - `migrations`: Database migration runner
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use keystone_core::db::pool::{create_pool, DatabaseConfig};
/// use keystone_core::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         path: "/data/app/keystone.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
