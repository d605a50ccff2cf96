/// Database migration runner
///
/// Migrations are embedded into the binary at compile time from the
/// `migrations/` directory at the crate root, so the mobile host never needs
/// migration files on disk. Each migration is a single `.sql` file named
/// `{timestamp}_{name}.sql`.
///
/// # Example
///
/// ```no_run
/// use keystone_core::db::pool::{create_pool, DatabaseConfig};
/// use keystone_core::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     path: "/data/app/keystone.db".to_string(),
///     ..Default::default()
/// })
/// .await?;
///
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// This function:
/// 1. Creates the migrations bookkeeping table if needed
/// 2. Applies every embedded migration that has not run yet
/// 3. Returns an error if any migration fails
///
/// # Errors
///
/// Returns an error if:
/// - A migration fails to execute
/// - The database connection is lost during migration
/// - A previously applied migration was modified (checksum mismatch)
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("./migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
