/// Global runtime and pool handle
///
/// The boundary is synchronous while the backend is async, so the adapter
/// owns a small multi-thread tokio runtime and drives every operation to
/// completion with `block_on`. The connection pool is a process-wide
/// singleton created by the initialization call.
///
/// Re-initialization policy: the first successful initialization wins.
/// Later calls, with the same or a different path, log a warning and leave
/// the existing pool untouched.
use keystone_core::config::CoreConfig;
use keystone_core::db::{migrations, pool};
use keystone_core::error::{CoreError, CoreResult};
use sqlx::SqlitePool;
use std::future::Future;
use std::sync::{Once, OnceLock};
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static TRACING: Once = Once::new();
static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static POOL: OnceLock<SqlitePool> = OnceLock::new();

/// Installs the tracing subscriber once per process
///
/// `try_init` tolerates a host that already installed its own subscriber.
pub(crate) fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "keystone_core=info,keystone=info".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}

/// Returns the shared runtime, building it on first use
fn runtime() -> CoreResult<&'static Runtime> {
    if let Some(rt) = RUNTIME.get() {
        return Ok(rt);
    }

    let rt = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| CoreError::Internal(format!("Failed to build runtime: {}", e)))?;

    // If another thread won the race, the extra runtime is dropped here.
    Ok(RUNTIME.get_or_init(|| rt))
}

/// Runs a future to completion on the shared runtime
pub fn block_on<F: Future>(future: F) -> CoreResult<F::Output> {
    Ok(runtime()?.block_on(future))
}

/// Returns a handle to the initialized pool
///
/// `SqlitePool` is internally reference-counted, so the clone is cheap.
pub fn pool() -> CoreResult<SqlitePool> {
    POOL.get().cloned().ok_or_else(|| {
        CoreError::StorageUnavailable(
            "Connection pool is not initialized; call keystone_init_pool first".to_string(),
        )
    })
}

/// Creates the process-wide pool and applies migrations
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the database
/// path is unreachable, or migrations fail. In that case no pool is stored
/// and every subsequent operation reports `StorageUnavailable`.
pub fn initialize(db_path: &str) -> CoreResult<()> {
    if POOL.get().is_some() {
        warn!("keystone_init_pool called again; keeping the existing pool");
        return Ok(());
    }

    let config = CoreConfig::from_env(db_path)
        .map_err(|e| CoreError::InvalidInput(format!("Invalid configuration: {}", e)))?;

    let new_pool = block_on(async move {
        let new_pool = pool::create_pool(config.database).await?;
        migrations::run_migrations(&new_pool).await?;
        Ok::<SqlitePool, CoreError>(new_pool)
    })??;

    match POOL.set(new_pool) {
        Ok(()) => {
            info!(path = %db_path, "Connection pool initialized");
            Ok(())
        }
        Err(extra_pool) => {
            // Lost a race against a concurrent initialization; the existing
            // pool stays, the duplicate is closed.
            warn!("Concurrent initialization detected; discarding duplicate pool");
            block_on(pool::close_pool(extra_pool))?;
            Ok(())
        }
    }
}
