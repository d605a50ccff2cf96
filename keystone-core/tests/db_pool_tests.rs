/// Integration tests for the database connection pool
///
/// These tests open real SQLite databases in per-test temporary directories,
/// so they can run in parallel without interfering with each other.
use keystone_core::db::pool::{
    close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig,
};
use keystone_core::error::CoreError;
use tempfile::TempDir;

/// Helper: a config pointing into a fresh temporary directory
fn test_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        path: dir
            .path()
            .join("keystone_test.db")
            .to_string_lossy()
            .into_owned(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_pool_success() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let result = create_pool(test_config(&dir)).await;
    assert!(result.is_ok(), "Failed to create pool: {:?}", result.err());

    let pool = result.unwrap();

    let stats = get_pool_stats(&pool);
    assert!(
        stats.total_connections > 0,
        "Pool should have at least one connection"
    );

    close_pool(pool).await;
}

#[tokio::test]
async fn test_create_pool_with_unreachable_path() {
    let config = DatabaseConfig {
        path: "/nonexistent-keystone-dir/deeper/keystone.db".to_string(),
        max_connections: 1,
        min_connections: 0,
        acquire_timeout_seconds: 2,
        idle_timeout_seconds: None,
        max_lifetime_seconds: None,
        create_if_missing: true,
    };

    let result = create_pool(config).await;
    assert!(result.is_err(), "Should fail when the parent directory is missing");
}

#[tokio::test]
async fn test_health_check_success() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    let result = health_check(&pool).await;
    assert!(result.is_ok(), "Health check should succeed");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_pool_query_execution() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    let row: (i64,) = sqlx::query_as("SELECT ?")
        .bind(42i64)
        .fetch_one(&pool)
        .await
        .expect("Failed to execute query");

    assert_eq!(row.0, 42);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_pool_concurrent_queries() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    // Run more concurrent queries than the pool size to exercise queueing
    let mut handles = vec![];

    for i in 0..20i64 {
        let pool_clone = pool.clone();
        let handle = tokio::spawn(async move {
            let row: (i64,) = sqlx::query_as("SELECT ?")
                .bind(i)
                .fetch_one(&pool_clone)
                .await
                .expect("Failed to execute query");

            assert_eq!(row.0, i);
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.expect("Task panicked");
    }

    close_pool(pool).await;
}

#[tokio::test]
async fn test_pool_exhaustion_times_out_bounded() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        max_connections: 1,
        min_connections: 0,
        acquire_timeout_seconds: 2,
        idle_timeout_seconds: None,
        max_lifetime_seconds: None,
        ..test_config(&dir)
    };

    let pool = create_pool(config).await.expect("Failed to create pool");

    // Hold the only connection, then ask for another
    let _held = pool.acquire().await.expect("Failed to acquire connection");

    let start = std::time::Instant::now();
    let result = pool.acquire().await;
    let elapsed = start.elapsed();

    let err = result.expect_err("Should time out when pool is exhausted");
    assert!(
        elapsed.as_secs() >= 2 && elapsed.as_secs() <= 4,
        "Should time out after approximately acquire_timeout_seconds, took {:?}",
        elapsed
    );

    // The bounded wait surfaces as the dedicated pool exhaustion kind
    let core_err: CoreError = err.into();
    assert_eq!(core_err.kind(), "pool_exhausted");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_get_pool_stats() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    let stats = get_pool_stats(&pool);
    assert!(stats.total_connections >= 1, "Should have at least min_connections");
    assert!(stats.total_connections <= 5, "Should not exceed max_connections");

    let _conn = pool.acquire().await.expect("Failed to acquire connection");

    let stats_with_active = get_pool_stats(&pool);
    assert!(
        stats_with_active.active_connections > 0,
        "Should have at least one active connection"
    );

    close_pool(pool).await;
}

#[tokio::test]
async fn test_close_pool() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    close_pool(pool.clone()).await;

    let result: Result<(i64,), _> = sqlx::query_as("SELECT 1").fetch_one(&pool).await;

    assert!(result.is_err(), "Queries should fail after pool is closed");
}
