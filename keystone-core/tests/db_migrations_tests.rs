/// Integration tests for the migration runner
use keystone_core::db::migrations::run_migrations;
use keystone_core::db::pool::{close_pool, create_pool, DatabaseConfig};
use tempfile::TempDir;

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
async fn test_run_migrations_creates_users_table() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations should run");

    // The users table must exist and accept a well-formed row
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
        VALUES ('u-1', 'probe@example.com', '$argon2id$probe', 'member', '2025-03-01 00:00:00+00:00', '2025-03-01 00:00:00+00:00')
        "#,
    )
    .execute(&pool)
    .await
    .expect("Insert into users should succeed after migrations");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_run_migrations_is_idempotent() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("First run should succeed");
    run_migrations(&pool).await.expect("Second run should be a no-op");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_email_uniqueness_is_case_insensitive() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = create_pool(test_config(&dir)).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations should run");

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
        VALUES ('u-1', 'Case@Example.com', 'h', 'member', '2025-03-01 00:00:00+00:00', '2025-03-01 00:00:00+00:00')
        "#,
    )
    .execute(&pool)
    .await
    .expect("First insert should succeed");

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
        VALUES ('u-2', 'case@example.com', 'h', 'member', '2025-03-01 00:00:00+00:00', '2025-03-01 00:00:00+00:00')
        "#,
    )
    .execute(&pool)
    .await;

    assert!(
        result.is_err(),
        "Same email with different casing should violate the unique constraint"
    );

    close_pool(pool).await;
}
