//! Integration tests for the database infrastructure
//!
//! These tests need a reachable PostgreSQL instance in `DATABASE_URL`;
//! run them with `cargo test -- --ignored`.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_migrations_create_users_table() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Migrations are idempotent.
    run_migrations(&pool).await?;

    let row = sqlx::query(
        "SELECT COUNT(*) AS columns FROM information_schema.columns WHERE table_name = 'users'",
    )
    .fetch_one(&pool)
    .await?;

    let columns: i64 = row.get("columns");
    assert_eq!(columns, 7, "users table should have seven columns");

    Ok(())
}
