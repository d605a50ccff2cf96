/// Database models for the Keystone backend
///
/// This module contains all database models and their store operations.
///
/// # Models
///
/// - `user`: User accounts (the only persisted entity behind the call surface)
///
/// # Example
///
/// ```no_run
/// use keystone_core::models::user::{NewUser, User, UserRole};
/// use keystone_core::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = NewUser {
///     id: "a3f1c2d0".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Member,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod user;
