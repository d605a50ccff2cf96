/// User model and database operations
///
/// This module provides the User model and the store operations implied by
/// the call surface: create, find by identifier, find by email, and a
/// last-login stamp update used by the authentication service.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id TEXT PRIMARY KEY NOT NULL,
///     email TEXT COLLATE NOCASE NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     role TEXT NOT NULL DEFAULT 'member',
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL,
///     last_login_at TEXT
/// );
/// ```
///
/// Uniqueness of both `id` and `email` is enforced by the schema, so racing
/// creates resolve to exactly one winner without application-level locking.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Roles a user account can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrative access
    Admin,

    /// Regular account (the default)
    Member,

    /// Restricted, read-mostly account
    Guest,
}

impl UserRole {
    /// Converts role to its stored/serialized string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
            UserRole::Guest => "guest",
        }
    }

    /// Parses a role from caller-supplied text
    ///
    /// Matching is case-insensitive and tolerates surrounding whitespace.
    /// Returns None for anything outside the enumerated set.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "member" => Some(UserRole::Member),
            "guest" => Some(UserRole::Guest),
            _ => None,
        }
    }
}

/// User model representing a stored account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The
/// identifier is immutable after creation; no update or delete operation
/// exists on the call surface.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier (caller-supplied or generated UUID v4)
    pub id: String,

    /// Email address (unique, case-insensitive)
    pub email: String,

    /// Argon2id password hash in PHC string format
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never logged in)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
///
/// The account service is responsible for producing a valid identifier and
/// a password hash before this reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique identifier
    pub id: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,
}

/// Public view of a user account
///
/// This is the payload serialized across the boundary for create and lookup
/// operations. The password hash never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: String,

    /// Email address
    pub email: String,

    /// Account role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

impl User {
    /// Creates a new user in the database
    ///
    /// Timestamps are written by the application so the row is complete
    /// without relying on SQLite column defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email or identifier already exists (unique constraint violation)
    /// - The pool cannot service the request
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use keystone_core::models::user::{NewUser, User, UserRole};
    /// # use sqlx::SqlitePool;
    /// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
    /// let user = User::create(
    ///     &pool,
    ///     NewUser {
    ///         id: "a3f1c2d0".to_string(),
    ///         email: "user@example.com".to_string(),
    ///         password_hash: "$argon2id$...".to_string(),
    ///         role: UserRole::Member,
    ///     },
    /// )
    /// .await?;
    /// println!("Created user: {}", user.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &SqlitePool, data: NewUser) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.id)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        // Re-read the row so the caller sees exactly what was persisted.
        let user = Self::find_by_id(pool, &data.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        Ok(user)
    }

    /// Finds a user by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot service the request
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at, last_login_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Lookup is case-insensitive (via the NOCASE collation on the column).
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot service the request
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at, last_login_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates the last login timestamp for a user
    ///
    /// Called by the authentication service after successful verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot service the request
    pub async fn touch_last_login(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Member, UserRole::Guest] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_parse_is_lenient_about_case_and_whitespace() {
        assert_eq!(UserRole::parse("  Admin "), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("MEMBER"), Some(UserRole::Member));
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!(UserRole::parse("owner"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn test_profile_drops_password_hash() {
        let now = Utc::now();
        let user = User {
            id: "u-1".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Member,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };

        let profile: UserProfile = user.into();
        let json = serde_json::to_value(&profile).expect("Profile should serialize");

        assert_eq!(json["id"], "u-1");
        assert_eq!(json["role"], "member");
        assert!(json.get("password_hash").is_none());
    }

    // Integration tests for database operations are in tests/user_store_tests.rs
}
