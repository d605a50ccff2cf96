/// Account service: user creation and lookup
///
/// Validates caller-supplied fields, hashes the password, and drives the
/// store. Uniqueness of email and identifier is left to the schema so that
/// concurrent creates racing on the same email resolve to exactly one
/// winner; the losing inserts surface as `Conflict`.
///
/// # Example
///
/// ```no_run
/// use keystone_core::service::accounts::{self, CreateUserRequest};
/// # use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let profile = accounts::create_user(
///     &pool,
///     CreateUserRequest {
///         identifier: String::new(), // empty => generated UUID v4
///         email: "user@example.com".to_string(),
///         password: "correct horse battery".to_string(),
///         role: "member".to_string(),
///     },
/// )
/// .await?;
///
/// let same = accounts::get_user(&pool, &profile.id).await?;
/// assert_eq!(same.email, profile.email);
/// # Ok(())
/// # }
/// ```
use crate::{
    auth::password,
    error::{CoreError, CoreResult},
    models::user::{NewUser, User, UserProfile, UserRole},
    service::invalid_request,
};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

/// Longest accepted identifier
const MAX_IDENTIFIER_LEN: usize = 64;

/// Create-user request
#[derive(Debug, Clone, Validate)]
pub struct CreateUserRequest {
    /// Unique identifier; empty means "generate one for me"
    #[validate(length(max = 64, message = "Identifier must be at most 64 characters"))]
    pub identifier: String,

    /// Email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,

    /// Plaintext password; hashed before it reaches the store
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role as text: one of "admin", "member", "guest"; empty defaults to member
    pub role: String,
}

/// Creates a new user account
///
/// An empty identifier is replaced with a generated UUID v4; a non-empty one
/// must stay within 64 characters of `[A-Za-z0-9_-]`. An empty role defaults
/// to `member`.
///
/// # Errors
///
/// - `InvalidInput` if any field fails validation or the role text is
///   outside the enumerated set
/// - `Conflict` if the email or identifier is already taken
/// - `StorageUnavailable` / `PoolExhausted` if the pool cannot service the
///   request
pub async fn create_user(pool: &SqlitePool, req: CreateUserRequest) -> CoreResult<UserProfile> {
    req.validate().map_err(invalid_request)?;

    let role = parse_role(&req.role)?;
    let identifier = resolve_identifier(&req.identifier)?;

    let password_hash = password::hash_password(&req.password)?;

    debug!(identifier = %identifier, "Creating user");

    let user = User::create(
        pool,
        NewUser {
            id: identifier,
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?;

    info!(user_id = %user.id, "User created");
    Ok(user.into())
}

/// Looks up a user by identifier
///
/// # Errors
///
/// - `InvalidInput` if the identifier is empty
/// - `NotFound` if no such user exists
/// - `StorageUnavailable` / `PoolExhausted` if the pool cannot service the
///   request
pub async fn get_user(pool: &SqlitePool, identifier: &str) -> CoreResult<UserProfile> {
    if identifier.is_empty() {
        return Err(CoreError::InvalidInput(
            "Identifier must not be empty".to_string(),
        ));
    }

    match User::find_by_id(pool, identifier).await? {
        Some(user) => Ok(user.into()),
        None => Err(CoreError::NotFound(format!(
            "No user with identifier {}",
            identifier
        ))),
    }
}

/// Parses the role text; empty defaults to member
fn parse_role(role: &str) -> CoreResult<UserRole> {
    if role.trim().is_empty() {
        return Ok(UserRole::Member);
    }

    UserRole::parse(role).ok_or_else(|| {
        CoreError::InvalidInput(format!(
            "Unknown role {:?}; expected one of admin, member, guest",
            role
        ))
    })
}

/// Returns the caller's identifier or generates one
fn resolve_identifier(identifier: &str) -> CoreResult<String> {
    if identifier.is_empty() {
        return Ok(Uuid::new_v4().to_string());
    }

    if identifier.len() > MAX_IDENTIFIER_LEN {
        return Err(CoreError::InvalidInput(format!(
            "Identifier must be at most {} characters",
            MAX_IDENTIFIER_LEN
        )));
    }

    let valid = identifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(CoreError::InvalidInput(
            "Identifier may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }

    Ok(identifier.to_string())
}
