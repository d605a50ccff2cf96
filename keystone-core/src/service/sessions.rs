/// Session service: credential verification
///
/// Login looks the user up by email and verifies the supplied password
/// against the stored Argon2id hash. Both failure cases (unknown email and
/// wrong password) collapse into the same `InvalidCredentials` error so a
/// caller cannot probe which emails are registered. The unknown-email path
/// burns a hash of the supplied password so the two cases also cost the
/// same amount of work.
///
/// # Example
///
/// ```no_run
/// use keystone_core::service::sessions::{self, LoginRequest};
/// # use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let identity = sessions::login(
///     &pool,
///     LoginRequest {
///         email: "user@example.com".to_string(),
///         password: "correct horse battery".to_string(),
///     },
/// )
/// .await?;
/// println!("Authenticated: {}", identity.user_id);
/// # Ok(())
/// # }
/// ```
use crate::{
    auth::password,
    error::{CoreError, CoreResult},
    models::user::{User, UserRole},
    service::invalid_request,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password
    pub password: String,
}

/// Authenticated identity returned on successful login
///
/// No session token is issued; the call surface returns the identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The authenticated user's identifier
    pub user_id: String,

    /// The authenticated user's email
    pub email: String,

    /// The authenticated user's role
    pub role: UserRole,
}

/// Verifies credentials and returns the authenticated identity
///
/// On success the user's `last_login_at` stamp is updated.
///
/// # Errors
///
/// - `InvalidInput` if the email is not well-formed
/// - `InvalidCredentials` if the email is unknown or the password does not
///   match; the two cases are indistinguishable by design
/// - `StorageUnavailable` / `PoolExhausted` if the pool cannot service the
///   request
pub async fn login(pool: &SqlitePool, req: LoginRequest) -> CoreResult<AuthenticatedUser> {
    req.validate().map_err(invalid_request)?;

    let user = match User::find_by_email(pool, &req.email).await? {
        Some(user) => user,
        None => {
            // Spend the same work a real verification would, so response
            // time does not reveal whether the email is registered.
            let _ = password::hash_password(&req.password);
            debug!("Login failed: unknown email");
            return Err(CoreError::InvalidCredentials);
        }
    };

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        debug!(user_id = %user.id, "Login failed: wrong password");
        return Err(CoreError::InvalidCredentials);
    }

    User::touch_last_login(pool, &user.id).await?;

    info!(user_id = %user.id, "Login succeeded");
    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_user_serializes_role_as_text() {
        let identity = AuthenticatedUser {
            user_id: "u-1".to_string(),
            email: "test@example.com".to_string(),
            role: UserRole::Admin,
        };

        let json = serde_json::to_value(&identity).expect("Identity should serialize");
        assert_eq!(json["user_id"], "u-1");
        assert_eq!(json["role"], "admin");
    }

    // Integration tests for the login flow are in tests/auth_tests.rs
}
