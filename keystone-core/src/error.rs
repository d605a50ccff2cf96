/// Error handling for the Keystone backend
///
/// This module provides a unified error type shared by the store, the
/// services, and the FFI adapter. All fallible operations return
/// `Result<T, CoreError>`; the adapter serializes the variant's `kind()`
/// into the error envelope handed back to the caller.
///
/// # Example
///
/// ```
/// use keystone_core::error::{CoreError, CoreResult};
///
/// fn lookup(id: &str) -> CoreResult<()> {
///     if id.is_empty() {
///         return Err(CoreError::InvalidInput("identifier must not be empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert_eq!(lookup("").unwrap_err().kind(), "invalid_input");
/// ```
use crate::auth::password::PasswordError;

/// Core result type alias
pub type CoreResult<T> = Result<T, CoreError>;

/// Unified error type for all backend operations
///
/// Domain errors (`Conflict`, `NotFound`, `InvalidCredentials`) and
/// validation errors are recovered at the service boundary; infrastructure
/// errors (`StorageUnavailable`, `PoolExhausted`) are surfaced as-is and
/// never silently retried. `Internal` covers unexpected defects and is the
/// variant panics are converted into at the FFI boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A caller-supplied field failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A uniqueness constraint was violated (duplicate email or identifier)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Login failed
    ///
    /// Deliberately carries no detail: "unknown email" and "wrong password"
    /// must be indistinguishable to the caller.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The storage backend cannot service requests
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Timed out waiting for a free connection
    #[error("Timed out waiting for a free connection")]
    PoolExhausted,

    /// An unexpected defect inside the backend
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Machine-readable error kind used in the FFI error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "invalid_input",
            CoreError::Conflict(_) => "conflict",
            CoreError::NotFound(_) => "not_found",
            CoreError::InvalidCredentials => "invalid_credentials",
            CoreError::StorageUnavailable(_) => "storage_unavailable",
            CoreError::PoolExhausted => "pool_exhausted",
            CoreError::Internal(_) => "internal",
        }
    }
}

/// Convert sqlx errors to core errors
impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => CoreError::PoolExhausted,
            sqlx::Error::PoolClosed => {
                CoreError::StorageUnavailable("Connection pool is closed".to_string())
            }
            sqlx::Error::Io(io_err) => {
                CoreError::StorageUnavailable(format!("Storage I/O error: {}", io_err))
            }
            sqlx::Error::Database(db_err) => {
                // SQLite reports the violated column as "users.<column>"
                if db_err.is_unique_violation() {
                    let message = db_err.message();
                    if message.contains("users.email") {
                        return CoreError::Conflict("Email already exists".to_string());
                    }
                    if message.contains("users.id") {
                        return CoreError::Conflict("Identifier already exists".to_string());
                    }
                    return CoreError::Conflict(format!("Constraint violation: {}", message));
                }

                CoreError::Internal(format!("Database error: {}", db_err))
            }
            _ => CoreError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert migration errors to core errors
///
/// A failed migration leaves the schema unusable, so the pool is treated as
/// never having become available.
impl From<sqlx::migrate::MigrateError> for CoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CoreError::StorageUnavailable(format!("Migration failed: {}", err))
    }
}

/// Convert password errors to core errors
impl From<PasswordError> for CoreError {
    fn from(err: PasswordError) -> Self {
        CoreError::Internal(format!("Password operation failed: {}", err))
    }
}
