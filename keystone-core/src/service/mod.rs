/// Service layer for the Keystone backend
///
/// The services own validation and orchestration; the store stays a thin
/// persistence layer. This is also the only place plaintext passwords exist
/// in memory.
///
/// # Modules
///
/// - `accounts`: User creation and lookup
/// - `sessions`: Credential verification (login)
use crate::error::CoreError;

pub mod accounts;
pub mod sessions;

/// Flattens validator errors into a single `InvalidInput`
///
/// Field messages are sorted so the resulting text is deterministic
/// regardless of hash-map iteration order.
pub(crate) fn invalid_request(errors: validator::ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                match &error.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: validation failed", field),
                }
            })
        })
        .collect();
    parts.sort();

    CoreError::InvalidInput(parts.join("; "))
}
