/// Self-describing result envelopes
///
/// The boundary cannot propagate Rust errors, so every operation serializes
/// its outcome into a tagged JSON envelope before crossing. Serialization
/// itself must not fail the contract: if an envelope cannot be produced, a
/// static fallback error envelope is returned instead of NULL.
use keystone_core::error::CoreError;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Static last-resort envelope, returned if envelope serialization itself
/// fails. Kept as a plain string so producing it cannot fail.
pub const FALLBACK_ENVELOPE: &str =
    r#"{"status":"error","error":{"kind":"internal","message":"Failed to serialize result envelope"}}"#;

/// Tagged envelope crossing the boundary
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    /// Successful operation with its payload
    Ok { data: T },

    /// Failed operation with a machine-readable kind and a human-readable
    /// message
    Error { error: ErrorBody },
}

/// Error half of the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind (e.g. "conflict", "not_found")
    pub kind: String,

    /// Human-readable message
    pub message: String,
}

/// Serializes a success envelope
pub fn success<T: Serialize>(data: T) -> String {
    match serde_json::to_string(&Envelope::Ok { data }) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize success envelope: {}", e);
            FALLBACK_ENVELOPE.to_string()
        }
    }
}

/// Serializes an error envelope from a core error
pub fn failure(err: &CoreError) -> String {
    let envelope: Envelope<()> = Envelope::Error {
        error: ErrorBody {
            kind: err.kind().to_string(),
            message: err.to_string(),
        },
    };

    match serde_json::to_string(&envelope) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize error envelope: {}", e);
            FALLBACK_ENVELOPE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_success_envelope_shape() {
        let json = success(serde_json::json!({ "id": "u-1" }));
        let value: Value = serde_json::from_str(&json).expect("Envelope should parse");

        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["id"], "u-1");
    }

    #[test]
    fn test_failure_envelope_shape() {
        let json = failure(&CoreError::Conflict("Email already exists".to_string()));
        let value: Value = serde_json::from_str(&json).expect("Envelope should parse");

        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "conflict");
        assert_eq!(value["error"]["message"], "Conflict: Email already exists");
    }

    #[test]
    fn test_fallback_envelope_is_valid_json() {
        let value: Value = serde_json::from_str(FALLBACK_ENVELOPE).expect("Fallback should parse");
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["kind"], "internal");
    }

    #[test]
    fn test_invalid_credentials_envelope_carries_unified_message() {
        let json = failure(&CoreError::InvalidCredentials);
        let value: Value = serde_json::from_str(&json).expect("Envelope should parse");

        assert_eq!(value["error"]["kind"], "invalid_credentials");
        assert_eq!(value["error"]["message"], "Invalid email or password");
    }
}
