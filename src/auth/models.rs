// Session data models and DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// The authenticated user, as carried by a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
}

/// Body of POST /jwt.
///
/// Only `email` is signed into the token; any other fields are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct IdentityPayload {
    #[validate(email)]
    pub email: String,
}

impl From<IdentityPayload> for Identity {
    fn from(payload: IdentityPayload) -> Self {
        Self {
            email: payload.email,
        }
    }
}

/// Body returned by login and logout
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_payload_ignores_extra_fields() {
        let payload: IdentityPayload =
            serde_json::from_str(r#"{"email": "a@x.com", "name": "Ada"}"#).unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(Identity::from(payload).email, "a@x.com");
    }

    #[test]
    fn test_identity_payload_rejects_bad_email() {
        let payload: IdentityPayload = serde_json::from_str(r#"{"email": "not-an-email"}"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
