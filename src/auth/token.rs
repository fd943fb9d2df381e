// Session token issuing and verification

use crate::auth::{error::AuthError, models::Identity};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session tokens are valid for one hour
pub const SESSION_TOKEN_SECONDS: i64 = 3600;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Token service for JWT operations.
///
/// Built once at startup from the configured secret and shared through
/// application state; verification never touches the datastore.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key
    pub fn new(secret: String) -> Self {
        // Expired means expired: no grace period past `exp`
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_duration: SESSION_TOKEN_SECONDS,
        }
    }

    /// Sign a session token for `identity`
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            email: identity.email.clone(),
            iat: now,
            exp: now + self.token_duration,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Check signature and expiry, returning the identity the token carries
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.decode_claims(token).map(|claims| Identity {
            email: claims.email,
        })
    }

    /// Decode and validate a token, keeping every claim
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "test_secret_key_for_testing_purposes";

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new(TEST_SECRET.to_string())
    }

    fn identity(email: &str) -> Identity {
        Identity {
            email: email.to_string(),
        }
    }

    #[test]
    fn test_token_expiration_is_one_hour() {
        let service = test_token_service();
        let token = service.issue(&identity("test@example.com")).unwrap();
        let claims = service.decode_claims(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600, "Session token should expire in exactly one hour");
    }

    #[test]
    fn test_verify_returns_identity() {
        let service = test_token_service();
        let token = service.issue(&identity("owner@example.com")).unwrap();

        let verified = service.verify(&token).unwrap();
        assert_eq!(verified.email, "owner@example.com");
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(matches!(service.verify(""), Err(AuthError::InvalidToken)));
        assert!(matches!(service.verify("not.a.token"), Err(AuthError::InvalidToken)));
        assert!(matches!(service.verify("invalid_token_format"), Err(AuthError::InvalidToken)));
        assert!(matches!(
            service.verify("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1".to_string());
        let service2 = TokenService::new("secret2".to_string());

        let token = service1.issue(&identity("test@example.com")).unwrap();

        assert!(service1.verify(&token).is_ok());
        assert!(matches!(service2.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_token_service();
        let claims = Claims {
            email: "test@example.com".to_string(),
            iat: Utc::now().timestamp() - 4000,
            exp: Utc::now().timestamp() - 400, // Expired 400 seconds ago
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_expired_one_second_ago_is_rejected() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            email: "a@x.com".to_string(),
            iat: now - SESSION_TOKEN_SECONDS - 1,
            exp: now - 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = test_token_service();
        let token = service.issue(&identity("a@x.com")).unwrap();
        let forged = swap_payload(&token, "b@y.com");

        assert!(matches!(service.verify(&forged), Err(AuthError::InvalidToken)));
    }

    // Swap the payload segment while keeping the original signature
    fn swap_payload(token: &str, email: &str) -> String {
        let other = TokenService::new("attacker".to_string())
            .issue(&identity(email))
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        format!("{}.{}.{}", parts[0], other_parts[1], parts[2])
    }

    proptest! {
        #[test]
        fn prop_token_carries_identity(
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.issue(&identity(&email))?;
            let verified = service.verify(&token)?;
            prop_assert_eq!(verified.email, email);
        }

        #[test]
        fn prop_token_expiration(
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.issue(&identity(&email))?;
            let claims = service.decode_claims(&token)?;
            prop_assert_eq!(claims.exp - claims.iat, SESSION_TOKEN_SECONDS);
        }

        #[test]
        fn prop_random_strings_are_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.verify(&malformed).is_err());
        }
    }
}
