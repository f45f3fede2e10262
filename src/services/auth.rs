//! Authentication service implementation
//!
//! Bearer tokens are HMAC-signed JWTs whose subject is the user id; they are
//! issued at login and checked on every authenticated route. Passwords are
//! stored as Argon2id PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::config::AuthConfig;
use crate::utils::errors::{AppError, Result};

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

/// Issues and verifies bearer tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: jsonwebtoken::EncodingKey,
    decoding_key: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
    ttl_seconds: i64,
}

impl JwtService {
    /// Create a new JwtService with an HMAC secret
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding_key: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
            validation: jsonwebtoken::Validation::default(),
            ttl_seconds,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_seconds)
    }

    /// Issue a signed token for a user
    pub fn issue(&self, user_id: i64) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Config(format!("failed to sign token: {}", e)))
    }

    /// Verify a token and return the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<i64> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token verification failed");
                AppError::Unauthorized("invalid or expired token".to_string())
            })?;

        claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("invalid token subject".to_string()))
    }
}

/// Hash a password into a PHC string with a fresh salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Credentials(e.to_string()))
}

/// Check a password against a stored PHC string
///
/// A stored value that does not parse never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "unit-test-secret-value";

    #[test]
    fn test_issue_and_verify() {
        let svc = JwtService::new(SECRET, 3600);
        let token = svc.issue(42).unwrap();
        assert_eq!(svc.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = JwtService::new(SECRET, 3600);
        assert_matches!(svc.verify("invalid.token.here"), Err(AppError::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new("secret-a-secret-a", 3600);
        let verifier = JwtService::new("secret-b-secret-b", 3600);
        let token = issuer.issue(1).unwrap();
        assert_matches!(verifier.verify(&token), Err(AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Expired two minutes ago, past the default leeway.
        let svc = JwtService::new(SECRET, -120);
        let token = svc.issue(1).unwrap();
        assert_matches!(svc.verify(&token), Err(AppError::Unauthorized(_)));
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_malformed_stored_hash_never_matches() {
        assert!(!verify_password("anything", "plaintext"));
        assert!(!verify_password("", ""));
    }
}
