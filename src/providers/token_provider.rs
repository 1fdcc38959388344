use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::user;
use crate::types::internal::auth::Claims;

/// Issues and validates HS256 access tokens
pub struct TokenProvider {
    jwt_secret: String,
    jwt_expiration_minutes: i64,
}

impl TokenProvider {
    pub fn new(jwt_secret: impl Into<String>, jwt_expiration_minutes: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_expiration_minutes,
        }
    }

    /// Generate a JWT for `user`
    ///
    /// # Returns
    /// * `(token, expires_at)` - encoded JWT and its expiry as a Unix timestamp
    pub fn generate_jwt(&self, user: &user::Model) -> Result<(String, i64), InternalError> {
        let now = Utc::now().timestamp();
        let expiration = now + self.jwt_expiration_minutes * 60;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_superuser: user.is_superuser,
            exp: expiration,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        Ok((token, expiration))
    }

    /// Validate a JWT and return its claims
    ///
    /// # Errors
    /// * `CredentialError::ExpiredToken` - `exp` is in the past
    /// * `CredentialError::InvalidToken` - bad signature or malformed token
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken.into(),
            _ => {
                tracing::debug!("Rejected JWT: {}", e);
                CredentialError::invalid_token("invalid signature or malformed").into()
            }
        })
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenProvider {{ jwt_expiration: {}min }}", self.jwt_expiration_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn test_user() -> user::Model {
        user::Model {
            id: 42,
            username: "alice".to_string(),
            password_hash: String::new(),
            name: "Alice".to_string(),
            bio: None,
            is_active: true,
            is_superuser: true,
            posts: 0,
            comments: 0,
            followers: 0,
            followings: 0,
            created_at: "2025/03/01 12:00".to_string(),
            updated_at: "2025/03/01 12:00".to_string(),
        }
    }

    #[test]
    fn test_jwt_expiration_matches_configuration() {
        let provider = TokenProvider::new(SECRET, 30);

        let (token, expires_at) = provider.generate_jwt(&test_user()).unwrap();
        let claims = provider.validate_jwt(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert_eq!(claims.exp, expires_at);
    }

    #[test]
    fn test_jwt_carries_user_identity() {
        let provider = TokenProvider::new(SECRET, 30);

        let (token, _) = provider.generate_jwt(&test_user()).unwrap();
        let claims = provider.validate_jwt(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert!(claims.is_superuser);
    }

    #[test]
    fn test_wrong_secret_is_invalid_token() {
        let (token, _) = TokenProvider::new(SECRET, 30).generate_jwt(&test_user()).unwrap();
        let other = TokenProvider::new("another-secret-key-minimum-32-characters", 30);

        let result = other.validate_jwt(&token);

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Beyond the default 60 second leeway
        let provider = TokenProvider::new(SECRET, -5);

        let (token, _) = provider.generate_jwt(&test_user()).unwrap();

        assert!(matches!(
            provider.validate_jwt(&token),
            Err(InternalError::Credential(CredentialError::ExpiredToken))
        ));
    }

    #[test]
    fn test_garbage_is_invalid_token() {
        let provider = TokenProvider::new(SECRET, 30);

        assert!(matches!(
            provider.validate_jwt("not.a.jwt"),
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_debug_trait_does_not_expose_secrets() {
        let debug_output = format!("{:?}", TokenProvider::new(SECRET, 30));

        assert!(!debug_output.contains("test-secret-key"));
        assert!(debug_output.contains("<redacted>"));
    }
}
