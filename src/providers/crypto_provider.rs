use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use std::fmt;

use crate::errors::InternalError;

/// Password hashing with Argon2id, keyed by the configured pepper
pub struct CryptoProvider {
    password_pepper: String,
}

impl CryptoProvider {
    pub fn new(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, InternalError> {
        let parsed = match PasswordHash::new(password_hash) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(false),
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_crypto_provider() -> CryptoProvider {
        CryptoProvider::new("test-pepper-for-unit-tests")
    }

    #[test]
    fn test_hash_password_produces_argon2id_phc_string() {
        let crypto = create_test_crypto_provider();

        let hash = crypto.hash_password("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(&hash).is_ok());
    }

    #[test]
    fn test_verify_password_accepts_original_and_rejects_other() {
        let crypto = create_test_crypto_provider();
        let hash = crypto.hash_password("correct horse").unwrap();

        assert!(crypto.verify_password("correct horse", &hash).unwrap());
        assert!(!crypto.verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let crypto = create_test_crypto_provider();

        let hash1 = crypto.hash_password("same").unwrap();
        let hash2 = crypto.hash_password("same").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_different_pepper_fails_verification() {
        let hash = create_test_crypto_provider().hash_password("secret").unwrap();
        let other = CryptoProvider::new("another-pepper");

        assert!(!other.verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        let crypto = create_test_crypto_provider();

        assert!(!crypto.verify_password("secret", "not-a-hash").unwrap());
    }

    #[test]
    fn test_debug_does_not_expose_pepper() {
        let debug_output = format!("{:?}", create_test_crypto_provider());

        assert!(!debug_output.contains("test-pepper"));
        assert!(debug_output.contains("<redacted>"));
    }
}
