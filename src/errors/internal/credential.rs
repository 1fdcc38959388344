use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    DuplicateUsername(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Expired token")]
    ExpiredToken,
}

impl CredentialError {
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }
}
