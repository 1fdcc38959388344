use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for account creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    /// Unique login name, no whitespace
    #[oai(validator(min_length = 1, max_length = 64, pattern = r"^\S+$"))]
    pub username: String,

    #[oai(validator(min_length = 8, max_length = 128))]
    pub password: String,

    /// Display name
    #[oai(validator(min_length = 1, max_length = 128))]
    pub name: String,

    #[oai(validator(max_length = 1024))]
    pub bio: Option<String>,
}

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the access token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,
}
