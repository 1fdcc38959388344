use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Username at the time the token was issued
    pub username: String,

    /// Superuser bit at the time the token was issued
    pub is_superuser: bool,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// The acting user of a request, resolved against the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub is_superuser: bool,
}

impl Principal {
    pub fn new(user_id: i32, is_superuser: bool) -> Self {
        Self { user_id, is_superuser }
    }
}
