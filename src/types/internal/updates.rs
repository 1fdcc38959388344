/// Mutable profile fields of a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the bio
    pub bio: Option<Option<String>>,
}

impl UserProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentUpdate {
    pub text: Option<String>,
}

/// Fields supplied at signup
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub name: String,
    pub bio: Option<String>,
}
