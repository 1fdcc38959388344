use poem_openapi::Object;
use poem_openapi::types::MaybeUndefined;

use crate::types::db::user;
use crate::types::internal::updates::UserProfileUpdate;

/// Public view of a user row
#[derive(Object, Debug)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub bio: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    /// Visible posts owned by the user
    pub posts: i64,
    /// Visible comments written by the user
    pub comments: i64,
    pub followers: i64,
    pub followings: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            bio: user.bio,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            posts: user.posts,
            comments: user.comments,
            followers: user.followers,
            followings: user.followings,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile changes; omitted fields are left untouched, `"bio": null` clears the bio
#[derive(Object, Debug)]
pub struct UpdateProfileRequest {
    #[oai(validator(min_length = 1, max_length = 128))]
    pub name: Option<String>,

    pub bio: MaybeUndefined<String>,
}

impl From<UpdateProfileRequest> for UserProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        let bio = match request.bio {
            MaybeUndefined::Undefined => None,
            MaybeUndefined::Null => Some(None),
            MaybeUndefined::Value(bio) => Some(Some(bio)),
        };

        Self {
            name: request.name,
            bio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_bio_clears_and_missing_bio_keeps() {
        let clear: UserProfileUpdate = UpdateProfileRequest {
            name: None,
            bio: MaybeUndefined::Null,
        }
        .into();
        let keep: UserProfileUpdate = UpdateProfileRequest {
            name: Some("Alice".to_string()),
            bio: MaybeUndefined::Undefined,
        }
        .into();

        assert_eq!(clear.bio, Some(None));
        assert!(keep.bio.is_none());
        assert_eq!(keep.name.as_deref(), Some("Alice"));
    }
}
