use poem_openapi::Object;

use crate::types::db::post;
use crate::types::internal::updates::PostUpdate;

#[derive(Object, Debug)]
pub struct CreatePostRequest {
    #[oai(validator(min_length = 1, max_length = 4096))]
    pub text: String,
}

#[derive(Object, Debug)]
pub struct UpdatePostRequest {
    #[oai(validator(min_length = 1, max_length = 4096))]
    pub text: Option<String>,
}

impl From<UpdatePostRequest> for PostUpdate {
    fn from(request: UpdatePostRequest) -> Self {
        Self { text: request.text }
    }
}

#[derive(Object, Debug)]
pub struct PostResponse {
    pub id: i32,
    pub text: String,
    pub owner_id: i32,
    pub is_active: bool,
    pub is_owner_active: bool,
    /// Visible comments on the post
    pub comments: i64,
    /// Visible likes on the post
    pub likes: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            text: post.text,
            owner_id: post.owner_id,
            is_active: post.is_active,
            is_owner_active: post.is_owner_active,
            comments: post.comments,
            likes: post.likes,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
