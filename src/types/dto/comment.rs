use poem_openapi::Object;

use crate::types::db::comment;
use crate::types::internal::updates::CommentUpdate;

#[derive(Object, Debug)]
pub struct CreateCommentRequest {
    #[oai(validator(min_length = 1, max_length = 2048))]
    pub text: String,
}

#[derive(Object, Debug)]
pub struct UpdateCommentRequest {
    #[oai(validator(min_length = 1, max_length = 2048))]
    pub text: Option<String>,
}

impl From<UpdateCommentRequest> for CommentUpdate {
    fn from(request: UpdateCommentRequest) -> Self {
        Self { text: request.text }
    }
}

#[derive(Object, Debug)]
pub struct CommentResponse {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub owner_id: i32,
    pub is_active: bool,
    pub is_owner_active: bool,
    pub likes: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            post_id: comment.post_id,
            owner_id: comment.owner_id,
            is_active: comment.is_active,
            is_owner_active: comment.is_owner_active,
            likes: comment.likes,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
