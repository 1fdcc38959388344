use poem_openapi::Object;

use crate::types::db::{follow, like};

#[derive(Object, Debug)]
pub struct FollowResponse {
    pub follower_id: i32,
    pub following_id: i32,
    pub created_at: String,
}

impl From<follow::Model> for FollowResponse {
    fn from(edge: follow::Model) -> Self {
        Self {
            follower_id: edge.follower_id,
            following_id: edge.following_id,
            created_at: edge.created_at,
        }
    }
}

/// A like on exactly one of a post or a comment
#[derive(Object, Debug)]
pub struct LikeResponse {
    pub id: i32,
    pub owner_id: i32,
    pub post_id: Option<i32>,
    pub comment_id: Option<i32>,
    pub created_at: String,
}

impl From<like::Model> for LikeResponse {
    fn from(like: like::Model) -> Self {
        Self {
            id: like.id,
            owner_id: like.owner_id,
            post_id: like.post_id,
            comment_id: like.comment_id,
            created_at: like.created_at,
        }
    }
}
