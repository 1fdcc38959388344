use poem_openapi::{param::Path, param::Query, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{helpers, BearerAuth};
use crate::coordinators::RelationCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::relation::{FollowResponse, LikeResponse};
use crate::types::dto::user::UserResponse;
use crate::types::internal::relation::LikeTarget;

/// Follow and like endpoints
pub struct RelationApi {
    relation_coordinator: Arc<RelationCoordinator>,
    token_provider: Arc<TokenProvider>,
    page_limit_max: u64,
}

impl RelationApi {
    pub fn new(
        relation_coordinator: Arc<RelationCoordinator>,
        token_provider: Arc<TokenProvider>,
        page_limit_max: u64,
    ) -> Self {
        Self {
            relation_coordinator,
            token_provider,
            page_limit_max,
        }
    }

    async fn like_target(&self, auth: BearerAuth, target: LikeTarget) -> Result<Json<LikeResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let like = self.relation_coordinator.like(&ctx, target).await?;
        Ok(Json(like.into()))
    }

    async fn unlike_target(&self, auth: BearerAuth, target: LikeTarget) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        self.relation_coordinator.unlike(&ctx, target).await?;
        Ok(Json(MessageResponse::new(format!("Like on {} removed", target))))
    }

    async fn likers(
        &self,
        target: LikeTarget,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let page = helpers::page(offset, limit, self.page_limit_max);
        let users = self.relation_coordinator.list_likes(target, page).await?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }
}

#[derive(Tags)]
enum RelationTags {
    /// Follows between users
    Follows,
    /// Likes on posts and comments
    Likes,
}

#[OpenApi]
impl RelationApi {
    /// Follow an active user
    #[oai(path = "/users/:username/follow", method = "post", tag = "RelationTags::Follows")]
    async fn follow(&self, auth: BearerAuth, username: Path<String>) -> Result<Json<FollowResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let edge = self.relation_coordinator.follow(&ctx, &username.0).await?;
        Ok(Json(edge.into()))
    }

    #[oai(path = "/users/:username/follow", method = "delete", tag = "RelationTags::Follows")]
    async fn unfollow(&self, auth: BearerAuth, username: Path<String>) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        self.relation_coordinator.unfollow(&ctx, &username.0).await?;
        Ok(Json(MessageResponse::new(format!("Unfollowed {}", username.0))))
    }

    #[oai(path = "/users/:username/followers", method = "get", tag = "RelationTags::Follows")]
    async fn followers(
        &self,
        username: Path<String>,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let users = self.relation_coordinator.list_followers(&username.0, page).await?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/users/:username/followings", method = "get", tag = "RelationTags::Follows")]
    async fn followings(
        &self,
        username: Path<String>,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let users = self.relation_coordinator.list_followings(&username.0, page).await?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/posts/:id/likes", method = "post", tag = "RelationTags::Likes")]
    async fn like_post(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<LikeResponse>, ApiError> {
        self.like_target(auth, LikeTarget::Post(id.0)).await
    }

    #[oai(path = "/posts/:id/likes", method = "delete", tag = "RelationTags::Likes")]
    async fn unlike_post(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
        self.unlike_target(auth, LikeTarget::Post(id.0)).await
    }

    /// Users with a visible like on the post
    #[oai(path = "/posts/:id/likes", method = "get", tag = "RelationTags::Likes")]
    async fn post_likes(
        &self,
        id: Path<i32>,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.likers(LikeTarget::Post(id.0), offset.0, limit.0).await
    }

    #[oai(path = "/comments/:id/likes", method = "post", tag = "RelationTags::Likes")]
    async fn like_comment(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<LikeResponse>, ApiError> {
        self.like_target(auth, LikeTarget::Comment(id.0)).await
    }

    #[oai(path = "/comments/:id/likes", method = "delete", tag = "RelationTags::Likes")]
    async fn unlike_comment(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
        self.unlike_target(auth, LikeTarget::Comment(id.0)).await
    }

    /// Users with a visible like on the comment
    #[oai(path = "/comments/:id/likes", method = "get", tag = "RelationTags::Likes")]
    async fn comment_likes(
        &self,
        id: Path<i32>,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.likers(LikeTarget::Comment(id.0), offset.0, limit.0).await
    }
}
