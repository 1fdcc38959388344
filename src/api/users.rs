use poem_openapi::{param::Path, param::Query, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{helpers, BearerAuth};
use crate::coordinators::{PostCoordinator, UserCoordinator};
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::common::SetActiveRequest;
use crate::types::dto::post::PostResponse;
use crate::types::dto::user::{UpdateProfileRequest, UserResponse};

/// User account endpoints
pub struct UserApi {
    user_coordinator: Arc<UserCoordinator>,
    post_coordinator: Arc<PostCoordinator>,
    token_provider: Arc<TokenProvider>,
    page_limit_max: u64,
}

impl UserApi {
    pub fn new(
        user_coordinator: Arc<UserCoordinator>,
        post_coordinator: Arc<PostCoordinator>,
        token_provider: Arc<TokenProvider>,
        page_limit_max: u64,
    ) -> Self {
        Self {
            user_coordinator,
            post_coordinator,
            token_provider,
            page_limit_max,
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// User accounts
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UserApi {
    /// List active users
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list_active(
        &self,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let users = self.user_coordinator.list_active_users(page).await?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    /// List every user, active or not (superuser)
    #[oai(path = "/all", method = "get", tag = "UserTags::Users")]
    async fn list_all(
        &self,
        auth: BearerAuth,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let users = self.user_coordinator.list_all_users(&ctx, page).await?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    /// Get any user by internal id (superuser)
    #[oai(path = "/all/:id", method = "get", tag = "UserTags::Users")]
    async fn get_by_id(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let user = self.user_coordinator.get_user_by_id(&ctx, id.0).await?;
        Ok(Json(user.into()))
    }

    /// Get an active user by username
    #[oai(path = "/:username", method = "get", tag = "UserTags::Users")]
    async fn get_active(&self, username: Path<String>) -> Result<Json<UserResponse>, ApiError> {
        let user = self.user_coordinator.get_active_user(&username.0).await?;
        Ok(Json(user.into()))
    }

    /// Update your own name or bio
    #[oai(path = "/:username", method = "patch", tag = "UserTags::Users")]
    async fn update_profile(
        &self,
        auth: BearerAuth,
        username: Path<String>,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let user = self
            .user_coordinator
            .update_profile(&ctx, &username.0, body.0.into())
            .await?;
        Ok(Json(user.into()))
    }

    /// Activate or deactivate an account (self or superuser)
    #[oai(path = "/:username/active", method = "put", tag = "UserTags::Users")]
    async fn set_active(
        &self,
        auth: BearerAuth,
        username: Path<String>,
        body: Json<SetActiveRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let user = self
            .user_coordinator
            .set_active(&ctx, &username.0, body.is_active)
            .await?;
        Ok(Json(user.into()))
    }

    /// Visible posts of an active user
    #[oai(path = "/:username/posts", method = "get", tag = "UserTags::Users")]
    async fn list_posts(
        &self,
        username: Path<String>,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<PostResponse>>, ApiError> {
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let posts = self
            .post_coordinator
            .list_active_posts_by_user(&username.0, page)
            .await?;
        Ok(Json(posts.into_iter().map(Into::into).collect()))
    }
}
