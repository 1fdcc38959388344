use poem_openapi::{param::Path, param::Query, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{helpers, BearerAuth};
use crate::coordinators::CommentCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::comment::{CommentResponse, UpdateCommentRequest};
use crate::types::dto::common::{MessageResponse, SetActiveRequest};

pub struct CommentApi {
    comment_coordinator: Arc<CommentCoordinator>,
    token_provider: Arc<TokenProvider>,
    page_limit_max: u64,
}

impl CommentApi {
    pub fn new(
        comment_coordinator: Arc<CommentCoordinator>,
        token_provider: Arc<TokenProvider>,
        page_limit_max: u64,
    ) -> Self {
        Self {
            comment_coordinator,
            token_provider,
            page_limit_max,
        }
    }
}

#[derive(Tags)]
enum CommentTags {
    /// Comments
    Comments,
}

#[OpenApi(prefix_path = "/comments")]
impl CommentApi {
    /// List every comment (superuser)
    #[oai(path = "/all", method = "get", tag = "CommentTags::Comments")]
    async fn list_all(
        &self,
        auth: BearerAuth,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<CommentResponse>>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let comments = self.comment_coordinator.list_all_comments(&ctx, page).await?;
        Ok(Json(comments.into_iter().map(Into::into).collect()))
    }

    /// Get any comment by id (superuser)
    #[oai(path = "/all/:id", method = "get", tag = "CommentTags::Comments")]
    async fn get_by_id(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<CommentResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let comment = self.comment_coordinator.get_comment_by_id(&ctx, id.0).await?;
        Ok(Json(comment.into()))
    }

    /// Edit the text of your own comment
    #[oai(path = "/:id", method = "patch", tag = "CommentTags::Comments")]
    async fn update(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateCommentRequest>,
    ) -> Result<Json<CommentResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let comment = self
            .comment_coordinator
            .update_comment(&ctx, id.0, body.0.into())
            .await?;
        Ok(Json(comment.into()))
    }

    /// Activate or deactivate a comment (owner or superuser)
    #[oai(path = "/:id/active", method = "put", tag = "CommentTags::Comments")]
    async fn set_active(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<SetActiveRequest>,
    ) -> Result<Json<CommentResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let comment = self
            .comment_coordinator
            .set_comment_active(&ctx, id.0, body.is_active)
            .await?;
        Ok(Json(comment.into()))
    }

    /// Hard-delete a comment and its likes (superuser)
    #[oai(path = "/:id", method = "delete", tag = "CommentTags::Comments")]
    async fn delete(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        self.comment_coordinator.delete_comment(&ctx, id.0).await?;
        Ok(Json(MessageResponse::new(format!("Comment {} deleted", id.0))))
    }
}
