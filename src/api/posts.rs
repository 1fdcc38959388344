use poem_openapi::{param::Path, param::Query, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::{helpers, BearerAuth};
use crate::coordinators::{CommentCoordinator, PostCoordinator};
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::comment::{CommentResponse, CreateCommentRequest};
use crate::types::dto::common::{MessageResponse, SetActiveRequest};
use crate::types::dto::post::{CreatePostRequest, PostResponse, UpdatePostRequest};

/// Post endpoints, including the comments of a post
pub struct PostApi {
    post_coordinator: Arc<PostCoordinator>,
    comment_coordinator: Arc<CommentCoordinator>,
    token_provider: Arc<TokenProvider>,
    page_limit_max: u64,
}

impl PostApi {
    pub fn new(
        post_coordinator: Arc<PostCoordinator>,
        comment_coordinator: Arc<CommentCoordinator>,
        token_provider: Arc<TokenProvider>,
        page_limit_max: u64,
    ) -> Self {
        Self {
            post_coordinator,
            comment_coordinator,
            token_provider,
            page_limit_max,
        }
    }
}

#[derive(Tags)]
enum PostTags {
    /// Posts
    Posts,
}

#[OpenApi(prefix_path = "/posts")]
impl PostApi {
    #[oai(path = "/", method = "post", tag = "PostTags::Posts")]
    async fn create(&self, auth: BearerAuth, body: Json<CreatePostRequest>) -> Result<Json<PostResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let post = self.post_coordinator.create_post(&ctx, &body.text).await?;
        Ok(Json(post.into()))
    }

    /// List effectively visible posts, newest first
    #[oai(path = "/", method = "get", tag = "PostTags::Posts")]
    async fn list_active(
        &self,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<PostResponse>>, ApiError> {
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let posts = self.post_coordinator.list_active_posts(page).await?;
        Ok(Json(posts.into_iter().map(Into::into).collect()))
    }

    /// List every post (superuser)
    #[oai(path = "/all", method = "get", tag = "PostTags::Posts")]
    async fn list_all(
        &self,
        auth: BearerAuth,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<PostResponse>>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let posts = self.post_coordinator.list_all_posts(&ctx, page).await?;
        Ok(Json(posts.into_iter().map(Into::into).collect()))
    }

    /// Get any post by id, hidden or not (superuser)
    #[oai(path = "/all/:id", method = "get", tag = "PostTags::Posts")]
    async fn get_by_id(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<PostResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let post = self.post_coordinator.get_post_by_id(&ctx, id.0).await?;
        Ok(Json(post.into()))
    }

    #[oai(path = "/:id", method = "get", tag = "PostTags::Posts")]
    async fn get_active(&self, id: Path<i32>) -> Result<Json<PostResponse>, ApiError> {
        let post = self.post_coordinator.get_active_post(id.0).await?;
        Ok(Json(post.into()))
    }

    /// Edit the text of your own post
    #[oai(path = "/:id", method = "patch", tag = "PostTags::Posts")]
    async fn update(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdatePostRequest>,
    ) -> Result<Json<PostResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let post = self.post_coordinator.update_post(&ctx, id.0, body.0.into()).await?;
        Ok(Json(post.into()))
    }

    /// Deactivate (owner or superuser) or activate (superuser) a post
    #[oai(path = "/:id/active", method = "put", tag = "PostTags::Posts")]
    async fn set_active(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<SetActiveRequest>,
    ) -> Result<Json<PostResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let post = self
            .post_coordinator
            .set_post_active(&ctx, id.0, body.is_active)
            .await?;
        Ok(Json(post.into()))
    }

    /// Hard-delete a post with its comments and likes (superuser)
    #[oai(path = "/:id", method = "delete", tag = "PostTags::Posts")]
    async fn delete(&self, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        self.post_coordinator.delete_post(&ctx, id.0).await?;
        Ok(Json(MessageResponse::new(format!("Post {} deleted", id.0))))
    }

    /// Comment on a visible post
    #[oai(path = "/:id/comments", method = "post", tag = "PostTags::Posts")]
    async fn create_comment(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<CreateCommentRequest>,
    ) -> Result<Json<CommentResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.token_provider, &auth)?;
        let comment = self
            .comment_coordinator
            .create_comment(&ctx, id.0, &body.text)
            .await?;
        Ok(Json(comment.into()))
    }

    /// Visible comments of a visible post, oldest first
    #[oai(path = "/:id/comments", method = "get", tag = "PostTags::Posts")]
    async fn list_comments(
        &self,
        id: Path<i32>,
        offset: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<CommentResponse>>, ApiError> {
        let page = helpers::page(offset.0, limit.0, self.page_limit_max);
        let comments = self.comment_coordinator.list_active_comments(id.0, page).await?;
        Ok(Json(comments.into_iter().map(Into::into).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{context_for, insert_user, setup_test_app_data};

    #[tokio::test]
    async fn test_list_active_accepts_any_offset() {
        let app_data = setup_test_app_data().await;
        let alice = insert_user(&app_data.db, "alice", false).await;
        let post_coordinator = Arc::new(PostCoordinator::new(app_data.clone()));
        post_coordinator
            .create_post(&context_for(&alice), "hello")
            .await
            .unwrap();
        let api = PostApi::new(
            post_coordinator,
            Arc::new(CommentCoordinator::new(app_data.clone())),
            app_data.token_provider.clone(),
            100,
        );

        let far = api.list_active(Query(Some(u64::MAX)), Query(None)).await.unwrap();
        let first = api.list_active(Query(None), Query(Some(1))).await.unwrap();

        assert!(far.is_empty());
        assert_eq!(first.len(), 1);
    }
}
