use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::{principal_of, require_active, resolve_actor};
use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::providers::{AccessPolicy, CascadeProvider, CounterProvider};
use crate::stores::{CommentStore, LikeStore, PostStore, UserStore};
use crate::types::db::comment;
use crate::types::internal::access::Action;
use crate::types::internal::cascade::RootTransition;
use crate::types::internal::clock::Clock;
use crate::types::internal::context::RequestContext;
use crate::types::internal::page::Page;
use crate::types::internal::relation::LikeTarget;
use crate::types::internal::updates::CommentUpdate;

pub struct CommentCoordinator {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    user_store: Arc<UserStore>,
    post_store: Arc<PostStore>,
    comment_store: Arc<CommentStore>,
    like_store: Arc<LikeStore>,
    counter_provider: Arc<CounterProvider>,
    cascade_provider: Arc<CascadeProvider>,
    access_policy: Arc<AccessPolicy>,
}

impl CommentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            clock: app_data.clock.clone(),
            user_store: app_data.user_store.clone(),
            post_store: app_data.post_store.clone(),
            comment_store: app_data.comment_store.clone(),
            like_store: app_data.like_store.clone(),
            counter_provider: app_data.counter_provider.clone(),
            cascade_provider: app_data.cascade_provider.clone(),
            access_policy: app_data.access_policy.clone(),
        }
    }

    /// Comment on an effectively visible post
    pub async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: i32,
        text: &str,
    ) -> Result<comment::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::Contribute)?;
        match self.post_store.find_by_id(&txn, post_id).await? {
            Some(post) if post.is_visible() => {}
            _ => return Err(EntityError::post(post_id).into()),
        }

        let comment = self
            .comment_store
            .create_comment(&txn, post_id, actor.id, actor.is_active, text, &self.clock.stamp())
            .await?;
        self.counter_provider.refresh_post_comments(&txn, post_id).await?;
        self.counter_provider.refresh_user_comments(&txn, actor.id).await?;

        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            comment_id = comment.id,
            post_id,
            owner_id = actor.id,
            "Comment created"
        );
        Ok(comment)
    }

    /// Visible comments of a visible post
    pub async fn list_active_comments(&self, post_id: i32, page: Page) -> Result<Vec<comment::Model>, InternalError> {
        match self.post_store.find_by_id(&self.db, post_id).await? {
            Some(post) if post.is_visible() => {}
            _ => return Err(EntityError::post(post_id).into()),
        }

        self.comment_store.list_active_by_post(&self.db, post_id, page).await
    }

    pub async fn list_all_comments(&self, ctx: &RequestContext, page: Page) -> Result<Vec<comment::Model>, InternalError> {
        let actor = resolve_actor(&self.user_store, &self.db, ctx).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::ReadPrivate, None)?;

        self.comment_store.list_all(&self.db, page).await
    }

    pub async fn get_comment_by_id(&self, ctx: &RequestContext, id: i32) -> Result<comment::Model, InternalError> {
        let actor = resolve_actor(&self.user_store, &self.db, ctx).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::ReadPrivate, None)?;

        self.comment_store.get_by_id(&self.db, id).await
    }

    pub async fn update_comment(
        &self,
        ctx: &RequestContext,
        id: i32,
        update: CommentUpdate,
    ) -> Result<comment::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::UpdateCommentText)?;
        let comment = self.comment_store.get_by_id(&txn, id).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::UpdateCommentText, Some(comment.owner_id))?;

        let comment = self
            .comment_store
            .update_comment(&txn, id, &update, &self.clock.stamp())
            .await?;

        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, comment_id = id, "Comment updated");
        Ok(comment)
    }

    pub async fn set_comment_active(
        &self,
        ctx: &RequestContext,
        id: i32,
        active: bool,
    ) -> Result<comment::Model, InternalError> {
        let action = if active {
            Action::ActivateComment
        } else {
            Action::DeactivateComment
        };

        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, action)?;
        let comment = self.comment_store.get_by_id(&txn, id).await?;
        self.access_policy
            .authorize(&principal_of(&actor), action, Some(comment.owner_id))?;

        self.cascade_provider
            .transition(&txn, RootTransition::comment(id, active), &self.clock.stamp())
            .await?;
        let comment = self.comment_store.get_by_id(&txn, id).await?;

        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, comment_id = id, active, "Comment activation changed");
        Ok(comment)
    }

    /// Hard-delete a comment and its likes
    pub async fn delete_comment(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::DeleteComment)?;
        let comment = self.comment_store.get_by_id(&txn, id).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::DeleteComment, Some(comment.owner_id))?;

        let likes = self
            .like_store
            .delete_by_target(&txn, LikeTarget::Comment(id))
            .await?;
        self.comment_store.delete_comment(&txn, id).await?;

        self.counter_provider.refresh_post_comments(&txn, comment.post_id).await?;
        self.counter_provider.refresh_user_comments(&txn, comment.owner_id).await?;

        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, comment_id = id, likes, "Comment deleted");
        Ok(())
    }
}
