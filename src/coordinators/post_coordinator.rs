use sea_orm::DatabaseConnection;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::{principal_of, require_active, resolve_actor};
use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::providers::{AccessPolicy, CascadeProvider, CounterProvider};
use crate::stores::{CommentStore, LikeStore, PostStore, UserStore};
use crate::types::db::post;
use crate::types::internal::access::Action;
use crate::types::internal::cascade::RootTransition;
use crate::types::internal::clock::Clock;
use crate::types::internal::context::RequestContext;
use crate::types::internal::page::Page;
use crate::types::internal::relation::LikeTarget;
use crate::types::internal::updates::PostUpdate;

pub struct PostCoordinator {
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

impl PostCoordinator {
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

    pub async fn create_post(&self, ctx: &RequestContext, text: &str) -> Result<post::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::Contribute)?;

        let post = self
            .post_store
            .create_post(&txn, actor.id, actor.is_active, text, &self.clock.stamp())
            .await?;
        self.counter_provider.refresh_user_posts(&txn, actor.id).await?;

        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, post_id = post.id, owner_id = actor.id, "Post created");
        Ok(post)
    }

    /// # Errors
    /// * `EntityError::NotFound` - missing or not effectively visible
    pub async fn get_active_post(&self, id: i32) -> Result<post::Model, InternalError> {
        match self.post_store.find_by_id(&self.db, id).await? {
            Some(post) if post.is_visible() => Ok(post),
            _ => Err(EntityError::post(id).into()),
        }
    }

    pub async fn list_active_posts(&self, page: Page) -> Result<Vec<post::Model>, InternalError> {
        self.post_store.list_active(&self.db, page).await
    }

    /// Visible posts of an active user
    pub async fn list_active_posts_by_user(&self, username: &str, page: Page) -> Result<Vec<post::Model>, InternalError> {
        let owner = match self.user_store.find_by_username(&self.db, username).await? {
            Some(user) if user.is_active => user,
            _ => return Err(EntityError::username(username).into()),
        };

        self.post_store.list_active_by_owner(&self.db, owner.id, page).await
    }

    pub async fn list_all_posts(&self, ctx: &RequestContext, page: Page) -> Result<Vec<post::Model>, InternalError> {
        let actor = resolve_actor(&self.user_store, &self.db, ctx).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::ReadPrivate, None)?;

        self.post_store.list_all(&self.db, page).await
    }

    pub async fn get_post_by_id(&self, ctx: &RequestContext, id: i32) -> Result<post::Model, InternalError> {
        let actor = resolve_actor(&self.user_store, &self.db, ctx).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::ReadPrivate, None)?;

        self.post_store.get_by_id(&self.db, id).await
    }

    pub async fn update_post(
        &self,
        ctx: &RequestContext,
        id: i32,
        update: PostUpdate,
    ) -> Result<post::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::UpdatePostText)?;
        let post = self.post_store.get_by_id(&txn, id).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::UpdatePostText, Some(post.owner_id))?;

        let post = self
            .post_store
            .update_post(&txn, id, &update, &self.clock.stamp())
            .await?;

        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, post_id = id, "Post updated");
        Ok(post)
    }

    /// Activate (superuser) or deactivate (owner or superuser) a post
    pub async fn set_post_active(
        &self,
        ctx: &RequestContext,
        id: i32,
        active: bool,
    ) -> Result<post::Model, InternalError> {
        let action = if active {
            Action::ActivatePost
        } else {
            Action::DeactivatePost
        };

        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, action)?;
        let post = self.post_store.get_by_id(&txn, id).await?;
        self.access_policy
            .authorize(&principal_of(&actor), action, Some(post.owner_id))?;

        self.cascade_provider
            .transition(&txn, RootTransition::post(id, active), &self.clock.stamp())
            .await?;
        let post = self.post_store.get_by_id(&txn, id).await?;

        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, post_id = id, active, "Post activation changed");
        Ok(post)
    }

    /// Hard-delete a post with its comments and every like on either
    pub async fn delete_post(&self, ctx: &RequestContext, id: i32) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::DeletePost)?;
        let post = self.post_store.get_by_id(&txn, id).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::DeletePost, Some(post.owner_id))?;

        let comment_ids = self.comment_store.ids_by_post(&txn, id).await?;
        let comment_owners: BTreeSet<i32> = self
            .comment_store
            .owner_ids_by_post(&txn, id)
            .await?
            .into_iter()
            .collect();

        let comment_likes = self.like_store.delete_by_comments(&txn, &comment_ids).await?;
        let post_likes = self.like_store.delete_by_target(&txn, LikeTarget::Post(id)).await?;
        let comments = self.comment_store.delete_by_post(&txn, id).await?;
        self.post_store.delete_post(&txn, id).await?;

        self.counter_provider.refresh_user_posts(&txn, post.owner_id).await?;
        for owner_id in comment_owners {
            self.counter_provider.refresh_user_comments(&txn, owner_id).await?;
        }

        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            post_id = id,
            comments,
            likes = post_likes + comment_likes,
            "Post deleted"
        );
        Ok(())
    }
}
