use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::{require_active, resolve_actor};
use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::providers::RelationshipProvider;
use crate::stores::{CommentStore, FollowStore, LikeStore, PostStore, UserStore};
use crate::types::db::{follow, like, user};
use crate::types::internal::access::Action;
use crate::types::internal::clock::Clock;
use crate::types::internal::context::RequestContext;
use crate::types::internal::page::Page;
use crate::types::internal::relation::LikeTarget;

/// Follow and like workflows
pub struct RelationCoordinator {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    user_store: Arc<UserStore>,
    post_store: Arc<PostStore>,
    comment_store: Arc<CommentStore>,
    like_store: Arc<LikeStore>,
    follow_store: Arc<FollowStore>,
    relationship_provider: Arc<RelationshipProvider>,
}

impl RelationCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            clock: app_data.clock.clone(),
            user_store: app_data.user_store.clone(),
            post_store: app_data.post_store.clone(),
            comment_store: app_data.comment_store.clone(),
            like_store: app_data.like_store.clone(),
            follow_store: app_data.follow_store.clone(),
            relationship_provider: app_data.relationship_provider.clone(),
        }
    }

    async fn active_user(&self, conn: &impl ConnectionTrait, username: &str) -> Result<user::Model, InternalError> {
        match self.user_store.find_by_username(conn, username).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(EntityError::username(username).into()),
        }
    }

    /// Fail with NotFound unless the target is effectively visible
    async fn ensure_visible(&self, conn: &impl ConnectionTrait, target: LikeTarget) -> Result<(), InternalError> {
        let visible = match target {
            LikeTarget::Post(id) => self
                .post_store
                .find_by_id(conn, id)
                .await?
                .is_some_and(|post| post.is_visible()),
            LikeTarget::Comment(id) => self
                .comment_store
                .find_by_id(conn, id)
                .await?
                .is_some_and(|comment| comment.is_visible()),
        };

        if visible {
            Ok(())
        } else {
            Err(match target {
                LikeTarget::Post(id) => EntityError::post(id),
                LikeTarget::Comment(id) => EntityError::comment(id),
            }
            .into())
        }
    }

    pub async fn follow(&self, ctx: &RequestContext, username: &str) -> Result<follow::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::Contribute)?;
        let target = self.active_user(&txn, username).await?;

        let edge = self
            .relationship_provider
            .follow(&txn, actor.id, target.id, &self.clock.stamp())
            .await?;

        commit_transaction(txn).await?;
        Ok(edge)
    }

    /// Remove a follow edge. The followed user may be inactive.
    pub async fn unfollow(&self, ctx: &RequestContext, username: &str) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::Contribute)?;
        let target = self.user_store.get_by_username(&txn, username).await?;

        self.relationship_provider.unfollow(&txn, actor.id, target.id).await?;

        commit_transaction(txn).await?;
        Ok(())
    }

    /// Users following `username` through visible edges
    pub async fn list_followers(&self, username: &str, page: Page) -> Result<Vec<user::Model>, InternalError> {
        let user = self.active_user(&self.db, username).await?;
        let ids = self.follow_store.visible_follower_ids(&self.db, user.id, page).await?;
        self.user_store.find_many(&self.db, &ids).await
    }

    /// Users `username` follows through visible edges
    pub async fn list_followings(&self, username: &str, page: Page) -> Result<Vec<user::Model>, InternalError> {
        let user = self.active_user(&self.db, username).await?;
        let ids = self.follow_store.visible_following_ids(&self.db, user.id, page).await?;
        self.user_store.find_many(&self.db, &ids).await
    }

    pub async fn like(&self, ctx: &RequestContext, target: LikeTarget) -> Result<like::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::Contribute)?;
        self.ensure_visible(&txn, target).await?;

        let like = self
            .relationship_provider
            .like(&txn, actor.id, target, &self.clock.stamp())
            .await?;

        commit_transaction(txn).await?;
        Ok(like)
    }

    pub async fn unlike(&self, ctx: &RequestContext, target: LikeTarget) -> Result<(), InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::Contribute)?;

        self.relationship_provider.unlike(&txn, actor.id, target).await?;

        commit_transaction(txn).await?;
        Ok(())
    }

    /// Users behind the visible likes of a visible target
    pub async fn list_likes(&self, target: LikeTarget, page: Page) -> Result<Vec<user::Model>, InternalError> {
        self.ensure_visible(&self.db, target).await?;

        let likes = self.like_store.list_visible(&self.db, target, page).await?;
        let owner_ids: Vec<i32> = likes.iter().map(|like| like.owner_id).collect();
        self.user_store.find_many(&self.db, &owner_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::RelationError;
    use crate::test::utils::{context_for, insert_post, insert_user, setup_test_app_data};

    #[tokio::test]
    async fn test_follow_inactive_user_is_not_found() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;
        app_data.user_store.set_active(db, bob.id, false, "2025/03/01 12:00").await.unwrap();
        let coordinator = RelationCoordinator::new(app_data);

        let result = coordinator.follow(&context_for(&alice), "bob").await;

        assert!(result.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_follow_lists_both_directions() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        insert_user(db, "bob", false).await;
        let coordinator = RelationCoordinator::new(app_data);

        coordinator.follow(&context_for(&alice), "bob").await.unwrap();

        let followers = coordinator.list_followers("bob", Page::default()).await.unwrap();
        let followings = coordinator.list_followings("alice", Page::default()).await.unwrap();
        assert_eq!(followers.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(), ["alice"]);
        assert_eq!(followings.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(), ["bob"]);
    }

    #[tokio::test]
    async fn test_duplicate_follow_keeps_single_edge() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;
        let coordinator = RelationCoordinator::new(app_data.clone());

        coordinator.follow(&context_for(&alice), "bob").await.unwrap();
        let second = coordinator.follow(&context_for(&alice), "bob").await;

        assert!(matches!(
            second,
            Err(InternalError::Relation(RelationError::DuplicateRelation { .. }))
        ));
        assert_eq!(app_data.user_store.get_by_id(db, bob.id).await.unwrap().followers, 1);
    }

    #[tokio::test]
    async fn test_like_hidden_post_is_not_found() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let post = insert_post(db, alice.id, "hello").await;
        app_data.post_store.set_active(db, post.id, false, "2025/03/01 12:00").await.unwrap();
        let coordinator = RelationCoordinator::new(app_data);

        let result = coordinator.like(&context_for(&alice), LikeTarget::Post(post.id)).await;

        assert!(result.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_list_likes_returns_likers() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;
        let post = insert_post(db, alice.id, "hello").await;
        let coordinator = RelationCoordinator::new(app_data);
        let target = LikeTarget::Post(post.id);

        coordinator.like(&context_for(&alice), target).await.unwrap();
        coordinator.like(&context_for(&bob), target).await.unwrap();
        coordinator.unlike(&context_for(&alice), target).await.unwrap();

        let likers = coordinator.list_likes(target, Page::default()).await.unwrap();
        assert_eq!(likers.len(), 1);
        assert_eq!(likers[0].id, bob.id);
    }
}
