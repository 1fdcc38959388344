use sea_orm::ConnectionTrait;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::RelationError;
use crate::providers::CounterProvider;
use crate::stores::{CommentStore, FollowStore, LikeMirrors, LikeStore, PostStore, UserStore};
use crate::types::db::{follow, like};
use crate::types::internal::relation::LikeTarget;

/// Social-graph invariants on top of the like and follow stores.
///
/// Every successful mutation refreshes the counters it affects before
/// returning.
pub struct RelationshipProvider {
    user_store: Arc<UserStore>,
    post_store: Arc<PostStore>,
    comment_store: Arc<CommentStore>,
    like_store: Arc<LikeStore>,
    follow_store: Arc<FollowStore>,
    counter_provider: Arc<CounterProvider>,
}

impl RelationshipProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        post_store: Arc<PostStore>,
        comment_store: Arc<CommentStore>,
        like_store: Arc<LikeStore>,
        follow_store: Arc<FollowStore>,
        counter_provider: Arc<CounterProvider>,
    ) -> Self {
        Self {
            user_store,
            post_store,
            comment_store,
            like_store,
            follow_store,
            counter_provider,
        }
    }

    /// Create a follow edge. Both users are expected to be active.
    ///
    /// # Errors
    /// * `RelationError::SelfReference` - `follower_id == following_id`
    /// * `RelationError::DuplicateRelation` - edge already exists
    pub async fn follow(
        &self,
        conn: &impl ConnectionTrait,
        follower_id: i32,
        following_id: i32,
        now: &str,
    ) -> Result<follow::Model, InternalError> {
        if follower_id == following_id {
            tracing::warn!(user_id = follower_id, "Rejected self-follow");
            return Err(RelationError::SelfReference { user_id: follower_id }.into());
        }

        if self.follow_store.find_pair(conn, follower_id, following_id).await?.is_some() {
            tracing::warn!(follower_id, following_id, "Rejected duplicate follow");
            return Err(RelationError::duplicate(format!(
                "follow from user {follower_id} to user {following_id}"
            ))
            .into());
        }

        let edge = self
            .follow_store
            .create_follow(conn, follower_id, following_id, true, true, now)
            .await?;

        self.counter_provider.refresh_user_follows(conn, follower_id).await?;
        self.counter_provider.refresh_user_follows(conn, following_id).await?;

        tracing::info!(follower_id, following_id, "Follow created");
        Ok(edge)
    }

    /// # Errors
    /// * `RelationError::NotFound` - no edge for the ordered pair
    pub async fn unfollow(
        &self,
        conn: &impl ConnectionTrait,
        follower_id: i32,
        following_id: i32,
    ) -> Result<(), InternalError> {
        let edge = self
            .follow_store
            .find_pair(conn, follower_id, following_id)
            .await?
            .ok_or_else(|| {
                RelationError::not_found(format!(
                    "follow from user {follower_id} to user {following_id}"
                ))
            })?;

        self.follow_store.delete_follow(conn, edge.id).await?;

        self.counter_provider.refresh_user_follows(conn, follower_id).await?;
        self.counter_provider.refresh_user_follows(conn, following_id).await?;

        tracing::info!(follower_id, following_id, "Follow removed");
        Ok(())
    }

    /// Mirror values for a new like, read from current state
    async fn current_mirrors(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
        target: LikeTarget,
    ) -> Result<LikeMirrors, InternalError> {
        let owner = self.user_store.get_by_id(conn, owner_id).await?;

        let (target_active, target_owner_id) = match target {
            LikeTarget::Post(id) => {
                let post = self.post_store.get_by_id(conn, id).await?;
                (post.is_active, post.owner_id)
            }
            LikeTarget::Comment(id) => {
                let comment = self.comment_store.get_by_id(conn, id).await?;
                (comment.is_active, comment.owner_id)
            }
        };
        let target_owner = self.user_store.get_by_id(conn, target_owner_id).await?;

        Ok(LikeMirrors {
            owner_active: owner.is_active,
            target_active,
            target_owner_active: target_owner.is_active,
        })
    }

    /// # Errors
    /// * `EntityError::NotFound` - owner or target does not exist
    /// * `RelationError::DuplicateRelation` - owner already likes the target
    pub async fn like(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
        target: LikeTarget,
        now: &str,
    ) -> Result<like::Model, InternalError> {
        if self
            .like_store
            .find_by_owner_and_target(conn, owner_id, target)
            .await?
            .is_some()
        {
            tracing::warn!(owner_id, %target, "Rejected duplicate like");
            return Err(RelationError::duplicate(format!("like by user {owner_id} on {target}")).into());
        }

        let mirrors = self.current_mirrors(conn, owner_id, target).await?;
        let like = self
            .like_store
            .create_like(conn, owner_id, target, mirrors, now)
            .await?;

        self.counter_provider.refresh_likes(conn, target).await?;

        tracing::info!(owner_id, %target, "Like created");
        Ok(like)
    }

    /// # Errors
    /// * `RelationError::NotFound` - owner has no like on the target
    pub async fn unlike(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
        target: LikeTarget,
    ) -> Result<(), InternalError> {
        let like = self
            .like_store
            .find_by_owner_and_target(conn, owner_id, target)
            .await?
            .ok_or_else(|| RelationError::not_found(format!("like by user {owner_id} on {target}")))?;

        self.like_store.delete_like(conn, like.id).await?;
        self.counter_provider.refresh_likes(conn, target).await?;

        tracing::info!(owner_id, %target, "Like removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_comment, insert_post, insert_user, setup_test_app_data};

    const NOW: &str = "2025/03/01 12:00";

    #[tokio::test]
    async fn test_follow_refreshes_both_users() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;

        let edge = app_data.relationship_provider.follow(db, alice.id, bob.id, NOW).await.unwrap();

        assert!(edge.is_visible());
        let alice = app_data.user_store.get_by_id(db, alice.id).await.unwrap();
        let bob = app_data.user_store.get_by_id(db, bob.id).await.unwrap();
        assert_eq!(alice.followings, 1);
        assert_eq!(bob.followers, 1);
    }

    #[tokio::test]
    async fn test_self_follow_is_rejected() {
        let app_data = setup_test_app_data().await;
        let alice = insert_user(&app_data.db, "alice", false).await;

        let result = app_data
            .relationship_provider
            .follow(&app_data.db, alice.id, alice.id, NOW)
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Relation(RelationError::SelfReference { .. }))
        ));
    }

    #[tokio::test]
    async fn test_reverse_follow_is_a_distinct_edge() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;

        app_data.relationship_provider.follow(db, alice.id, bob.id, NOW).await.unwrap();
        let reverse = app_data.relationship_provider.follow(db, bob.id, alice.id, NOW).await;

        assert!(reverse.is_ok());
    }

    #[tokio::test]
    async fn test_unfollow_missing_edge_is_not_found() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;

        let result = app_data.relationship_provider.unfollow(db, alice.id, bob.id).await;

        assert!(matches!(
            result,
            Err(InternalError::Relation(RelationError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unlike_missing_like_is_not_found() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;
        let post = insert_post(db, bob.id, "hello").await;
        let comment = insert_comment(db, post.id, bob.id, "hi").await;

        for target in [LikeTarget::Post(post.id), LikeTarget::Comment(comment.id)] {
            let result = app_data.relationship_provider.unlike(db, alice.id, target).await;

            assert!(
                matches!(result, Err(InternalError::Relation(RelationError::NotFound { .. }))),
                "unlike on {target} without a like"
            );
        }

        // bob's like does not count as alice's
        app_data
            .relationship_provider
            .like(db, bob.id, LikeTarget::Post(post.id), NOW)
            .await
            .unwrap();
        let result = app_data
            .relationship_provider
            .unlike(db, alice.id, LikeTarget::Post(post.id))
            .await;
        assert!(matches!(
            result,
            Err(InternalError::Relation(RelationError::NotFound { .. }))
        ));
        assert_eq!(app_data.post_store.get_by_id(db, post.id).await.unwrap().likes, 1);
    }

    #[tokio::test]
    async fn test_like_copies_current_mirrors() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;
        let post = insert_post(db, bob.id, "hello").await;
        let comment = insert_comment(db, post.id, bob.id, "hi").await;
        app_data.comment_store.set_active(db, comment.id, false, NOW).await.unwrap();

        let like = app_data
            .relationship_provider
            .like(db, alice.id, LikeTarget::Comment(comment.id), NOW)
            .await
            .unwrap();

        assert!(like.is_owner_active);
        assert!(!like.is_comment_active);
        assert!(like.is_comment_owner_active);
        assert!(like.is_post_active);
        assert!(like.is_post_owner_active);
        assert!(!like.is_visible());
        let comment = app_data.comment_store.get_by_id(db, comment.id).await.unwrap();
        assert_eq!(comment.likes, 0);
    }

    #[tokio::test]
    async fn test_like_on_missing_target_is_not_found() {
        let app_data = setup_test_app_data().await;
        let alice = insert_user(&app_data.db, "alice", false).await;

        let result = app_data
            .relationship_provider
            .like(&app_data.db, alice.id, LikeTarget::Post(404), NOW)
            .await;

        assert!(result.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_unlike_then_like_again() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let post = insert_post(db, alice.id, "hello").await;
        let target = LikeTarget::Post(post.id);

        app_data.relationship_provider.like(db, alice.id, target, NOW).await.unwrap();
        app_data.relationship_provider.unlike(db, alice.id, target).await.unwrap();
        assert_eq!(app_data.post_store.get_by_id(db, post.id).await.unwrap().likes, 0);

        app_data.relationship_provider.like(db, alice.id, target, NOW).await.unwrap();
        assert_eq!(app_data.post_store.get_by_id(db, post.id).await.unwrap().likes, 1);
    }
}
