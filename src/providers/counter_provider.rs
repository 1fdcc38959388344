use sea_orm::ConnectionTrait;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CascadeError;
use crate::stores::{
    CommentStore, FollowStore, LikeStore, PostCounter, PostStore, UserCounter, UserStore,
};
use crate::types::internal::cascade::RefreshSet;
use crate::types::internal::relation::LikeTarget;

fn as_counter(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Recomputes denormalized counters from the visibility predicates.
///
/// Counts are always rescanned, never adjusted by deltas. The `*_count`
/// methods only read; the `refresh_*` methods write the result back and
/// return it.
pub struct CounterProvider {
    user_store: Arc<UserStore>,
    post_store: Arc<PostStore>,
    comment_store: Arc<CommentStore>,
    like_store: Arc<LikeStore>,
    follow_store: Arc<FollowStore>,
}

impl CounterProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        post_store: Arc<PostStore>,
        comment_store: Arc<CommentStore>,
        like_store: Arc<LikeStore>,
        follow_store: Arc<FollowStore>,
    ) -> Self {
        Self {
            user_store,
            post_store,
            comment_store,
            like_store,
            follow_store,
        }
    }

    pub async fn posts_count(&self, conn: &impl ConnectionTrait, owner_id: i32) -> Result<i64, InternalError> {
        Ok(as_counter(self.post_store.count_visible_by_owner(conn, owner_id).await?))
    }

    pub async fn comments_count(&self, conn: &impl ConnectionTrait, post_id: i32) -> Result<i64, InternalError> {
        Ok(as_counter(self.comment_store.count_visible_by_post(conn, post_id).await?))
    }

    pub async fn user_comments_count(&self, conn: &impl ConnectionTrait, owner_id: i32) -> Result<i64, InternalError> {
        Ok(as_counter(self.comment_store.count_visible_by_owner(conn, owner_id).await?))
    }

    pub async fn likes_count(&self, conn: &impl ConnectionTrait, target: LikeTarget) -> Result<i64, InternalError> {
        Ok(as_counter(self.like_store.count_visible(conn, target).await?))
    }

    pub async fn followers_count(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<i64, InternalError> {
        Ok(as_counter(self.follow_store.count_visible_followers(conn, user_id).await?))
    }

    pub async fn followings_count(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<i64, InternalError> {
        Ok(as_counter(self.follow_store.count_visible_followings(conn, user_id).await?))
    }

    pub async fn refresh_user_posts(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<i64, InternalError> {
        let count = self.posts_count(conn, user_id).await?;
        self.user_store.write_counter(conn, user_id, UserCounter::Posts, count).await?;
        Ok(count)
    }

    pub async fn refresh_user_comments(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<i64, InternalError> {
        let count = self.user_comments_count(conn, user_id).await?;
        self.user_store.write_counter(conn, user_id, UserCounter::Comments, count).await?;
        Ok(count)
    }

    /// Refresh both `followers` and `followings` of a user
    pub async fn refresh_user_follows(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<(), InternalError> {
        let followers = self.followers_count(conn, user_id).await?;
        self.user_store.write_counter(conn, user_id, UserCounter::Followers, followers).await?;

        let followings = self.followings_count(conn, user_id).await?;
        self.user_store.write_counter(conn, user_id, UserCounter::Followings, followings).await?;

        Ok(())
    }

    pub async fn refresh_post_comments(&self, conn: &impl ConnectionTrait, post_id: i32) -> Result<i64, InternalError> {
        let count = self.comments_count(conn, post_id).await?;
        self.post_store.write_counter(conn, post_id, PostCounter::Comments, count).await?;
        Ok(count)
    }

    pub async fn refresh_likes(&self, conn: &impl ConnectionTrait, target: LikeTarget) -> Result<i64, InternalError> {
        let count = self.likes_count(conn, target).await?;
        match target {
            LikeTarget::Post(id) => {
                self.post_store.write_counter(conn, id, PostCounter::Likes, count).await?
            }
            LikeTarget::Comment(id) => self.comment_store.write_likes(conn, id, count).await?,
        }
        Ok(count)
    }

    /// Refresh every counter named in `set`
    pub async fn refresh(&self, conn: &impl ConnectionTrait, set: &RefreshSet) -> Result<(), InternalError> {
        if set.is_empty() {
            return Ok(());
        }

        for &id in &set.user_posts {
            self.refresh_user_posts(conn, id).await?;
        }
        for &id in &set.user_comments {
            self.refresh_user_comments(conn, id).await?;
        }
        for &id in &set.user_follows {
            self.refresh_user_follows(conn, id).await?;
        }
        for &id in &set.post_comments {
            self.refresh_post_comments(conn, id).await?;
        }
        for &id in &set.post_likes {
            self.refresh_likes(conn, LikeTarget::Post(id)).await?;
        }
        for &id in &set.comment_likes {
            self.refresh_likes(conn, LikeTarget::Comment(id)).await?;
        }

        tracing::debug!(
            users = set.user_posts.len() + set.user_follows.len(),
            posts = set.post_comments.len() + set.post_likes.len(),
            comments = set.comment_likes.len(),
            "Counters refreshed"
        );

        Ok(())
    }

    /// Compare every stored counter in `set` with its recomputed value.
    ///
    /// Rows that no longer exist are skipped.
    ///
    /// # Errors
    /// * `CascadeError::InvariantViolation` - first mismatching counter
    pub async fn verify(&self, conn: &impl ConnectionTrait, set: &RefreshSet) -> Result<(), InternalError> {
        let user_ids = set
            .user_posts
            .iter()
            .chain(&set.user_comments)
            .chain(&set.user_follows);
        for &id in user_ids {
            let Some(user) = self.user_store.find_by_id(conn, id).await? else {
                continue;
            };
            check("user", id, "posts", user.posts, self.posts_count(conn, id).await?)?;
            check("user", id, "comments", user.comments, self.user_comments_count(conn, id).await?)?;
            check("user", id, "followers", user.followers, self.followers_count(conn, id).await?)?;
            check("user", id, "followings", user.followings, self.followings_count(conn, id).await?)?;
        }

        for &id in set.post_comments.iter().chain(&set.post_likes) {
            let Some(post) = self.post_store.find_by_id(conn, id).await? else {
                continue;
            };
            check("post", id, "comments", post.comments, self.comments_count(conn, id).await?)?;
            check("post", id, "likes", post.likes, self.likes_count(conn, LikeTarget::Post(id)).await?)?;
        }

        for &id in &set.comment_likes {
            let Some(comment) = self.comment_store.find_by_id(conn, id).await? else {
                continue;
            };
            check("comment", id, "likes", comment.likes, self.likes_count(conn, LikeTarget::Comment(id)).await?)?;
        }

        Ok(())
    }
}

fn check(entity: &str, id: i32, counter: &str, stored: i64, expected: i64) -> Result<(), InternalError> {
    if stored == expected {
        return Ok(());
    }

    tracing::error!(entity, id, counter, stored, expected, "Counter out of sync");
    Err(CascadeError::violation(
        format!("{entity} {id}"),
        format!("{counter} is {stored}, predicate counts {expected}"),
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_comment, insert_post, insert_user, setup_test_app_data};
    use crate::types::internal::cascade::RefreshSet;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_posts_count_uses_both_flags() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let p1 = insert_post(db, alice.id, "one").await;
        insert_post(db, alice.id, "two").await;

        app_data.post_store.set_active(db, p1.id, false, "2025/03/01 12:00").await.unwrap();

        let count = app_data.counter_provider.refresh_user_posts(db, alice.id).await.unwrap();
        let stored = app_data.user_store.get_by_id(db, alice.id).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(stored.posts, 1);
    }

    #[tokio::test]
    async fn test_refresh_writes_every_counter_kind() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let post = insert_post(db, alice.id, "hello").await;
        let comment = insert_comment(db, post.id, alice.id, "first").await;

        let set = RefreshSet {
            user_posts: BTreeSet::from([alice.id]),
            user_comments: BTreeSet::from([alice.id]),
            post_comments: BTreeSet::from([post.id]),
            comment_likes: BTreeSet::from([comment.id]),
            ..Default::default()
        };
        app_data.counter_provider.refresh(db, &set).await.unwrap();

        let user = app_data.user_store.get_by_id(db, alice.id).await.unwrap();
        let post = app_data.post_store.get_by_id(db, post.id).await.unwrap();
        assert_eq!(user.posts, 1);
        assert_eq!(user.comments, 1);
        assert_eq!(post.comments, 1);
        assert!(app_data.counter_provider.verify(db, &set).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_reports_stale_counter() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;

        app_data
            .user_store
            .write_counter(db, alice.id, UserCounter::Followers, 3)
            .await
            .unwrap();

        let set = RefreshSet {
            user_follows: BTreeSet::from([alice.id]),
            ..Default::default()
        };
        let result = app_data.counter_provider.verify(db, &set).await;

        assert!(matches!(
            result,
            Err(InternalError::Cascade(CascadeError::InvariantViolation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_verify_skips_deleted_rows() {
        let app_data = setup_test_app_data().await;
        let set = RefreshSet {
            post_likes: BTreeSet::from([999]),
            comment_likes: BTreeSet::from([999]),
            ..Default::default()
        };

        assert!(app_data.counter_provider.verify(&app_data.db, &set).await.is_ok());
    }
}
