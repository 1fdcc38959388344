//! Activation cascader.
//!
//! A root transition is applied in a fixed order: read the dependent ids,
//! write every mirror flag from [`cascade_plan`], then recount. Counters are
//! rescans, so they always observe the flag writes that precede them.

use sea_orm::{ColumnTrait, Condition, ConnectionTrait};
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CascadeError;
use crate::providers::CounterProvider;
use crate::stores::{CommentStore, FollowStore, LikeStore, PostStore, UserStore};
use crate::types::db::{comment, follow, like, post};
use crate::types::internal::cascade::{
    cascade_plan, refresh_set, DependentIds, MirrorUpdate, RefreshSet, RootKind, RootTransition,
};

/// A mirror column together with the rows it has to be written on
enum MirrorTarget {
    Post(post::Column, Condition),
    Comment(comment::Column, Condition),
    Like(like::Column, Condition),
    Follow(follow::Column, Condition),
}

/// Resolve one plan entry against the root. `None` when no row can match.
fn mirror_target(update: MirrorUpdate, root: i32, deps: &DependentIds) -> Option<MirrorTarget> {
    let target = match update {
        MirrorUpdate::PostOwnerActive => MirrorTarget::Post(
            post::Column::IsOwnerActive,
            Condition::all().add(post::Column::OwnerId.eq(root)),
        ),
        MirrorUpdate::CommentOwnerActive => MirrorTarget::Comment(
            comment::Column::IsOwnerActive,
            Condition::all().add(comment::Column::OwnerId.eq(root)),
        ),
        MirrorUpdate::LikeOwnerActive => MirrorTarget::Like(
            like::Column::IsOwnerActive,
            Condition::all().add(like::Column::OwnerId.eq(root)),
        ),
        MirrorUpdate::LikePostOwnerActive => {
            if deps.owned_posts.is_empty() {
                return None;
            }
            MirrorTarget::Like(
                like::Column::IsPostOwnerActive,
                Condition::all().add(like::Column::PostId.is_in(deps.owned_posts.iter().copied())),
            )
        }
        MirrorUpdate::LikeCommentOwnerActive => {
            if deps.owned_comments.is_empty() {
                return None;
            }
            MirrorTarget::Like(
                like::Column::IsCommentOwnerActive,
                Condition::all()
                    .add(like::Column::CommentId.is_in(deps.owned_comments.iter().copied())),
            )
        }
        MirrorUpdate::FollowFollowerActive => MirrorTarget::Follow(
            follow::Column::IsFollowerActive,
            Condition::all().add(follow::Column::FollowerId.eq(root)),
        ),
        MirrorUpdate::FollowFollowingActive => MirrorTarget::Follow(
            follow::Column::IsFollowingActive,
            Condition::all().add(follow::Column::FollowingId.eq(root)),
        ),
        MirrorUpdate::LikePostActive => MirrorTarget::Like(
            like::Column::IsPostActive,
            Condition::all().add(like::Column::PostId.eq(root)),
        ),
        MirrorUpdate::LikeCommentActive => MirrorTarget::Like(
            like::Column::IsCommentActive,
            Condition::all().add(like::Column::CommentId.eq(root)),
        ),
    };

    Some(target)
}

pub struct CascadeProvider {
    user_store: Arc<UserStore>,
    post_store: Arc<PostStore>,
    comment_store: Arc<CommentStore>,
    like_store: Arc<LikeStore>,
    follow_store: Arc<FollowStore>,
    counter_provider: Arc<CounterProvider>,
    verify_cascades: bool,
}

impl CascadeProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        post_store: Arc<PostStore>,
        comment_store: Arc<CommentStore>,
        like_store: Arc<LikeStore>,
        follow_store: Arc<FollowStore>,
        counter_provider: Arc<CounterProvider>,
        verify_cascades: bool,
    ) -> Self {
        Self {
            user_store,
            post_store,
            comment_store,
            like_store,
            follow_store,
            counter_provider,
            verify_cascades,
        }
    }

    /// Stored `is_active` of the root, `None` if the row does not exist
    async fn stored_state(
        &self,
        conn: &impl ConnectionTrait,
        transition: &RootTransition,
    ) -> Result<Option<bool>, InternalError> {
        let state = match transition.kind {
            RootKind::User => self
                .user_store
                .find_by_id(conn, transition.id)
                .await?
                .map(|u| u.is_active),
            RootKind::Post => self
                .post_store
                .find_by_id(conn, transition.id)
                .await?
                .map(|p| p.is_active),
            RootKind::Comment => self
                .comment_store
                .find_by_id(conn, transition.id)
                .await?
                .map(|c| c.is_active),
        };

        Ok(state)
    }

    /// Write the root flag, then cascade it.
    ///
    /// Returns `None` when the root is missing or already in the requested
    /// state; nothing is written in either case. When verification is
    /// enabled the cascade is checked before returning.
    pub async fn transition(
        &self,
        conn: &impl ConnectionTrait,
        transition: RootTransition,
        now: &str,
    ) -> Result<Option<RefreshSet>, InternalError> {
        let Some(current) = self.stored_state(conn, &transition).await? else {
            return Ok(None);
        };

        if current == transition.active {
            tracing::debug!(
                kind = ?transition.kind,
                id = transition.id,
                active = transition.active,
                "Root already in requested state, skipping cascade"
            );
            return Ok(None);
        }

        match transition.kind {
            RootKind::User => self.user_store.set_active(conn, transition.id, transition.active, now).await?,
            RootKind::Post => self.post_store.set_active(conn, transition.id, transition.active, now).await?,
            RootKind::Comment => {
                self.comment_store
                    .set_active(conn, transition.id, transition.active, now)
                    .await?
            }
        }

        let refreshed = self.cascade(conn, transition).await?;

        if self.verify_cascades {
            self.verify(conn, transition).await?;
        }

        Ok(Some(refreshed))
    }

    /// Read the foreign keys a cascade needs. `None` if the root is gone.
    pub async fn collect_dependents(
        &self,
        conn: &impl ConnectionTrait,
        transition: &RootTransition,
    ) -> Result<Option<DependentIds>, InternalError> {
        let id = transition.id;

        let deps = match transition.kind {
            RootKind::User => {
                if self.user_store.find_by_id(conn, id).await?.is_none() {
                    return Ok(None);
                }
                DependentIds {
                    owned_posts: self.post_store.ids_by_owner(conn, id).await?,
                    owned_comments: self.comment_store.ids_by_owner(conn, id).await?,
                    commented_posts: self.comment_store.post_ids_by_owner(conn, id).await?,
                    liked_posts: self.like_store.liked_post_ids(conn, id).await?,
                    liked_comments: self.like_store.liked_comment_ids(conn, id).await?,
                    followings: self.follow_store.following_ids_of(conn, id).await?,
                    followers: self.follow_store.follower_ids_of(conn, id).await?,
                    ..Default::default()
                }
            }
            RootKind::Post => {
                let Some(post) = self.post_store.find_by_id(conn, id).await? else {
                    return Ok(None);
                };
                DependentIds {
                    owner: Some(post.owner_id),
                    ..Default::default()
                }
            }
            RootKind::Comment => {
                let Some(comment) = self.comment_store.find_by_id(conn, id).await? else {
                    return Ok(None);
                };
                DependentIds {
                    owner: Some(comment.owner_id),
                    parent_post: Some(comment.post_id),
                    ..Default::default()
                }
            }
        };

        Ok(Some(deps))
    }

    /// Propagate `transition` to every mirror flag and refresh the affected
    /// counters. Does not touch the root flag. A missing root is a no-op.
    pub async fn cascade(
        &self,
        conn: &impl ConnectionTrait,
        transition: RootTransition,
    ) -> Result<RefreshSet, InternalError> {
        let Some(deps) = self.collect_dependents(conn, &transition).await? else {
            return Ok(RefreshSet::default());
        };

        for &update in cascade_plan(transition.kind) {
            let Some(target) = mirror_target(update, transition.id, &deps) else {
                continue;
            };
            let rows = self.write_mirror(conn, target, transition.active).await?;
            tracing::debug!(?update, rows, active = transition.active, "Mirror flags written");
        }

        let set = refresh_set(&transition, &deps);
        self.counter_provider.refresh(conn, &set).await?;

        tracing::info!(
            kind = ?transition.kind,
            id = transition.id,
            active = transition.active,
            "Cascade applied"
        );

        Ok(set)
    }

    async fn write_mirror(
        &self,
        conn: &impl ConnectionTrait,
        target: MirrorTarget,
        value: bool,
    ) -> Result<u64, InternalError> {
        match target {
            MirrorTarget::Post(column, filter) => self.post_store.set_flag(conn, column, filter, value).await,
            MirrorTarget::Comment(column, filter) => self.comment_store.set_flag(conn, column, filter, value).await,
            MirrorTarget::Like(column, filter) => self.like_store.set_flag(conn, column, filter, value).await,
            MirrorTarget::Follow(column, filter) => self.follow_store.set_flag(conn, column, filter, value).await,
        }
    }

    async fn count_mismatch(
        &self,
        conn: &impl ConnectionTrait,
        target: MirrorTarget,
        expected: bool,
    ) -> Result<u64, InternalError> {
        match target {
            MirrorTarget::Post(column, filter) => {
                self.post_store.count_flag_mismatch(conn, column, filter, expected).await
            }
            MirrorTarget::Comment(column, filter) => {
                self.comment_store.count_flag_mismatch(conn, column, filter, expected).await
            }
            MirrorTarget::Like(column, filter) => {
                self.like_store.count_flag_mismatch(conn, column, filter, expected).await
            }
            MirrorTarget::Follow(column, filter) => {
                self.follow_store.count_flag_mismatch(conn, column, filter, expected).await
            }
        }
    }

    /// Check every mirror and counter reachable from the root against the
    /// root's stored state.
    ///
    /// # Errors
    /// * `CascadeError::InvariantViolation` - a mirror flag or counter is stale
    pub async fn verify(
        &self,
        conn: &impl ConnectionTrait,
        transition: RootTransition,
    ) -> Result<(), InternalError> {
        let Some(active) = self.stored_state(conn, &transition).await? else {
            return Ok(());
        };
        let Some(deps) = self.collect_dependents(conn, &transition).await? else {
            return Ok(());
        };

        for &update in cascade_plan(transition.kind) {
            let Some(target) = mirror_target(update, transition.id, &deps) else {
                continue;
            };
            let stale = self.count_mismatch(conn, target, active).await?;
            if stale > 0 {
                tracing::error!(?update, stale, root = transition.id, "Mirror flags out of sync");
                return Err(CascadeError::violation(
                    format!("{:?} {}", transition.kind, transition.id).to_lowercase(),
                    format!("{stale} rows with stale {update:?}"),
                )
                .into());
            }
        }

        let probe = RootTransition { active, ..transition };
        self.counter_provider
            .verify(conn, &refresh_set(&probe, &deps))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_comment, insert_post, insert_user, setup_test_app_data};
    use crate::types::internal::relation::LikeTarget;

    const NOW: &str = "2025/03/01 12:00";

    #[test]
    fn test_owned_mirrors_skip_when_nothing_is_owned() {
        let deps = DependentIds::default();

        assert!(mirror_target(MirrorUpdate::LikePostOwnerActive, 1, &deps).is_none());
        assert!(mirror_target(MirrorUpdate::LikeCommentOwnerActive, 1, &deps).is_none());
        assert!(mirror_target(MirrorUpdate::PostOwnerActive, 1, &deps).is_some());
    }

    #[tokio::test]
    async fn test_user_transition_flips_owned_mirrors() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let post = insert_post(db, alice.id, "hello").await;
        let comment = insert_comment(db, post.id, alice.id, "me first").await;

        let refreshed = app_data
            .cascade_provider
            .transition(db, RootTransition::user(alice.id, false), NOW)
            .await
            .unwrap();

        assert!(refreshed.is_some());
        let post = app_data.post_store.get_by_id(db, post.id).await.unwrap();
        let comment = app_data.comment_store.get_by_id(db, comment.id).await.unwrap();
        let alice = app_data.user_store.get_by_id(db, alice.id).await.unwrap();
        assert!(!post.is_owner_active);
        assert!(post.is_active);
        assert!(!comment.is_owner_active);
        assert_eq!(alice.posts, 0);
        assert_eq!(alice.comments, 0);
        assert_eq!(post.comments, 0);
    }

    #[tokio::test]
    async fn test_repeated_transition_is_skipped() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let post = insert_post(db, alice.id, "hello").await;

        let first = app_data
            .cascade_provider
            .transition(db, RootTransition::post(post.id, false), NOW)
            .await
            .unwrap();
        let second = app_data
            .cascade_provider
            .transition(db, RootTransition::post(post.id, false), NOW)
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_missing_root_is_a_no_op() {
        let app_data = setup_test_app_data().await;

        let result = app_data
            .cascade_provider
            .transition(&app_data.db, RootTransition::comment(404, false), NOW)
            .await
            .unwrap();
        let set = app_data
            .cascade_provider
            .cascade(&app_data.db, RootTransition::user(404, false))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_verify_detects_mirror_written_out_of_band() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.db;
        let alice = insert_user(db, "alice", false).await;
        let bob = insert_user(db, "bob", false).await;
        let post = insert_post(db, bob.id, "hello").await;
        app_data
            .relationship_provider
            .like(db, alice.id, LikeTarget::Post(post.id), NOW)
            .await
            .unwrap();

        // Corrupt the mirror without going through the cascade
        app_data
            .like_store
            .set_flag(
                db,
                like::Column::IsPostActive,
                Condition::all().add(like::Column::PostId.eq(post.id)),
                false,
            )
            .await
            .unwrap();

        let result = app_data
            .cascade_provider
            .verify(db, RootTransition::post(post.id, true))
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Cascade(CascadeError::InvariantViolation { .. }))
        ));
    }
}
