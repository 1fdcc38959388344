//! Propagation rules for root activation changes.
//!
//! The table here is pure: it names which mirror flags follow a root entity
//! and which counters have to be recomputed afterwards. The cascade provider
//! turns it into storage writes.

use std::collections::BTreeSet;

/// Entities whose `is_active` flag is set directly by an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    User,
    Post,
    Comment,
}

/// A root entity changing its `is_active` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootTransition {
    pub kind: RootKind,
    pub id: i32,
    pub active: bool,
}

impl RootTransition {
    pub fn user(id: i32, active: bool) -> Self {
        Self { kind: RootKind::User, id, active }
    }

    pub fn post(id: i32, active: bool) -> Self {
        Self { kind: RootKind::Post, id, active }
    }

    pub fn comment(id: i32, active: bool) -> Self {
        Self { kind: RootKind::Comment, id, active }
    }
}

/// One bulk write of a mirror flag. The written value is always the
/// transition's new `active` bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorUpdate {
    /// posts.is_owner_active where posts.owner_id = root
    PostOwnerActive,
    /// comments.is_owner_active where comments.owner_id = root
    CommentOwnerActive,
    /// likes.is_owner_active where likes.owner_id = root
    LikeOwnerActive,
    /// likes.is_post_owner_active where likes.post_id is owned by root
    LikePostOwnerActive,
    /// likes.is_comment_owner_active where likes.comment_id is owned by root
    LikeCommentOwnerActive,
    /// follows.is_follower_active where follows.follower_id = root
    FollowFollowerActive,
    /// follows.is_following_active where follows.following_id = root
    FollowFollowingActive,
    /// likes.is_post_active where likes.post_id = root
    LikePostActive,
    /// likes.is_comment_active where likes.comment_id = root
    LikeCommentActive,
}

const USER_PLAN: &[MirrorUpdate] = &[
    MirrorUpdate::PostOwnerActive,
    MirrorUpdate::CommentOwnerActive,
    MirrorUpdate::LikeOwnerActive,
    MirrorUpdate::LikePostOwnerActive,
    MirrorUpdate::LikeCommentOwnerActive,
    MirrorUpdate::FollowFollowerActive,
    MirrorUpdate::FollowFollowingActive,
];

const POST_PLAN: &[MirrorUpdate] = &[MirrorUpdate::LikePostActive];

const COMMENT_PLAN: &[MirrorUpdate] = &[MirrorUpdate::LikeCommentActive];

/// Mirror writes applied when a root of `kind` changes state
pub fn cascade_plan(kind: RootKind) -> &'static [MirrorUpdate] {
    match kind {
        RootKind::User => USER_PLAN,
        RootKind::Post => POST_PLAN,
        RootKind::Comment => COMMENT_PLAN,
    }
}

/// Foreign keys around a root entity, read before the cascade runs.
///
/// Only the fields relevant to the root kind are filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependentIds {
    /// Owner of the root post/comment
    pub owner: Option<i32>,
    /// Parent post of the root comment
    pub parent_post: Option<i32>,
    pub owned_posts: Vec<i32>,
    pub owned_comments: Vec<i32>,
    /// Posts carrying comments owned by the root user
    pub commented_posts: Vec<i32>,
    pub liked_posts: Vec<i32>,
    pub liked_comments: Vec<i32>,
    /// Users the root user follows
    pub followings: Vec<i32>,
    /// Users following the root user
    pub followers: Vec<i32>,
}

/// Counters to recompute, grouped by counter kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSet {
    pub user_posts: BTreeSet<i32>,
    pub user_comments: BTreeSet<i32>,
    /// Both followers and followings
    pub user_follows: BTreeSet<i32>,
    pub post_comments: BTreeSet<i32>,
    pub post_likes: BTreeSet<i32>,
    pub comment_likes: BTreeSet<i32>,
}

impl RefreshSet {
    pub fn is_empty(&self) -> bool {
        self.user_posts.is_empty()
            && self.user_comments.is_empty()
            && self.user_follows.is_empty()
            && self.post_comments.is_empty()
            && self.post_likes.is_empty()
            && self.comment_likes.is_empty()
    }
}

/// Counters whose defining predicate reads a flag touched by `transition`
pub fn refresh_set(transition: &RootTransition, deps: &DependentIds) -> RefreshSet {
    let mut set = RefreshSet::default();

    match transition.kind {
        RootKind::User => {
            set.user_posts.insert(transition.id);
            set.user_comments.insert(transition.id);
            set.user_follows.insert(transition.id);
            set.user_follows.extend(deps.followings.iter().copied());
            set.user_follows.extend(deps.followers.iter().copied());
            set.post_likes.extend(deps.owned_posts.iter().copied());
            set.post_likes.extend(deps.liked_posts.iter().copied());
            set.comment_likes.extend(deps.owned_comments.iter().copied());
            set.comment_likes.extend(deps.liked_comments.iter().copied());
            set.post_comments.extend(deps.commented_posts.iter().copied());
        }
        RootKind::Post => {
            set.user_posts.extend(deps.owner);
            set.post_likes.insert(transition.id);
        }
        RootKind::Comment => {
            set.user_comments.extend(deps.owner);
            set.post_comments.extend(deps.parent_post);
            set.comment_likes.insert(transition.id);
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_plan_covers_every_owned_mirror() {
        let plan = cascade_plan(RootKind::User);

        assert_eq!(plan.len(), 7);
        assert!(plan.contains(&MirrorUpdate::PostOwnerActive));
        assert!(plan.contains(&MirrorUpdate::CommentOwnerActive));
        assert!(plan.contains(&MirrorUpdate::LikeOwnerActive));
        assert!(plan.contains(&MirrorUpdate::LikePostOwnerActive));
        assert!(plan.contains(&MirrorUpdate::LikeCommentOwnerActive));
        assert!(plan.contains(&MirrorUpdate::FollowFollowerActive));
        assert!(plan.contains(&MirrorUpdate::FollowFollowingActive));
        assert!(!plan.contains(&MirrorUpdate::LikePostActive));
    }

    #[test]
    fn test_post_and_comment_plans_only_touch_likes() {
        assert_eq!(cascade_plan(RootKind::Post), &[MirrorUpdate::LikePostActive]);
        assert_eq!(cascade_plan(RootKind::Comment), &[MirrorUpdate::LikeCommentActive]);
    }

    #[test]
    fn test_user_refresh_set_reaches_both_sides_of_follows() {
        let deps = DependentIds {
            owned_posts: vec![10, 11],
            owned_comments: vec![20],
            commented_posts: vec![30, 10],
            liked_posts: vec![31],
            liked_comments: vec![21, 20],
            followings: vec![2, 3],
            followers: vec![3, 4],
            ..Default::default()
        };

        let set = refresh_set(&RootTransition::user(1, false), &deps);

        assert_eq!(set.user_posts, BTreeSet::from([1]));
        assert_eq!(set.user_comments, BTreeSet::from([1]));
        assert_eq!(set.user_follows, BTreeSet::from([1, 2, 3, 4]));
        assert_eq!(set.post_likes, BTreeSet::from([10, 11, 31]));
        assert_eq!(set.comment_likes, BTreeSet::from([20, 21]));
        assert_eq!(set.post_comments, BTreeSet::from([10, 30]));
    }

    #[test]
    fn test_post_refresh_set_targets_owner_and_post() {
        let deps = DependentIds {
            owner: Some(7),
            ..Default::default()
        };

        let set = refresh_set(&RootTransition::post(5, true), &deps);

        assert_eq!(set.user_posts, BTreeSet::from([7]));
        assert_eq!(set.post_likes, BTreeSet::from([5]));
        assert!(set.post_comments.is_empty());
        assert!(set.user_follows.is_empty());
    }

    #[test]
    fn test_comment_refresh_set_targets_parent_post() {
        let deps = DependentIds {
            owner: Some(7),
            parent_post: Some(5),
            ..Default::default()
        };

        let set = refresh_set(&RootTransition::comment(9, false), &deps);

        assert_eq!(set.post_comments, BTreeSet::from([5]));
        assert_eq!(set.user_comments, BTreeSet::from([7]));
        assert_eq!(set.comment_likes, BTreeSet::from([9]));
        assert!(set.user_posts.is_empty());
    }

    #[test]
    fn test_empty_refresh_set() {
        assert!(RefreshSet::default().is_empty());
        let set = refresh_set(&RootTransition::post(5, true), &DependentIds { owner: Some(1), ..Default::default() });
        assert!(!set.is_empty());
    }
}
