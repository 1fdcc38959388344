use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::RelationError;
use crate::types::db::like::{self, ActiveModel, Entity as Like};
use crate::types::internal::page::Page;
use crate::types::internal::relation::LikeTarget;

/// Mirror values copied onto a like at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeMirrors {
    pub owner_active: bool,
    pub target_active: bool,
    pub target_owner_active: bool,
}

fn target_filter(target: LikeTarget) -> Condition {
    match target {
        LikeTarget::Post(id) => Condition::all().add(like::Column::PostId.eq(id)),
        LikeTarget::Comment(id) => Condition::all().add(like::Column::CommentId.eq(id)),
    }
}

/// Visibility predicate for likes on `target`'s kind
fn visible(target: LikeTarget) -> Condition {
    let base = Condition::all().add(like::Column::IsOwnerActive.eq(true));
    match target {
        LikeTarget::Post(_) => base
            .add(like::Column::IsPostActive.eq(true))
            .add(like::Column::IsPostOwnerActive.eq(true)),
        LikeTarget::Comment(_) => base
            .add(like::Column::IsCommentActive.eq(true))
            .add(like::Column::IsCommentOwnerActive.eq(true)),
    }
}

/// LikeStore manages like rows on posts and comments
#[derive(Debug, Default)]
pub struct LikeStore;

impl LikeStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a like. The mirror pair of the other target kind is stored as `true`.
    ///
    /// # Errors
    /// * `RelationError::DuplicateRelation` - owner already likes the target
    pub async fn create_like(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
        target: LikeTarget,
        mirrors: LikeMirrors,
        now: &str,
    ) -> Result<like::Model, InternalError> {
        let mut model = ActiveModel {
            owner_id: Set(owner_id),
            post_id: Set(None),
            comment_id: Set(None),
            is_owner_active: Set(mirrors.owner_active),
            is_post_active: Set(true),
            is_post_owner_active: Set(true),
            is_comment_active: Set(true),
            is_comment_owner_active: Set(true),
            created_at: Set(now.to_string()),
            ..Default::default()
        };

        match target {
            LikeTarget::Post(id) => {
                model.post_id = Set(Some(id));
                model.is_post_active = Set(mirrors.target_active);
                model.is_post_owner_active = Set(mirrors.target_owner_active);
            }
            LikeTarget::Comment(id) => {
                model.comment_id = Set(Some(id));
                model.is_comment_active = Set(mirrors.target_active);
                model.is_comment_owner_active = Set(mirrors.target_owner_active);
            }
        }

        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                RelationError::duplicate(format!("like by user {owner_id} on {target}")).into()
            }
            _ => InternalError::database("create_like", e),
        })
    }

    pub async fn find_by_owner_and_target(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
        target: LikeTarget,
    ) -> Result<Option<like::Model>, InternalError> {
        Like::find()
            .filter(like::Column::OwnerId.eq(owner_id))
            .filter(target_filter(target))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_like", e))
    }

    /// likes_count predicate for a post or comment
    pub async fn count_visible(
        &self,
        conn: &impl ConnectionTrait,
        target: LikeTarget,
    ) -> Result<u64, InternalError> {
        Like::find()
            .filter(target_filter(target))
            .filter(visible(target))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_visible_likes", e))
    }

    /// Visible likes on a target, oldest first
    pub async fn list_visible(
        &self,
        conn: &impl ConnectionTrait,
        target: LikeTarget,
        page: Page,
    ) -> Result<Vec<like::Model>, InternalError> {
        Like::find()
            .filter(target_filter(target))
            .filter(visible(target))
            .order_by_asc(like::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_visible_likes", e))
    }

    /// Posts liked by `owner_id`
    pub async fn liked_post_ids(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        let ids = Like::find()
            .select_only()
            .column(like::Column::PostId)
            .filter(like::Column::OwnerId.eq(owner_id))
            .filter(like::Column::PostId.is_not_null())
            .into_tuple::<Option<i32>>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("liked_post_ids", e))?;

        Ok(ids.into_iter().flatten().collect())
    }

    /// Comments liked by `owner_id`
    pub async fn liked_comment_ids(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        let ids = Like::find()
            .select_only()
            .column(like::Column::CommentId)
            .filter(like::Column::OwnerId.eq(owner_id))
            .filter(like::Column::CommentId.is_not_null())
            .into_tuple::<Option<i32>>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("liked_comment_ids", e))?;

        Ok(ids.into_iter().flatten().collect())
    }

    pub async fn set_flag(
        &self,
        conn: &impl ConnectionTrait,
        flag: like::Column,
        filter: Condition,
        value: bool,
    ) -> Result<u64, InternalError> {
        let result = Like::update_many()
            .col_expr(flag, Expr::value(value))
            .filter(filter)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_like_flag", e))?;

        Ok(result.rows_affected)
    }

    pub async fn count_flag_mismatch(
        &self,
        conn: &impl ConnectionTrait,
        flag: like::Column,
        filter: Condition,
        expected: bool,
    ) -> Result<u64, InternalError> {
        Like::find()
            .filter(filter)
            .filter(flag.ne(expected))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_like_flag_mismatch", e))
    }

    pub async fn delete_like(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<(), InternalError> {
        Like::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_like", e))?;

        Ok(())
    }

    pub async fn delete_by_target(
        &self,
        conn: &impl ConnectionTrait,
        target: LikeTarget,
    ) -> Result<u64, InternalError> {
        let result = Like::delete_many()
            .filter(target_filter(target))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_likes_by_target", e))?;

        Ok(result.rows_affected)
    }

    /// Remove every like on the given comments
    pub async fn delete_by_comments(
        &self,
        conn: &impl ConnectionTrait,
        comment_ids: &[i32],
    ) -> Result<u64, InternalError> {
        if comment_ids.is_empty() {
            return Ok(0);
        }

        let result = Like::delete_many()
            .filter(like::Column::CommentId.is_in(comment_ids.iter().copied()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_likes_by_comments", e))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{TEST_NOW, insert_comment, insert_post, insert_user, setup_test_db};

    fn raw_like(owner_id: i32, post_id: Option<i32>, comment_id: Option<i32>) -> ActiveModel {
        ActiveModel {
            owner_id: Set(owner_id),
            post_id: Set(post_id),
            comment_id: Set(comment_id),
            is_owner_active: Set(true),
            is_post_active: Set(true),
            is_post_owner_active: Set(true),
            is_comment_active: Set(true),
            is_comment_owner_active: Set(true),
            created_at: Set(TEST_NOW.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_like_row_needs_exactly_one_target() {
        let db = setup_test_db().await;
        let alice = insert_user(&db, "alice", false).await;
        let post = insert_post(&db, alice.id, "hello").await;
        let comment = insert_comment(&db, post.id, alice.id, "first").await;

        assert!(raw_like(alice.id, None, None).insert(&db).await.is_err());
        assert!(raw_like(alice.id, Some(post.id), Some(comment.id)).insert(&db).await.is_err());
        assert_eq!(Like::find().count(&db).await.unwrap(), 0);

        assert!(raw_like(alice.id, Some(post.id), None).insert(&db).await.is_ok());
        assert!(raw_like(alice.id, None, Some(comment.id)).insert(&db).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_like_rejects_duplicate() {
        let db = setup_test_db().await;
        let store = LikeStore::new();
        let alice = insert_user(&db, "alice", false).await;
        let post = insert_post(&db, alice.id, "hello").await;
        let mirrors = LikeMirrors { owner_active: true, target_active: true, target_owner_active: true };

        let like = store.create_like(&db, alice.id, LikeTarget::Post(post.id), mirrors, TEST_NOW).await.unwrap();
        assert_eq!(like.post_id, Some(post.id));
        assert_eq!(like.comment_id, None);

        let result = store.create_like(&db, alice.id, LikeTarget::Post(post.id), mirrors, TEST_NOW).await;
        assert!(matches!(result, Err(InternalError::Relation(RelationError::DuplicateRelation { .. }))));
    }
}
