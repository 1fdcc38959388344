use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::RelationError;
use crate::types::db::follow::{self, ActiveModel, Entity as Follow};
use crate::types::internal::page::Page;

fn visible() -> Condition {
    Condition::all()
        .add(follow::Column::IsFollowerActive.eq(true))
        .add(follow::Column::IsFollowingActive.eq(true))
}

/// FollowStore manages directed follow edges between users
#[derive(Debug, Default)]
pub struct FollowStore;

impl FollowStore {
    pub fn new() -> Self {
        Self
    }

    /// # Errors
    /// * `RelationError::DuplicateRelation` - edge already exists
    pub async fn create_follow(
        &self,
        conn: &impl ConnectionTrait,
        follower_id: i32,
        following_id: i32,
        follower_active: bool,
        following_active: bool,
        now: &str,
    ) -> Result<follow::Model, InternalError> {
        let model = ActiveModel {
            follower_id: Set(follower_id),
            following_id: Set(following_id),
            is_follower_active: Set(follower_active),
            is_following_active: Set(following_active),
            created_at: Set(now.to_string()),
            ..Default::default()
        };

        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => RelationError::duplicate(format!(
                "follow from user {follower_id} to user {following_id}"
            ))
            .into(),
            _ => InternalError::database("create_follow", e),
        })
    }

    pub async fn find_pair(
        &self,
        conn: &impl ConnectionTrait,
        follower_id: i32,
        following_id: i32,
    ) -> Result<Option<follow::Model>, InternalError> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_follow", e))
    }

    pub async fn delete_follow(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<(), InternalError> {
        Follow::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_follow", e))?;

        Ok(())
    }

    /// followers_count predicate
    pub async fn count_visible_followers(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<u64, InternalError> {
        Follow::find()
            .filter(visible())
            .filter(follow::Column::FollowingId.eq(user_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_visible_followers", e))
    }

    /// followings_count predicate
    pub async fn count_visible_followings(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<u64, InternalError> {
        Follow::find()
            .filter(visible())
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_visible_followings", e))
    }

    /// Every user `user_id` follows, regardless of flags
    pub async fn following_ids_of(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowingId)
            .filter(follow::Column::FollowerId.eq(user_id))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("following_ids_of", e))
    }

    /// Every user following `user_id`, regardless of flags
    pub async fn follower_ids_of(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowerId)
            .filter(follow::Column::FollowingId.eq(user_id))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("follower_ids_of", e))
    }

    /// Followers behind visible edges, oldest edge first
    pub async fn visible_follower_ids(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        page: Page,
    ) -> Result<Vec<i32>, InternalError> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowerId)
            .filter(visible())
            .filter(follow::Column::FollowingId.eq(user_id))
            .order_by_asc(follow::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("visible_follower_ids", e))
    }

    /// Followings behind visible edges, oldest edge first
    pub async fn visible_following_ids(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i32,
        page: Page,
    ) -> Result<Vec<i32>, InternalError> {
        Follow::find()
            .select_only()
            .column(follow::Column::FollowingId)
            .filter(visible())
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_asc(follow::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("visible_following_ids", e))
    }

    pub async fn set_flag(
        &self,
        conn: &impl ConnectionTrait,
        flag: follow::Column,
        filter: Condition,
        value: bool,
    ) -> Result<u64, InternalError> {
        let result = Follow::update_many()
            .col_expr(flag, Expr::value(value))
            .filter(filter)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_follow_flag", e))?;

        Ok(result.rows_affected)
    }

    pub async fn count_flag_mismatch(
        &self,
        conn: &impl ConnectionTrait,
        flag: follow::Column,
        filter: Condition,
        expected: bool,
    ) -> Result<u64, InternalError> {
        Follow::find()
            .filter(filter)
            .filter(flag.ne(expected))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_follow_flag_mismatch", e))
    }
}
