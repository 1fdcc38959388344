use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::types::db::comment::{self, ActiveModel, Entity as Comment};
use crate::types::internal::page::Page;
use crate::types::internal::updates::CommentUpdate;

fn visible() -> Condition {
    Condition::all()
        .add(comment::Column::IsActive.eq(true))
        .add(comment::Column::IsOwnerActive.eq(true))
}

/// CommentStore manages comment rows
#[derive(Debug, Default)]
pub struct CommentStore;

impl CommentStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_comment(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i32,
        owner_id: i32,
        owner_active: bool,
        text: &str,
        now: &str,
    ) -> Result<comment::Model, InternalError> {
        let model = ActiveModel {
            text: Set(text.to_string()),
            post_id: Set(post_id),
            owner_id: Set(owner_id),
            is_active: Set(true),
            is_owner_active: Set(owner_active),
            likes: Set(0),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_comment", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<comment::Model>, InternalError> {
        Comment::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_comment_by_id", e))
    }

    /// # Errors
    /// * `EntityError::NotFound` - no comment with this id
    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<comment::Model, InternalError> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| EntityError::comment(id).into())
    }

    /// Visible comments of a post, oldest first
    pub async fn list_active_by_post(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i32,
        page: Page,
    ) -> Result<Vec<comment::Model>, InternalError> {
        Comment::find()
            .filter(visible())
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_comments", e))
    }

    pub async fn list_all(
        &self,
        conn: &impl ConnectionTrait,
        page: Page,
    ) -> Result<Vec<comment::Model>, InternalError> {
        Comment::find()
            .order_by_desc(comment::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_all_comments", e))
    }

    pub async fn ids_by_owner(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::OwnerId.eq(owner_id))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("comment_ids_by_owner", e))
    }

    /// Distinct posts carrying at least one comment by `owner_id`
    pub async fn post_ids_by_owner(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        Comment::find()
            .select_only()
            .column(comment::Column::PostId)
            .distinct()
            .filter(comment::Column::OwnerId.eq(owner_id))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("commented_post_ids_by_owner", e))
    }

    pub async fn ids_by_post(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        Comment::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::PostId.eq(post_id))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("comment_ids_by_post", e))
    }

    /// Distinct owners of comments on a post
    pub async fn owner_ids_by_post(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        Comment::find()
            .select_only()
            .column(comment::Column::OwnerId)
            .distinct()
            .filter(comment::Column::PostId.eq(post_id))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("comment_owner_ids_by_post", e))
    }

    /// comments_count predicate
    pub async fn count_visible_by_post(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i32,
    ) -> Result<u64, InternalError> {
        Comment::find()
            .filter(visible())
            .filter(comment::Column::PostId.eq(post_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_visible_comments_by_post", e))
    }

    /// Visible comments written by a user
    pub async fn count_visible_by_owner(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
    ) -> Result<u64, InternalError> {
        Comment::find()
            .filter(visible())
            .filter(comment::Column::OwnerId.eq(owner_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_visible_comments_by_owner", e))
    }

    pub async fn update_comment(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        update: &CommentUpdate,
        now: &str,
    ) -> Result<comment::Model, InternalError> {
        let comment = self.get_by_id(conn, id).await?;

        let mut active_model: ActiveModel = comment.into();
        if let Some(text) = &update.text {
            active_model.text = Set(text.clone());
        }
        active_model.updated_at = Set(now.to_string());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_comment", e))
    }

    /// Write the root `is_active` flag. Does not cascade.
    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        active: bool,
        now: &str,
    ) -> Result<(), InternalError> {
        Comment::update_many()
            .col_expr(comment::Column::IsActive, Expr::value(active))
            .col_expr(comment::Column::UpdatedAt, Expr::value(now))
            .filter(comment::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_comment_active", e))?;

        Ok(())
    }

    pub async fn set_flag(
        &self,
        conn: &impl ConnectionTrait,
        flag: comment::Column,
        filter: Condition,
        value: bool,
    ) -> Result<u64, InternalError> {
        let result = Comment::update_many()
            .col_expr(flag, Expr::value(value))
            .filter(filter)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_comment_flag", e))?;

        Ok(result.rows_affected)
    }

    pub async fn count_flag_mismatch(
        &self,
        conn: &impl ConnectionTrait,
        flag: comment::Column,
        filter: Condition,
        expected: bool,
    ) -> Result<u64, InternalError> {
        Comment::find()
            .filter(filter)
            .filter(flag.ne(expected))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_comment_flag_mismatch", e))
    }

    pub async fn write_likes(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        value: i64,
    ) -> Result<(), InternalError> {
        Comment::update_many()
            .col_expr(comment::Column::Likes, Expr::value(value))
            .filter(comment::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("write_comment_likes", e))?;

        Ok(())
    }

    /// Hard delete. Likes must be removed first.
    pub async fn delete_comment(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<(), InternalError> {
        let result = Comment::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_comment", e))?;

        if result.rows_affected == 0 {
            return Err(EntityError::comment(id).into());
        }

        Ok(())
    }

    pub async fn delete_by_post(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i32,
    ) -> Result<u64, InternalError> {
        let result = Comment::delete_many()
            .filter(comment::Column::PostId.eq(post_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_comments_by_post", e))?;

        Ok(result.rows_affected)
    }
}
