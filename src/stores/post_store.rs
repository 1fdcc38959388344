use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::types::db::post::{self, ActiveModel, Entity as Post};
use crate::types::internal::page::Page;
use crate::types::internal::updates::PostUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostCounter {
    Comments,
    Likes,
}

impl PostCounter {
    fn column(self) -> post::Column {
        match self {
            PostCounter::Comments => post::Column::Comments,
            PostCounter::Likes => post::Column::Likes,
        }
    }
}

/// Condition selecting effectively visible posts
fn visible() -> Condition {
    Condition::all()
        .add(post::Column::IsActive.eq(true))
        .add(post::Column::IsOwnerActive.eq(true))
}

/// PostStore manages post rows
#[derive(Debug, Default)]
pub struct PostStore;

impl PostStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert an active post; `owner_active` seeds the owner mirror
    pub async fn create_post(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
        owner_active: bool,
        text: &str,
        now: &str,
    ) -> Result<post::Model, InternalError> {
        let model = ActiveModel {
            text: Set(text.to_string()),
            owner_id: Set(owner_id),
            is_active: Set(true),
            is_owner_active: Set(owner_active),
            comments: Set(0),
            likes: Set(0),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_post", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<post::Model>, InternalError> {
        Post::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_post_by_id", e))
    }

    /// # Errors
    /// * `EntityError::NotFound` - no post with this id
    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<post::Model, InternalError> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| EntityError::post(id).into())
    }

    /// Visible posts, newest first
    pub async fn list_active(
        &self,
        conn: &impl ConnectionTrait,
        page: Page,
    ) -> Result<Vec<post::Model>, InternalError> {
        Post::find()
            .filter(visible())
            .order_by_desc(post::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_posts", e))
    }

    pub async fn list_active_by_owner(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
        page: Page,
    ) -> Result<Vec<post::Model>, InternalError> {
        Post::find()
            .filter(visible())
            .filter(post::Column::OwnerId.eq(owner_id))
            .order_by_desc(post::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_posts_by_owner", e))
    }

    pub async fn list_all(
        &self,
        conn: &impl ConnectionTrait,
        page: Page,
    ) -> Result<Vec<post::Model>, InternalError> {
        Post::find()
            .order_by_desc(post::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_all_posts", e))
    }

    /// Ids of every post owned by `owner_id`, whatever its state
    pub async fn ids_by_owner(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
    ) -> Result<Vec<i32>, InternalError> {
        Post::find()
            .select_only()
            .column(post::Column::Id)
            .filter(post::Column::OwnerId.eq(owner_id))
            .into_tuple::<i32>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("post_ids_by_owner", e))
    }

    /// posts_count predicate
    pub async fn count_visible_by_owner(
        &self,
        conn: &impl ConnectionTrait,
        owner_id: i32,
    ) -> Result<u64, InternalError> {
        Post::find()
            .filter(visible())
            .filter(post::Column::OwnerId.eq(owner_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_visible_posts", e))
    }

    pub async fn update_post(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        update: &PostUpdate,
        now: &str,
    ) -> Result<post::Model, InternalError> {
        let post = self.get_by_id(conn, id).await?;

        let mut active_model: ActiveModel = post.into();
        if let Some(text) = &update.text {
            active_model.text = Set(text.clone());
        }
        active_model.updated_at = Set(now.to_string());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_post", e))
    }

    /// Write the root `is_active` flag. Does not cascade.
    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        active: bool,
        now: &str,
    ) -> Result<(), InternalError> {
        Post::update_many()
            .col_expr(post::Column::IsActive, Expr::value(active))
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_post_active", e))?;

        Ok(())
    }

    /// Bulk write of a mirror flag; returns the number of rows matched
    pub async fn set_flag(
        &self,
        conn: &impl ConnectionTrait,
        flag: post::Column,
        filter: Condition,
        value: bool,
    ) -> Result<u64, InternalError> {
        let result = Post::update_many()
            .col_expr(flag, Expr::value(value))
            .filter(filter)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_post_flag", e))?;

        Ok(result.rows_affected)
    }

    /// Rows matching `filter` whose `flag` differs from `expected`
    pub async fn count_flag_mismatch(
        &self,
        conn: &impl ConnectionTrait,
        flag: post::Column,
        filter: Condition,
        expected: bool,
    ) -> Result<u64, InternalError> {
        Post::find()
            .filter(filter)
            .filter(flag.ne(expected))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_post_flag_mismatch", e))
    }

    pub async fn write_counter(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        counter: PostCounter,
        value: i64,
    ) -> Result<(), InternalError> {
        Post::update_many()
            .col_expr(counter.column(), Expr::value(value))
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("write_post_counter", e))?;

        Ok(())
    }

    /// Hard delete. Comments and likes must be removed first.
    pub async fn delete_post(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<(), InternalError> {
        let result = Post::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_post", e))?;

        if result.rows_affected == 0 {
            return Err(EntityError::post(id).into());
        }

        Ok(())
    }
}
