use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, EntityError};
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::page::Page;
use crate::types::internal::updates::UserProfileUpdate;

/// Denormalized counters stored on a user row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCounter {
    Posts,
    Comments,
    Followers,
    Followings,
}

impl UserCounter {
    fn column(self) -> user::Column {
        match self {
            UserCounter::Posts => user::Column::Posts,
            UserCounter::Comments => user::Column::Comments,
            UserCounter::Followers => user::Column::Followers,
            UserCounter::Followings => user::Column::Followings,
        }
    }
}

/// Fields of a new user row
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: String,
    pub name: &'a str,
    pub bio: Option<&'a str>,
    pub is_superuser: bool,
}

/// UserStore manages user rows
#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new, active user with zeroed counters
    ///
    /// # Errors
    /// * `CredentialError::DuplicateUsername` - username already taken
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser<'_>,
        now: &str,
    ) -> Result<user::Model, InternalError> {
        if self.find_by_username(conn, new_user.username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername(new_user.username.to_string()).into());
        }

        let model = ActiveModel {
            username: Set(new_user.username.to_string()),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name.to_string()),
            bio: Set(new_user.bio.map(str::to_string)),
            is_active: Set(true),
            is_superuser: Set(new_user.is_superuser),
            posts: Set(0),
            comments: Set(0),
            followers: Set(0),
            followings: Set(0),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        };

        model.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CredentialError::DuplicateUsername(new_user.username.to_string()).into()
            }
            _ => InternalError::database("create_user", e),
        })
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// # Errors
    /// * `EntityError::NotFound` - no user with this id
    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, id)
            .await?
            .ok_or_else(|| EntityError::user(id).into())
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    /// # Errors
    /// * `EntityError::NotFound` - no user with this username
    pub async fn get_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<user::Model, InternalError> {
        self.find_by_username(conn, username)
            .await?
            .ok_or_else(|| EntityError::username(username).into())
    }

    /// Fetch users by id, in the order of `ids`. Missing ids are skipped.
    pub async fn find_many(
        &self,
        conn: &impl ConnectionTrait,
        ids: &[i32],
    ) -> Result<Vec<user::Model>, InternalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut users = User::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_users_by_ids", e))?;

        users.sort_by_key(|u| ids.iter().position(|id| *id == u.id));
        Ok(users)
    }

    /// Active users, newest first
    pub async fn list_active(
        &self,
        conn: &impl ConnectionTrait,
        page: Page,
    ) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::IsActive.eq(true))
            .order_by_desc(user::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_users", e))
    }

    /// Every user regardless of state, newest first
    pub async fn list_all(
        &self,
        conn: &impl ConnectionTrait,
        page: Page,
    ) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_desc(user::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_all_users", e))
    }

    pub async fn update_profile(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        update: &UserProfileUpdate,
        now: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self.get_by_id(conn, id).await?;

        let mut active_model: ActiveModel = user.into();
        if let Some(name) = &update.name {
            active_model.name = Set(name.clone());
        }
        if let Some(bio) = &update.bio {
            active_model.bio = Set(bio.clone());
        }
        active_model.updated_at = Set(now.to_string());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user_profile", e))
    }

    /// Write the root `is_active` flag. Does not cascade.
    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        active: bool,
        now: &str,
    ) -> Result<(), InternalError> {
        User::update_many()
            .col_expr(user::Column::IsActive, Expr::value(active))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_user_active", e))?;

        Ok(())
    }

    pub async fn set_superuser(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        is_superuser: bool,
        now: &str,
    ) -> Result<(), InternalError> {
        User::update_many()
            .col_expr(user::Column::IsSuperuser, Expr::value(is_superuser))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("set_user_superuser", e))?;

        Ok(())
    }

    pub async fn write_counter(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
        counter: UserCounter,
        value: i64,
    ) -> Result<(), InternalError> {
        User::update_many()
            .col_expr(counter.column(), Expr::value(value))
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("write_user_counter", e))?;

        Ok(())
    }
}
