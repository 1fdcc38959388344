use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub bio: Option<String>,

    // Root flag, set only by the user or a superuser
    pub is_active: bool,
    pub is_superuser: bool,

    // Denormalized counters
    pub posts: i64,
    pub comments: i64,
    pub followers: i64,
    pub followings: i64,

    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
