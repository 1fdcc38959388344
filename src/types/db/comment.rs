use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub owner_id: i32,

    pub is_active: bool,
    /// Mirrors the owner's `is_active`
    pub is_owner_active: bool,

    pub likes: i64,

    pub created_at: String,
    pub updated_at: String,
}

impl Model {
    pub fn is_visible(&self) -> bool {
        self.is_active && self.is_owner_active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
