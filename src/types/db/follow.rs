use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,

    pub is_follower_active: bool,
    pub is_following_active: bool,

    pub created_at: String,
}

impl Model {
    pub fn is_visible(&self) -> bool {
        self.is_follower_active && self.is_following_active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
