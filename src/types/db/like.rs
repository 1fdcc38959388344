use sea_orm::entity::prelude::*;

/// A like on exactly one of a post or a comment.
///
/// Every `is_*_active` column is a mirror of some root flag. The pair of
/// mirrors belonging to the target kind that is not set stays `true` and is
/// never consulted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "likes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub post_id: Option<i32>,
    pub comment_id: Option<i32>,

    pub is_owner_active: bool,
    pub is_post_active: bool,
    pub is_post_owner_active: bool,
    pub is_comment_active: bool,
    pub is_comment_owner_active: bool,

    pub created_at: String,
}

impl Model {
    pub fn is_visible(&self) -> bool {
        if self.post_id.is_some() {
            self.is_owner_active && self.is_post_active && self.is_post_owner_active
        } else {
            self.is_owner_active && self.is_comment_active && self.is_comment_owner_active
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
