use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Bio).string().null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::IsSuperuser).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::Posts).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Comments).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Followers).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Followings).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Users::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create posts table
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Posts::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Posts::Text).string().not_null())
                    .col(ColumnDef::new(Posts::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Posts::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Posts::IsOwnerActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Posts::Comments).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::Likes).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Posts::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Posts::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_owner_id")
                            .from(Posts::Table, Posts::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create comments table
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Comments::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Comments::Text).string().not_null())
                    .col(ColumnDef::new(Comments::PostId).integer().not_null())
                    .col(ColumnDef::new(Comments::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Comments::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Comments::IsOwnerActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Comments::Likes).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Comments::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Comments::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_post_id")
                            .from(Comments::Table, Comments::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_owner_id")
                            .from(Comments::Table, Comments::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create likes table; exactly one of post_id / comment_id is set
        manager
            .create_table(
                Table::create()
                    .table(Likes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Likes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Likes::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Likes::PostId).integer().null())
                    .col(ColumnDef::new(Likes::CommentId).integer().null())
                    .col(ColumnDef::new(Likes::IsOwnerActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Likes::IsPostActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Likes::IsPostOwnerActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Likes::IsCommentActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Likes::IsCommentOwnerActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Likes::CreatedAt).string().not_null())
                    .check(Expr::cust("(post_id IS NULL) <> (comment_id IS NULL)"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_likes_owner_id")
                            .from(Likes::Table, Likes::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_likes_post_id")
                            .from(Likes::Table, Likes::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_likes_comment_id")
                            .from(Likes::Table, Likes::CommentId)
                            .to(Comments::Table, Comments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create follows table
        manager
            .create_table(
                Table::create()
                    .table(Follows::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Follows::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Follows::FollowerId).integer().not_null())
                    .col(ColumnDef::new(Follows::FollowingId).integer().not_null())
                    .col(ColumnDef::new(Follows::IsFollowerActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Follows::IsFollowingActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Follows::CreatedAt).string().not_null())
                    .check(Expr::col(Follows::FollowerId).ne(Expr::col(Follows::FollowingId)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_follower_id")
                            .from(Follows::Table, Follows::FollowerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follows_following_id")
                            .from(Follows::Table, Follows::FollowingId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Follows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Likes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Name,
    Bio,
    IsActive,
    IsSuperuser,
    Posts,
    Comments,
    Followers,
    Followings,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Posts {
    Table,
    Id,
    Text,
    OwnerId,
    IsActive,
    IsOwnerActive,
    Comments,
    Likes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Comments {
    Table,
    Id,
    Text,
    PostId,
    OwnerId,
    IsActive,
    IsOwnerActive,
    Likes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Likes {
    Table,
    Id,
    OwnerId,
    PostId,
    CommentId,
    IsOwnerActive,
    IsPostActive,
    IsPostOwnerActive,
    IsCommentActive,
    IsCommentOwnerActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Follows {
    Table,
    Id,
    FollowerId,
    FollowingId,
    IsFollowerActive,
    IsFollowingActive,
    CreatedAt,
}
