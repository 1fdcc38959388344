use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_social_schema::{Comments, Follows, Likes, Posts};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_owner_id")
                    .table(Posts::Table)
                    .col(Posts::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_post_id")
                    .table(Comments::Table)
                    .col(Comments::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_owner_id")
                    .table(Comments::Table)
                    .col(Comments::OwnerId)
                    .to_owned(),
            )
            .await?;

        // One like per (owner, target). NULL targets never collide.
        manager
            .create_index(
                Index::create()
                    .name("idx_likes_owner_post")
                    .table(Likes::Table)
                    .col(Likes::OwnerId)
                    .col(Likes::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_likes_owner_comment")
                    .table(Likes::Table)
                    .col(Likes::OwnerId)
                    .col(Likes::CommentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_likes_post_id")
                    .table(Likes::Table)
                    .col(Likes::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_likes_comment_id")
                    .table(Likes::Table)
                    .col(Likes::CommentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_follows_pair")
                    .table(Follows::Table)
                    .col(Follows::FollowerId)
                    .col(Follows::FollowingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_follows_following_id")
                    .table(Follows::Table)
                    .col(Follows::FollowingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_follows_following_id", "idx_follows_pair"] {
            manager
                .drop_index(Index::drop().name(name).table(Follows::Table).to_owned())
                .await?;
        }

        for name in [
            "idx_likes_comment_id",
            "idx_likes_post_id",
            "idx_likes_owner_comment",
            "idx_likes_owner_post",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Likes::Table).to_owned())
                .await?;
        }

        for name in ["idx_comments_owner_id", "idx_comments_post_id"] {
            manager
                .drop_index(Index::drop().name(name).table(Comments::Table).to_owned())
                .await?;
        }

        manager
            .drop_index(Index::drop().name("idx_posts_owner_id").table(Posts::Table).to_owned())
            .await?;

        Ok(())
    }
}
