use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260115_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(uuid(Posts::Id).primary_key())
                    .col(uuid(Posts::UserId))
                    .col(text(Posts::Content))
                    .col(boolean_null(Posts::ShareNow))
                    .col(timestamp_with_time_zone_null(Posts::ShareAt))
                    .col(timestamp_with_time_zone_null(Posts::ShareStartAt))
                    .col(timestamp_with_time_zone_null(Posts::ShareCompleteAt))
                    .col(boolean(Posts::ShareOnLinkedin).default(false))
                    .col(timestamp_with_time_zone_null(Posts::SharedAtLinkedin))
                    .col(timestamp_with_time_zone(Posts::CreatedAt))
                    .col(timestamp_with_time_zone(Posts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_user_id")
                            .from(Posts::Table, Posts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Scheduler triggers scan by due time.
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_share_at")
                    .table(Posts::Table)
                    .col(Posts::ShareAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Posts {
    Table,
    Id,
    UserId,
    Content,
    ShareNow,
    ShareAt,
    ShareStartAt,
    ShareCompleteAt,
    ShareOnLinkedin,
    SharedAtLinkedin,
    CreatedAt,
    UpdatedAt,
}
