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
                    .table(PlatformIdentities::Table)
                    .if_not_exists()
                    .col(uuid(PlatformIdentities::Id).primary_key())
                    .col(uuid(PlatformIdentities::UserId))
                    .col(string(PlatformIdentities::Platform))
                    .col(string(PlatformIdentities::ExternalUrn))
                    .col(string(PlatformIdentities::AccessToken))
                    .col(timestamp_with_time_zone(PlatformIdentities::ConnectedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_platform_identities_user_id")
                            .from(PlatformIdentities::Table, PlatformIdentities::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One identity per user and platform.
        manager
            .create_index(
                Index::create()
                    .name("idx_platform_identities_user_platform")
                    .table(PlatformIdentities::Table)
                    .col(PlatformIdentities::UserId)
                    .col(PlatformIdentities::Platform)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlatformIdentities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PlatformIdentities {
    Table,
    Id,
    UserId,
    Platform,
    ExternalUrn,
    AccessToken,
    ConnectedAt,
}
