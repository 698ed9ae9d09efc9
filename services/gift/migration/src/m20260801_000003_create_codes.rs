use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Codes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Codes::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Codes::Status)
                            .string()
                            .not_null()
                            .default("unassigned"),
                    )
                    .col(ColumnDef::new(Codes::Pin).string().not_null())
                    .col(ColumnDef::new(Codes::PasswordHash).string())
                    .col(ColumnDef::new(Codes::ShopId).uuid())
                    .col(ColumnDef::new(Codes::ProductId).uuid())
                    .col(ColumnDef::new(Codes::MemoForUsers).text())
                    .col(ColumnDef::new(Codes::MemoForShop).text())
                    .col(
                        ColumnDef::new(Codes::FailedAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Codes::LockedUntil).timestamp_with_time_zone())
                    .col(ColumnDef::new(Codes::ActivatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Codes::ExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Codes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Codes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Codes::Table, Codes::ShopId)
                            .to(Shops::Table, Shops::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Codes::Table, Codes::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Codes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Codes {
    Table,
    Id,
    Status,
    Pin,
    PasswordHash,
    ShopId,
    ProductId,
    MemoForUsers,
    MemoForShop,
    FailedAttempts,
    LockedUntil,
    ActivatedAt,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Shops {
    Table,
    Id,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
}
