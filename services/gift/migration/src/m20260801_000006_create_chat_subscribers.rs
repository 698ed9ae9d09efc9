use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatSubscribers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ChatSubscribers::CodeId).uuid().not_null())
                    .col(ColumnDef::new(ChatSubscribers::Email).string().not_null())
                    .col(
                        ColumnDef::new(ChatSubscribers::Lang)
                            .string()
                            .not_null()
                            .default("en"),
                    )
                    .col(
                        ColumnDef::new(ChatSubscribers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ChatSubscribers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ChatSubscribers::CodeId)
                            .col(ChatSubscribers::Email),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ChatSubscribers::Table, ChatSubscribers::CodeId)
                            .to(Codes::Table, Codes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatSubscribers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ChatSubscribers {
    Table,
    CodeId,
    Email,
    Lang,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Codes {
    Table,
    Id,
}
