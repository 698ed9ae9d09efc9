use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Secondary indexes backing the two listing paths: status-scoped
// (admin dashboard, most-recently-updated first) and shop-scoped.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Codes::Table)
                    .col(Codes::Status)
                    .col(Codes::UpdatedAt)
                    .name("idx_codes_status_updated_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Codes::Table)
                    .col(Codes::ShopId)
                    .name("idx_codes_shop_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(ChatMessages::Table)
                    .col(ChatMessages::CodeId)
                    .name("idx_chat_messages_code_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_chat_messages_code_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_codes_shop_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_codes_status_updated_at").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Codes {
    Table,
    Status,
    UpdatedAt,
    ShopId,
}

#[derive(Iden)]
enum ChatMessages {
    Table,
    CodeId,
}
