use sea_orm_migration::prelude::*;

mod m20260801_000001_create_shops;
mod m20260801_000002_create_products;
mod m20260801_000003_create_codes;
mod m20260801_000004_create_orders;
mod m20260801_000005_create_chat_messages;
mod m20260801_000006_create_chat_subscribers;
mod m20260801_000007_add_listing_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_shops::Migration),
            Box::new(m20260801_000002_create_products::Migration),
            Box::new(m20260801_000003_create_codes::Migration),
            Box::new(m20260801_000004_create_orders::Migration),
            Box::new(m20260801_000005_create_chat_messages::Migration),
            Box::new(m20260801_000006_create_chat_subscribers::Migration),
            Box::new(m20260801_000007_add_listing_indexes::Migration),
        ]
    }
}
