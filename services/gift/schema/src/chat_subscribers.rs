use sea_orm::entity::prelude::*;

/// Notification subscription for a code's chat thread. Keyed by
/// (code_id, email); re-subscribing only updates the language preference.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_subscribers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub lang: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::codes::Entity",
        from = "Column::CodeId",
        to = "super::codes::Column::Id"
    )]
    Code,
}

impl Related<super::codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Code.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
