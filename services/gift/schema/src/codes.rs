use sea_orm::entity::prelude::*;

/// One physical gift code, tracked through its whole lifecycle.
///
/// `status` holds the snake_case string form of
/// `giftcode_domain::code::CodeStatus`. The rate-limit counters
/// (`failed_attempts`, `locked_until`) live on the code row itself so
/// lockout updates share the code's conditional-write path.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub status: String,
    pub pin: String,
    pub password_hash: Option<String>,
    pub shop_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub memo_for_users: Option<String>,
    pub memo_for_shop: Option<String>,
    pub failed_attempts: i32,
    pub locked_until: Option<chrono::DateTime<chrono::Utc>>,
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::orders::Entity")]
    Order,
    #[sea_orm(has_many = "super::chat_messages::Entity")]
    ChatMessages,
    #[sea_orm(has_many = "super::chat_subscribers::Entity")]
    ChatSubscribers,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::chat_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatMessages.def()
    }
}

impl Related<super::chat_subscribers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatSubscribers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
