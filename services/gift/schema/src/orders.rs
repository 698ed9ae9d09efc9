use sea_orm::entity::prelude::*;

/// Shipping details attached to a used code (one-to-one, keyed by the
/// code id). Carrier/tracking are filled in at shipment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code_id: Uuid,
    pub recipient_name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<chrono::DateTime<chrono::Utc>>,
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
