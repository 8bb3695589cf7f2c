//! Contact message entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contact_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub read: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for folio_core::domain::ContactMessage {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            message: model.message,
            read: model.read,
            created_at: model.created_at.into(),
        }
    }
}

impl From<folio_core::domain::ContactMessage> for ActiveModel {
    fn from(message: folio_core::domain::ContactMessage) -> Self {
        Self {
            id: Set(message.id),
            email: Set(message.email),
            message: Set(message.message),
            read: Set(message.read),
            created_at: Set(message.created_at.into()),
        }
    }
}
