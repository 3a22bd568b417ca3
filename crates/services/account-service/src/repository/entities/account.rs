//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Account, PasswordDigest};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Email as registered, kept for display
    pub email: String,
    /// Lower-cased email; the unique index lives here
    #[sea_orm(unique)]
    pub email_normalized: String,
    pub password_digest: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            name: model.name,
            email: model.email,
            email_normalized: model.email_normalized,
            password_digest: PasswordDigest::from_stored(model.password_digest),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
