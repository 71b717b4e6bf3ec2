use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub event_date: DateTimeUtc,
    /// Display name of whoever requested the event; not a user reference.
    pub requestor: String,
    pub region: String,
    /// One of: Pending, Completed, Rejected
    pub status: String,

    /// Audit trail of the most recent edit (organizer username or "Bot").
    pub last_editor: Option<String>,
    pub last_change: Option<String>,

    #[sea_orm(has_many)]
    pub distributions: HasMany<super::distribution::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
