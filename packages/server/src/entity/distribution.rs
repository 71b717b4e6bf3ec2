use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "distribution")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub event_id: i32,
    #[sea_orm(belongs_to, from = "event_id", to = "id")]
    pub event: HasOne<super::event::Entity>,

    /// Points awarded to every name on the list. Validated 1..=100_000 at the
    /// write boundary; aggregation trusts it.
    pub amount: i32,
    /// Raw newline-separated recipient names, stored verbatim.
    #[sea_orm(column_type = "Text")]
    pub name_list: String,
    pub remark: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
