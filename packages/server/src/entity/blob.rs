use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blob")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub event_id: i32,
    #[sea_orm(belongs_to, from = "event_id", to = "id", on_delete = "Cascade")]
    pub event: HasOne<super::event::Entity>,

    /// Uploaded filename or external URL.
    #[sea_orm(column_type = "Text")]
    pub filename: String,

    /// 1-based for images, 0 for the single video attachment.
    pub place_order: i32,
}

impl ActiveModelBehavior for ActiveModel {}
