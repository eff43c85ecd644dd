use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of post, derived from the attachments supplied on every write.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    #[sea_orm(string_value = "TEXT")]
    Text,
    #[sea_orm(string_value = "IMAGE")]
    Image,
    #[sea_orm(string_value = "VIDEO")]
    Video,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub event_type: EventType,

    pub county_id: i32,
    #[sea_orm(belongs_to, from = "county_id", to = "id")]
    pub county: HasOne<super::county::Entity>,

    pub profile_id: i32,
    #[sea_orm(belongs_to, from = "profile_id", to = "id", on_delete = "Cascade")]
    pub profile: HasOne<super::user_profile::Entity>,

    /// Denormalized count of `event_like` rows, written in the same
    /// transaction as the like row itself.
    pub likes: i32,

    #[sea_orm(has_many)]
    pub blobs: HasMany<super::blob::Entity>,

    #[sea_orm(has_many)]
    pub liked_by: HasMany<super::event_like::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
