use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event-owning identity, paired 1:1 with a [`super::user`] row.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub events: HasMany<super::event::Entity>,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::event_like::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
