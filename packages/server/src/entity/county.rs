use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "county")]
pub struct Model {
    /// Numeric FIPS code (state digits followed by three county digits).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub name: String,
    pub state: String,

    /// Zero-padded five digit form of the FIPS code, e.g. `"06085"`.
    #[sea_orm(unique)]
    pub county_key: String,

    #[sea_orm(has_many)]
    pub events: HasMany<super::event::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
