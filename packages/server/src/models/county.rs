use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use super::shared::Pagination;
use crate::entity::county;

/// County fields embedded in event responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CountySummary {
    #[schema(example = 6085)]
    pub id: i32,
    #[schema(example = "Santa Clara")]
    pub name: String,
    #[schema(example = "CA")]
    pub state: String,
}

impl From<county::Model> for CountySummary {
    fn from(c: county::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            state: c.state,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CountyResponse {
    #[schema(example = 6085)]
    pub id: i32,
    #[schema(example = "Santa Clara")]
    pub name: String,
    #[schema(example = "CA")]
    pub state: String,
    /// Zero-padded five digit FIPS code.
    #[schema(example = "06085")]
    pub key: String,
}

impl From<county::Model> for CountyResponse {
    fn from(c: county::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            state: c.state,
            key: c.county_key,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountyListQuery {
    /// Filter by state abbreviation (case-insensitive).
    pub state: Option<String>,
    /// Page number (1-based, default 1).
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    pub per_page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CountyListResponse {
    pub data: Vec<CountyResponse>,
    pub pagination: Pagination,
}

/// One entry of the county seed file.
#[derive(Debug, Deserialize)]
pub struct CountySeed {
    pub id: i32,
    pub name: String,
    pub state: String,
    pub key: String,
}
