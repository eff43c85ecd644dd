use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::*;
use tracing::instrument;

use crate::entity::county;
use crate::error::{AppError, ErrorBody};
use crate::models::county::{CountyListQuery, CountyListResponse, CountyResponse};
use crate::models::shared::Pagination;
use crate::repository::PageRequest;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Counties",
    operation_id = "listCounties",
    summary = "List counties",
    description = "Ordered by state, then name.",
    params(CountyListQuery),
    responses(
        (status = 200, description = "Counties", body = CountyListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_counties(
    State(state): State<AppState>,
    Query(query): Query<CountyListQuery>,
) -> Result<Json<CountyListResponse>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);

    let mut select = county::Entity::find();
    if let Some(ref st) = query.state {
        let st = st.trim().to_uppercase();
        if !st.is_empty() {
            select = select.filter(county::Column::State.eq(st));
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, page.per_page)
        .num_items()
        .await?;

    let data = select
        .order_by_asc(county::Column::State)
        .order_by_asc(county::Column::Name)
        .offset(Some(page.offset()))
        .limit(Some(page.per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(CountyResponse::from)
        .collect();

    Ok(Json(CountyListResponse {
        data,
        pagination: Pagination {
            page: page.page,
            per_page: page.per_page,
            total,
            total_pages: total.div_ceil(page.per_page),
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Counties",
    operation_id = "getCounty",
    summary = "Get a county",
    description = "Ids that lost their leading zeros (`6085`) resolve to the padded key (`06085`).",
    params(("id" = i32, Path, description = "County ID")),
    responses(
        (status = 200, description = "County", body = CountyResponse),
        (status = 404, description = "County not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_county(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CountyResponse>, AppError> {
    let county = state
        .events
        .find_county(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("County {id} not found")))?;
    Ok(Json(CountyResponse::from(county)))
}
