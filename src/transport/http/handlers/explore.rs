//! Buyer-facing listing browse endpoints.

use crate::transport::http::error::ApiError;
use crate::transport::http::types::{AppState, ErrorResponse, PropertyDetail, PropertySummary};
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/explore",
    responses(
        (status = 200, description = "All listed properties (empty array if none)", body = [PropertySummary])
    )
)]
pub async fn explore(State(state): State<AppState>) -> Result<Json<Vec<PropertySummary>>, ApiError> {
    let properties = state.store.list_properties().await?;
    Ok(Json(properties.iter().map(PropertySummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/explore/{id}",
    params(("id" = i64, Path, description = "Property id")),
    responses(
        (status = 200, description = "Full property detail", body = PropertyDetail),
        (status = 404, description = "Unknown property", body = ErrorResponse)
    )
)]
pub async fn explore_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropertyDetail>, ApiError> {
    let property = state
        .store
        .property_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;
    Ok(Json(PropertyDetail::from(&property)))
}
