//! Interest-list endpoints (the buyer's wishlist, parallel to the cart).

use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::cart::resolve_pair;
use crate::transport::http::types::{
    require_json, AppState, BuyerRefRequest, CartPairRequest, ErrorResponse, InterestResponse,
    MessageResponse, PropertySummary,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/interest/add",
    request_body = CartPairRequest,
    responses(
        (status = 201, description = "Added to interest list", body = MessageResponse),
        (status = 200, description = "Pair already on the list", body = MessageResponse),
        (status = 400, description = "Missing ids", body = ErrorResponse),
        (status = 404, description = "Unknown buyer or property", body = ErrorResponse)
    )
)]
pub async fn add_interest(
    State(state): State<AppState>,
    request: Result<Json<CartPairRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;
    let (buyer_id, property_id) = resolve_pair(&state, &req).await?;

    if state.store.add_interest_item(buyer_id, property_id).await? {
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Added to interest")),
        )
            .into_response())
    } else {
        Ok(Json(MessageResponse::new("Already added to interest")).into_response())
    }
}

#[utoipa::path(
    post,
    path = "/interest",
    request_body = BuyerRefRequest,
    responses(
        (status = 200, description = "Interest list (empty array if none)", body = InterestResponse),
        (status = 400, description = "Missing buyer id", body = ErrorResponse)
    )
)]
pub async fn view_interest(
    State(state): State<AppState>,
    request: Result<Json<BuyerRefRequest>, JsonRejection>,
) -> Result<Json<InterestResponse>, ApiError> {
    let req = require_json(request)?;
    let buyer_id = req
        .buyer_id
        .ok_or_else(|| ApiError::BadRequest("Buyer ID is required".to_string()))?;

    let properties = state.store.interest_properties(buyer_id).await?;
    Ok(Json(InterestResponse {
        interests: properties.iter().map(PropertySummary::from).collect(),
    }))
}
