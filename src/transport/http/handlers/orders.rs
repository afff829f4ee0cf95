//! Order placement, history, and the status transition.

use crate::domain::OrderStatus;
use crate::transport::http::error::{is_foreign_key_violation, ApiError};
use crate::transport::http::types::{
    require_json, AppState, BuyerHistoryParams, ErrorResponse, MessageResponse,
    OrderPlacedResponse, OrderStatusRequest, OrderSummary, PlaceOrderRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/order",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order created with status Pending", body = OrderPlacedResponse),
        (status = 400, description = "Missing ids", body = ErrorResponse),
        (status = 404, description = "Unknown buyer, seller or property", body = ErrorResponse)
    )
)]
pub async fn place_order(
    State(state): State<AppState>,
    request: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;
    let (buyer_id, seller_id, property_id) = match (req.buyer_id, req.seller_id, req.property_id) {
        (Some(b), Some(s), Some(p)) => (b, s, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Buyer ID, Seller ID and Property ID are required".to_string(),
            ))
        }
    };

    match state
        .store
        .insert_order(buyer_id, seller_id, property_id)
        .await
    {
        Ok(id) => Ok((
            StatusCode::CREATED,
            Json(OrderPlacedResponse {
                message: "Order placed successfully".to_string(),
                id,
            }),
        )
            .into_response()),
        Err(e) if is_foreign_key_violation(&e) => Err(ApiError::NotFound(
            "Buyer, seller or property not found".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/order/history",
    params(BuyerHistoryParams),
    responses(
        (status = 200, description = "Buyer's orders (empty array if none)", body = [OrderSummary]),
        (status = 400, description = "Missing buyer id", body = ErrorResponse)
    )
)]
pub async fn order_history(
    State(state): State<AppState>,
    Query(params): Query<BuyerHistoryParams>,
) -> Result<Json<Vec<OrderSummary>>, ApiError> {
    let buyer_id = params
        .buyer_id
        .ok_or_else(|| ApiError::BadRequest("Buyer ID is required".to_string()))?;

    let orders = state.store.orders_by_buyer(buyer_id).await?;
    Ok(Json(
        orders
            .iter()
            .map(|o| OrderSummary {
                id: o.id,
                property_id: o.property_id,
                status: o.status,
            })
            .collect(),
    ))
}

#[utoipa::path(
    put,
    path = "/order/update/{id}",
    params(("id" = i64, Path, description = "Order id")),
    request_body = OrderStatusRequest,
    responses(
        (status = 200, description = "Status transition applied", body = MessageResponse),
        (status = 400, description = "Unknown status value", body = ErrorResponse),
        (status = 404, description = "Unknown order", body = ErrorResponse)
    )
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<OrderStatusRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = require_json(request)?;
    let status: OrderStatus = req.status.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "Unknown order status '{}' (expected Pending, Confirmed or Rejected)",
            req.status
        ))
    })?;

    if state.store.update_order_status(id, status).await? {
        Ok(Json(MessageResponse::new("Order status updated")))
    } else {
        Err(ApiError::NotFound("Order not found".to_string()))
    }
}
