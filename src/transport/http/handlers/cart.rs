//! Cart endpoints, including the one-shot contact reveal.

use crate::app::RevealOutcome;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{
    require_json, AppState, BuyerRefRequest, CartPairRequest, CartResponse, EmailRevealResponse,
    ErrorResponse, MessageResponse, PropertySummary,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Resolves the (buyer, property) pair shared by the cart and interest
/// mutation endpoints: both ids present, both rows existing.
pub(super) async fn resolve_pair(
    state: &AppState,
    req: &CartPairRequest,
) -> Result<(i64, i64), ApiError> {
    let (buyer_id, property_id) = match (req.buyer_id, req.property_id) {
        (Some(b), Some(p)) => (b, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Buyer ID and Property ID are required".to_string(),
            ))
        }
    };
    if state.store.property_by_id(property_id).await?.is_none() {
        return Err(ApiError::NotFound("Property not found".to_string()));
    }
    if state.store.buyer_by_id(buyer_id).await?.is_none() {
        return Err(ApiError::NotFound("Buyer not found".to_string()));
    }
    Ok((buyer_id, property_id))
}

#[utoipa::path(
    post,
    path = "/cart/add",
    request_body = CartPairRequest,
    responses(
        (status = 201, description = "Property added to cart", body = MessageResponse),
        (status = 200, description = "Pair already in cart", body = MessageResponse),
        (status = 400, description = "Missing ids", body = ErrorResponse),
        (status = 404, description = "Unknown buyer or property", body = ErrorResponse)
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    request: Result<Json<CartPairRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;
    let (buyer_id, property_id) = resolve_pair(&state, &req).await?;

    if state.store.add_cart_item(buyer_id, property_id).await? {
        Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("Property added to cart successfully")),
        )
            .into_response())
    } else {
        Ok(Json(MessageResponse::new("Property already in cart")).into_response())
    }
}

#[utoipa::path(
    post,
    path = "/cart",
    request_body = BuyerRefRequest,
    responses(
        (status = 200, description = "Cart contents (empty array if none)", body = CartResponse),
        (status = 400, description = "Missing buyer id", body = ErrorResponse)
    )
)]
pub async fn view_cart(
    State(state): State<AppState>,
    request: Result<Json<BuyerRefRequest>, JsonRejection>,
) -> Result<Json<CartResponse>, ApiError> {
    let req = require_json(request)?;
    let buyer_id = req
        .buyer_id
        .ok_or_else(|| ApiError::BadRequest("Buyer ID is required".to_string()))?;

    let properties = state.store.cart_properties(buyer_id).await?;
    Ok(Json(CartResponse {
        cart: properties.iter().map(PropertySummary::from).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/cart/{buyer_id}/{property_id}",
    params(
        ("buyer_id" = i64, Path, description = "Buyer id"),
        ("property_id" = i64, Path, description = "Property id")
    ),
    responses(
        (status = 200, description = "Cart row removed", body = MessageResponse),
        (status = 404, description = "No such cart row", body = ErrorResponse)
    )
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((buyer_id, property_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.store.remove_cart_item(buyer_id, property_id).await? {
        Ok(Json(MessageResponse::new(
            "Property removed from cart successfully",
        )))
    } else {
        Err(ApiError::NotFound("Cart item not found".to_string()))
    }
}

#[utoipa::path(
    get,
    path = "/email/{buyer_id}/{property_id}",
    params(
        ("buyer_id" = i64, Path, description = "Buyer id"),
        ("property_id" = i64, Path, description = "Property id")
    ),
    responses(
        (status = 200, description = "Emails on first reveal; limit message afterwards", body = EmailRevealResponse),
        (status = 404, description = "No cart row for this pair", body = ErrorResponse)
    )
)]
pub async fn reveal_emails(
    State(state): State<AppState>,
    Path((buyer_id, property_id)): Path<(i64, i64)>,
) -> Result<Response, ApiError> {
    match state
        .store
        .claim_contact_reveal(buyer_id, property_id)
        .await?
    {
        RevealOutcome::Missing => Err(ApiError::NotFound("Cart item not found".to_string())),
        RevealOutcome::AlreadyRevealed => {
            Ok(Json(MessageResponse::new("Max limit reached")).into_response())
        }
        RevealOutcome::Granted {
            buyer_email,
            seller_email,
        } => Ok(Json(EmailRevealResponse {
            buyer_email,
            seller_email,
        })
        .into_response()),
    }
}
