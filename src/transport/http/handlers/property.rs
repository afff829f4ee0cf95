//! Seller portal: upload, history, update, delete.

use crate::app::{DeleteOutcome, NewProperty, PropertyPatch};
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{
    require_json, AppState, ErrorResponse, MessageResponse, SellerHistoryParams,
    SellerPropertySummary, UpdatePropertyRequest, UploadPropertyRequest, UploadResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/upload",
    request_body = UploadPropertyRequest,
    responses(
        (status = 201, description = "Property uploaded", body = UploadResponse),
        (status = 400, description = "Required fields missing", body = ErrorResponse),
        (status = 404, description = "Unknown seller", body = ErrorResponse)
    )
)]
pub async fn upload_property(
    State(state): State<AppState>,
    request: Result<Json<UploadPropertyRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;

    let missing: Vec<&str> = [
        ("seller_id", req.seller_id.is_none()),
        ("name", req.name.is_none()),
        ("owner_name", req.owner_name.is_none()),
        ("location", req.location.is_none()),
        ("price_range", req.price_range.is_none()),
        ("size", req.size.is_none()),
        ("type", req.property_type.is_none()),
        ("description", req.description.is_none()),
        ("contacts", req.contacts.is_none()),
    ]
    .into_iter()
    .filter(|(_, absent)| *absent)
    .map(|(field, _)| field)
    .collect();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    // All required fields checked above; the defaults are unreachable.
    let new = NewProperty {
        seller_id: req.seller_id.unwrap_or_default(),
        name: req.name.unwrap_or_default(),
        owner_name: req.owner_name.unwrap_or_default(),
        location: req.location.unwrap_or_default(),
        address: req.address.unwrap_or_default(),
        price_range: req.price_range.unwrap_or_default(),
        negotiable: req.negotiable,
        size: req.size.unwrap_or_default(),
        property_type: req.property_type.unwrap_or_default(),
        description: req.description.unwrap_or_default(),
        contacts: req.contacts.unwrap_or_default(),
        images: req.images,
        amenities: req.amenities,
        ownership_document: req.ownership_document,
    };

    if state.store.seller_by_id(new.seller_id).await?.is_none() {
        return Err(ApiError::NotFound("Seller not found".to_string()));
    }

    let id = state.store.insert_property(&new).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Property uploaded successfully".to_string(),
            id,
        }),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/property/history",
    params(SellerHistoryParams),
    responses(
        (status = 200, description = "Seller's uploads (empty array if none)", body = [SellerPropertySummary]),
        (status = 400, description = "Missing seller id", body = ErrorResponse)
    )
)]
pub async fn upload_history(
    State(state): State<AppState>,
    Query(params): Query<SellerHistoryParams>,
) -> Result<Json<Vec<SellerPropertySummary>>, ApiError> {
    let seller_id = params
        .seller_id
        .ok_or_else(|| ApiError::BadRequest("Seller ID is required".to_string()))?;

    let properties = state.store.properties_by_seller(seller_id).await?;
    Ok(Json(
        properties.iter().map(SellerPropertySummary::from).collect(),
    ))
}

#[utoipa::path(
    put,
    path = "/property/update/{id}",
    params(("id" = i64, Path, description = "Property id")),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Fields present in the payload overwritten", body = MessageResponse),
        (status = 404, description = "Unknown property", body = ErrorResponse)
    )
)]
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<UpdatePropertyRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = require_json(request)?;
    let patch = PropertyPatch {
        name: req.name,
        owner_name: req.owner_name,
        location: req.location,
        address: req.address,
        price_range: req.price_range,
        negotiable: req.negotiable,
        size: req.size,
        property_type: req.property_type,
        description: req.description,
        contacts: req.contacts,
        images: req.images,
        amenities: req.amenities,
    };

    if state.store.update_property(id, &patch).await? {
        Ok(Json(MessageResponse::new("Property updated successfully")))
    } else {
        Err(ApiError::NotFound("Property not found".to_string()))
    }
}

#[utoipa::path(
    delete,
    path = "/property/delete/{id}",
    params(("id" = i64, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property and its cart/interest rows removed", body = MessageResponse),
        (status = 404, description = "Unknown property", body = ErrorResponse),
        (status = 409, description = "Order history references the property", body = ErrorResponse)
    )
)]
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state.store.delete_property(id).await? {
        DeleteOutcome::NotFound => Err(ApiError::NotFound("Property not found".to_string())),
        DeleteOutcome::Blocked => Err(ApiError::Conflict(
            "Property has order history and cannot be deleted".to_string(),
        )),
        DeleteOutcome::Deleted => Ok(Json(MessageResponse::new(
            "Property deleted successfully",
        ))),
    }
}
