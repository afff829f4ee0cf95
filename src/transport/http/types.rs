use crate::app::Store;
use crate::domain::{OrderStatus, Property};
use crate::infra::identity::IdentityProvider;
use crate::transport::http::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Unwraps a JSON body, mapping malformed/missing-field payloads to 400.
pub fn require_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(err) => Err(ApiError::BadRequest(format!("Invalid JSON body: {}", err))),
    }
}

// ------------------------------------------------------------------ requests

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterBuyerRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterSellerRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Accepts both `id_token` and the legacy `idToken` spelling.
#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "idToken")]
    pub id_token: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CartPairRequest {
    pub buyer_id: Option<i64>,
    pub property_id: Option<i64>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct BuyerRefRequest {
    pub buyer_id: Option<i64>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UploadPropertyRequest {
    pub seller_id: Option<i64>,
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub price_range: Option<String>,
    #[serde(default)]
    pub negotiable: bool,
    pub size: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub contacts: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub ownership_document: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct UpdatePropertyRequest {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub negotiable: Option<bool>,
    pub size: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub contacts: Option<String>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct PlaceOrderRequest {
    pub buyer_id: Option<i64>,
    pub seller_id: Option<i64>,
    pub property_id: Option<i64>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct OrderStatusRequest {
    pub status: String,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct SellerHistoryParams {
    pub seller_id: Option<i64>,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct BuyerHistoryParams {
    pub buyer_id: Option<i64>,
}

// ----------------------------------------------------------------- responses

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RegisteredResponse {
    pub message: String,
    pub uid: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct BuyerLoginResponse {
    pub message: String,
    pub user_id: i64,
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SellerLoginResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct GoogleSignInResponse {
    pub message: String,
    pub role: String,
    pub user_id: i64,
}

/// Buyer-facing listing summary (explore, cart, interest).
#[derive(Serialize, Debug, ToSchema)]
pub struct PropertySummary {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub price: String,
    pub images: Vec<String>,
    pub size: String,
    pub amenities: Vec<String>,
}

impl From<&Property> for PropertySummary {
    fn from(p: &Property) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            location: p.location.clone(),
            price: p.price_range.clone(),
            images: p.images.clone(),
            size: p.size.clone(),
            amenities: p.amenities.clone(),
        }
    }
}

/// Buyer-facing detail view. Deliberately carries no `ownership_document`.
#[derive(Serialize, Debug, ToSchema)]
pub struct PropertyDetail {
    pub name: String,
    pub location: String,
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub owner: String,
    pub negotiable: bool,
    pub price: String,
    pub size: String,
    pub contacts: String,
    pub amenities: Vec<String>,
    pub description: String,
    pub images: Vec<String>,
}

impl From<&Property> for PropertyDetail {
    fn from(p: &Property) -> Self {
        Self {
            name: p.name.clone(),
            location: p.location.clone(),
            address: p.address.clone(),
            property_type: p.property_type.clone(),
            owner: p.owner_name.clone(),
            negotiable: p.negotiable,
            price: p.price_range.clone(),
            size: p.size.clone(),
            contacts: p.contacts.clone(),
            amenities: p.amenities.clone(),
            description: p.description.clone(),
            images: p.images.clone(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CartResponse {
    pub cart: Vec<PropertySummary>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct InterestResponse {
    pub interests: Vec<PropertySummary>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct EmailRevealResponse {
    pub buyer_email: String,
    pub seller_email: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub id: i64,
}

/// Seller-facing listing summary (upload history).
#[derive(Serialize, Debug, ToSchema)]
pub struct SellerPropertySummary {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub price_range: String,
}

impl From<&Property> for SellerPropertySummary {
    fn from(p: &Property) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            location: p.location.clone(),
            price_range: p.price_range.clone(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct OrderPlacedResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct OrderSummary {
    pub id: i64,
    pub property_id: i64,
    pub status: OrderStatus,
}
