//! Registration and login for the two user roles.
//!
//! Account creation and token verification are delegated to the external
//! identity provider; only verified identities are persisted.

use crate::transport::http::error::{is_unique_violation, ApiError};
use crate::transport::http::types::{
    require_json, AppState, BuyerLoginResponse, ErrorResponse, GoogleSignInResponse, LoginRequest,
    RegisterBuyerRequest, RegisterSellerRequest, RegisteredResponse, SellerLoginResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/buyer/register",
    request_body = RegisterBuyerRequest,
    responses(
        (status = 201, description = "Buyer registered", body = RegisteredResponse),
        (status = 400, description = "Provider rejection or duplicate account", body = ErrorResponse)
    )
)]
pub async fn buyer_register(
    State(state): State<AppState>,
    request: Result<Json<RegisterBuyerRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;

    // Any provider refusal (weak password, email in use, ...) is a 400.
    let uid = state
        .identity
        .create_user(&req.email, &req.password)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match state
        .store
        .insert_buyer(&uid, &req.name, &req.email, Some(&req.phone))
        .await
    {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(RegisteredResponse {
                message: "Buyer registered successfully".to_string(),
                uid,
            }),
        )
            .into_response()),
        Err(e) if is_unique_violation(&e) => Err(ApiError::BadRequest(
            "Email or phone already registered".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/buyer/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = BuyerLoginResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "No buyer account for this identity", body = ErrorResponse)
    )
)]
pub async fn buyer_login(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;
    let identity = state.identity.verify_token(&req.id_token).await?;

    match state.store.buyer_by_provider_uid(&identity.uid).await? {
        Some(buyer) => Ok(Json(BuyerLoginResponse {
            message: "Buyer login successful".to_string(),
            user_id: buyer.id,
            name: buyer.name,
            phone: buyer.phone,
        })
        .into_response()),
        None => Err(ApiError::NotFound("Buyer not found".to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/seller/register",
    request_body = RegisterSellerRequest,
    responses(
        (status = 201, description = "Seller registered", body = RegisteredResponse),
        (status = 400, description = "Provider rejection or duplicate account", body = ErrorResponse)
    )
)]
pub async fn seller_register(
    State(state): State<AppState>,
    request: Result<Json<RegisterSellerRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;

    let uid = state
        .identity
        .create_user(&req.email, &req.password)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match state.store.insert_seller(&uid, &req.name, &req.email).await {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(RegisteredResponse {
                message: "Seller registered successfully".to_string(),
                uid,
            }),
        )
            .into_response()),
        Err(e) if is_unique_violation(&e) => {
            Err(ApiError::BadRequest("Email already registered".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/seller/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SellerLoginResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "No seller account for this identity", body = ErrorResponse)
    )
)]
pub async fn seller_login(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;
    let identity = state.identity.verify_token(&req.id_token).await?;

    match state.store.seller_by_provider_uid(&identity.uid).await? {
        Some(seller) => Ok(Json(SellerLoginResponse {
            message: "Seller login successful".to_string(),
            user_id: seller.id,
        })
        .into_response()),
        None => Err(ApiError::NotFound("Seller not found".to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/google-signin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Existing buyer or seller logged in", body = GoogleSignInResponse),
        (status = 201, description = "New identity registered as buyer", body = GoogleSignInResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    )
)]
pub async fn google_signin(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = require_json(request)?;
    let identity = state.identity.verify_token(&req.id_token).await?;

    if let Some(buyer) = state.store.buyer_by_provider_uid(&identity.uid).await? {
        return Ok(Json(GoogleSignInResponse {
            message: "Google login successful".to_string(),
            role: "buyer".to_string(),
            user_id: buyer.id,
        })
        .into_response());
    }
    if let Some(seller) = state.store.seller_by_provider_uid(&identity.uid).await? {
        return Ok(Json(GoogleSignInResponse {
            message: "Google login successful".to_string(),
            role: "seller".to_string(),
            user_id: seller.id,
        })
        .into_response());
    }

    // First sign-in: register as buyer. Phone is unknown at this point.
    let name = identity
        .name
        .clone()
        .unwrap_or_else(|| "Google User".to_string());
    match state
        .store
        .insert_buyer(&identity.uid, &name, &identity.email, None)
        .await
    {
        Ok(id) => Ok((
            StatusCode::CREATED,
            Json(GoogleSignInResponse {
                message: "New Google user registered as buyer".to_string(),
                role: "buyer".to_string(),
                user_id: id,
            }),
        )
            .into_response()),
        // Lost a concurrent first-sign-in race; the row exists now.
        Err(e) if is_unique_violation(&e) => {
            let buyer = state
                .store
                .buyer_by_provider_uid(&identity.uid)
                .await?
                .ok_or_else(|| {
                    ApiError::Internal("buyer vanished after conflicting insert".to_string())
                })?;
            Ok(Json(GoogleSignInResponse {
                message: "Google login successful".to_string(),
                role: "buyer".to_string(),
                user_id: buyer.id,
            })
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
