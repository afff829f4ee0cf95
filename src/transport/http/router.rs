use crate::domain::OrderStatus;
use crate::transport::http::handlers::{auth, cart, explore, health, interest, orders, property};
use crate::transport::http::types::{
    BuyerLoginResponse, BuyerRefRequest, CartPairRequest, CartResponse, EmailRevealResponse,
    ErrorResponse, GoogleSignInResponse, InterestResponse, LoginRequest, MessageResponse,
    OrderPlacedResponse, OrderStatusRequest, OrderSummary, PlaceOrderRequest, PropertyDetail,
    PropertySummary, RegisterBuyerRequest, RegisterSellerRequest, RegisteredResponse,
    SellerLoginResponse, SellerPropertySummary, UpdatePropertyRequest, UploadPropertyRequest,
    UploadResponse,
};
use axum::routing::{delete, get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        auth::buyer_register,
        auth::buyer_login,
        auth::seller_register,
        auth::seller_login,
        auth::google_signin,
        explore::explore,
        explore::explore_property,
        cart::add_to_cart,
        cart::view_cart,
        cart::remove_cart_item,
        cart::reveal_emails,
        interest::add_interest,
        interest::view_interest,
        property::upload_property,
        property::upload_history,
        property::update_property,
        property::delete_property,
        orders::place_order,
        orders::order_history,
        orders::update_order_status
    ),
    components(schemas(
        RegisterBuyerRequest,
        RegisterSellerRequest,
        LoginRequest,
        CartPairRequest,
        BuyerRefRequest,
        UploadPropertyRequest,
        UpdatePropertyRequest,
        PlaceOrderRequest,
        OrderStatusRequest,
        MessageResponse,
        ErrorResponse,
        RegisteredResponse,
        BuyerLoginResponse,
        SellerLoginResponse,
        GoogleSignInResponse,
        PropertySummary,
        PropertyDetail,
        CartResponse,
        InterestResponse,
        EmailRevealResponse,
        UploadResponse,
        SellerPropertySummary,
        OrderPlacedResponse,
        OrderSummary,
        OrderStatus
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/buyer/register", post(auth::buyer_register))
        .route("/buyer/login", post(auth::buyer_login))
        .route("/seller/register", post(auth::seller_register))
        .route("/seller/login", post(auth::seller_login))
        .route("/google-signin", post(auth::google_signin))
        .route("/explore", get(explore::explore))
        .route("/explore/:id", get(explore::explore_property))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart", post(cart::view_cart))
        .route("/cart/:buyer_id/:property_id", delete(cart::remove_cart_item))
        .route("/email/:buyer_id/:property_id", get(cart::reveal_emails))
        .route("/interest/add", post(interest::add_interest))
        .route("/interest", post(interest::view_interest))
        .route("/upload", post(property::upload_property))
        .route("/property/history", get(property::upload_history))
        .route("/property/update/:id", put(property::update_property))
        .route("/property/delete/:id", delete(property::delete_property))
        .route("/order", post(orders::place_order))
        .route("/order/history", get(orders::order_history))
        .route("/order/update/:id", put(orders::update_order_status))
        .with_state(app_state)
}
