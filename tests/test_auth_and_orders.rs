//! Registration/login flows against the stub identity provider, Google
//! sign-in role detection, and the order lifecycle.

mod common;

use common::{seed_buyer, seed_seller, spawn_app, villa_payload};
use serde_json::{json, Value};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn buyer_register_then_login() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.url("/buyer/register"))
        .json(&json!({
            "email": "ben@example.com",
            "password": "hunter22",
            "name": "Ben",
            "phone": "1234567890"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let uid = body["uid"].as_str().unwrap().to_string();

    // The stub provider issues tokens of the form `id-token-<uid>`.
    let resp = app
        .client
        .post(app.url("/buyer/login"))
        .json(&json!({ "id_token": format!("id-token-{}", uid) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["user_id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Ben");
    assert_eq!(body["phone"], "1234567890");

    // The legacy camelCase token field still works.
    let resp = app
        .client
        .post(app.url("/buyer/login"))
        .json(&json!({ "idToken": format!("id-token-{}", uid) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_failures_map_to_401_and_404() {
    let app = spawn_app().await;

    // Unverifiable token.
    let resp = app
        .client
        .post(app.url("/buyer/login"))
        .json(&json!({ "id_token": "garbage" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    // Verified identity with no buyer row.
    let token = app.identity.issue("ghost-uid", "ghost@example.com", None);
    let resp = app
        .client
        .post(app.url("/buyer/login"))
        .json(&json!({ "id_token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn duplicate_buyer_registration_is_rejected() {
    let app = spawn_app().await;

    let register = json!({
        "email": "ben@example.com",
        "password": "hunter22",
        "name": "Ben",
        "phone": "1234567890"
    });
    let resp = app
        .client
        .post(app.url("/buyer/register"))
        .json(&register)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    // Same email again (the stub provider itself never refuses).
    let resp = app
        .client
        .post(app.url("/buyer/register"))
        .json(&register)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn seller_register_then_login() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.url("/seller/register"))
        .json(&json!({
            "email": "asha@example.com",
            "password": "hunter22",
            "name": "Asha Rao"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let uid = resp.json::<Value>().await.unwrap()["uid"]
        .as_str()
        .unwrap()
        .to_string();

    let resp = app
        .client
        .post(app.url("/seller/login"))
        .json(&json!({ "id_token": format!("id-token-{}", uid) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["user_id"].as_i64().unwrap() > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn google_signin_registers_once_and_detects_roles() {
    let app = spawn_app().await;

    // A brand-new identity becomes a buyer.
    let token = app
        .identity
        .issue("g-uid-1", "g@example.com", Some("Google Person"));
    let resp = app
        .client
        .post(app.url("/google-signin"))
        .json(&json!({ "id_token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["role"], "buyer");
    let user_id = body["user_id"].as_i64().unwrap();

    // Signing in again does not create a second row.
    let resp = app
        .client
        .post(app.url("/google-signin"))
        .json(&json!({ "id_token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user_id"].as_i64().unwrap(), user_id);

    let buyer = app
        .store
        .buyer_by_provider_uid("g-uid-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(buyer.name, "Google Person");
    assert_eq!(buyer.phone, None);

    // An identity already registered as a seller is detected as one.
    seed_seller(&app, "g-uid-2", "Asha Rao", "asha@example.com").await;
    let token = app.identity.issue("g-uid-2", "asha@example.com", None);
    let resp = app
        .client
        .post(app.url("/google-signin"))
        .json(&json!({ "id_token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["role"], "seller");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn order_lifecycle() {
    let app = spawn_app().await;
    let seller_id = seed_seller(&app, "seller-1", "Asha Rao", "asha@example.com").await;
    let buyer_id = seed_buyer(&app, "buyer-1", "Ben", "ben@example.com", "1234567890").await;

    let resp = app
        .client
        .post(app.url("/upload"))
        .json(&villa_payload(seller_id))
        .send()
        .await
        .unwrap();
    let property_id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    // Missing ids.
    let resp = app
        .client
        .post(app.url("/order"))
        .json(&json!({ "buyer_id": buyer_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Unknown property id is refused by the store's referential checks.
    let resp = app
        .client
        .post(app.url("/order"))
        .json(&json!({ "buyer_id": buyer_id, "seller_id": seller_id, "property_id": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = app
        .client
        .post(app.url("/order"))
        .json(&json!({
            "buyer_id": buyer_id,
            "seller_id": seller_id,
            "property_id": property_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let order_id = resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    // New orders are Pending.
    let resp = app
        .client
        .get(app.url(&format!("/order/history?buyer_id={}", buyer_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let orders: Value = resp.json().await.unwrap();
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"].as_i64().unwrap(), order_id);
    assert_eq!(orders[0]["property_id"].as_i64().unwrap(), property_id);
    assert_eq!(orders[0]["status"], "Pending");

    // Status transition is the only permitted mutation.
    let resp = app
        .client
        .put(app.url(&format!("/order/update/{}", order_id)))
        .json(&json!({ "status": "Confirmed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let resp = app
        .client
        .get(app.url(&format!("/order/history?buyer_id={}", buyer_id)))
        .send()
        .await
        .unwrap();
    let orders: Value = resp.json().await.unwrap();
    assert_eq!(orders[0]["status"], "Confirmed");

    // Unknown status and unknown order id.
    let resp = app
        .client
        .put(app.url(&format!("/order/update/{}", order_id)))
        .json(&json!({ "status": "Shipped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let resp = app
        .client
        .put(app.url("/order/update/999"))
        .json(&json!({ "status": "Confirmed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
