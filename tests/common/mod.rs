//! Shared test harness: in-process API server over a throwaway SQLite file,
//! with a deterministic stub identity provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use terralink_backend::infra::identity::{IdentityError, IdentityProvider, VerifiedIdentity};
use terralink_backend::{AppState, Store};

/// In-memory identity provider. Tokens are issued explicitly with [`issue`],
/// and `create_user` mints one of the form `id-token-<uid>` so tests can log
/// in right after registering.
pub struct StubIdentity {
    users: Mutex<HashMap<String, VerifiedIdentity>>,
    counter: AtomicU64,
}

impl StubIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            users: Mutex::new(HashMap::new()),
            counter: AtomicU64::new(0),
        })
    }

    /// Registers a token for the given identity and returns it.
    pub fn issue(&self, uid: &str, email: &str, name: Option<&str>) -> String {
        let token = format!("id-token-{}", uid);
        self.users.lock().unwrap().insert(
            token.clone(),
            VerifiedIdentity {
                uid: uid.to_string(),
                email: email.to_string(),
                name: name.map(str::to_string),
            },
        );
        token
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn create_user(&self, email: &str, _password: &str) -> Result<String, IdentityError> {
        let uid = format!("stub-{}", self.counter.fetch_add(1, Ordering::SeqCst));
        self.issue(&uid, email, None);
        Ok(uid)
    }

    async fn verify_token(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.users
            .lock()
            .unwrap()
            .get(id_token)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidToken("unknown token".to_string()))
    }
}

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Store,
    pub identity: Arc<StubIdentity>,
    // Keeps the database file alive for the duration of the test.
    _db_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Binds the full router on an ephemeral port and returns a handle to it.
pub async fn spawn_app() -> TestApp {
    let db_dir = tempfile::tempdir().expect("create temp dir");
    let db_path = db_dir.path().join("terralink-test.db");
    let store = Store::connect(&format!("sqlite://{}", db_path.display()))
        .await
        .expect("connect store");

    let identity = StubIdentity::new();
    let app_state = AppState {
        store: store.clone(),
        identity: identity.clone(),
    };
    let router = terralink_backend::transport::http::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        store,
        identity,
        _db_dir: db_dir,
    }
}

/// Inserts a seller directly through the store and returns its id.
pub async fn seed_seller(app: &TestApp, uid: &str, name: &str, email: &str) -> i64 {
    app.store
        .insert_seller(uid, name, email)
        .await
        .expect("insert seller")
}

/// Inserts a buyer directly through the store and returns its id.
pub async fn seed_buyer(app: &TestApp, uid: &str, name: &str, email: &str, phone: &str) -> i64 {
    app.store
        .insert_buyer(uid, name, email, Some(phone))
        .await
        .expect("insert buyer")
}

/// A complete, valid upload payload for the given seller.
pub fn villa_payload(seller_id: i64) -> serde_json::Value {
    serde_json::json!({
        "seller_id": seller_id,
        "name": "Villa",
        "owner_name": "Asha Rao",
        "location": "Goa",
        "address": "12 Beach Road",
        "price_range": "50L",
        "negotiable": true,
        "size": "2000sqft",
        "type": "Villa",
        "description": "Sea-facing villa with a private garden.",
        "contacts": "9999999999",
        "images": ["villa-front.jpg", "villa-garden.jpg"],
        "amenities": ["pool, heated", "gym"],
        "ownership_document": "deed-4821"
    })
}
