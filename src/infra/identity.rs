//! Identity provider integration.
//!
//! Responsible for all communication with the external identity service.
//! The API layer trusts this module's output: a verified subject id and
//! email, or a typed failure. Nothing unverified is ever persisted.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::infra::config;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token could not be verified (invalid, expired, or unknown).
    #[error("invalid or expired token: {0}")]
    InvalidToken(String),
    /// The provider refused an account operation (e.g. email already in use).
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),
    /// The provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A verified identity as returned by the provider.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
}

/// Contract consumed by the API layer.
///
/// Object-safe so handlers hold an `Arc<dyn IdentityProvider>` and tests can
/// substitute a stub.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates a provider account and returns its subject id.
    async fn create_user(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    /// Exchanges an opaque ID token for a verified identity.
    async fn verify_token(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// REST client for the Google Identity Toolkit (Firebase Auth) API.
pub struct GoogleIdentity {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(rename = "localId")]
    local_id: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
struct LookupUser {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Deserialize)]
struct ProviderError {
    message: String,
}

impl GoogleIdentity {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::identity_base_url(), config::identity_api_key())
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, method, self.api_key)
    }

    /// Extracts the provider's error message from a non-success response body.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ProviderErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("unexpected provider response (status {})", status),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let response = self
            .http
            .post(self.endpoint("signUp"))
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::Rejected(Self::error_message(response).await));
        }

        let body: SignUpResponse = response.json().await?;
        Ok(body.local_id)
    }

    async fn verify_token(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let response = self
            .http
            .post(self.endpoint("lookup"))
            .json(&json!({ "idToken": id_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::InvalidToken(Self::error_message(response).await));
        }

        let body: LookupResponse = response.json().await?;
        let user = body
            .users
            .into_iter()
            .next()
            .ok_or_else(|| IdentityError::InvalidToken("token matched no account".to_string()))?;

        Ok(VerifiedIdentity {
            uid: user.local_id,
            email: user.email,
            name: user.display_name,
        })
    }
}
