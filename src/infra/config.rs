//! Centralized configuration (environment variables + defaults).

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Socket address the API server binds to.
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// API key for the identity provider (required in production).
pub fn identity_api_key() -> String {
    std::env::var("IDENTITY_API_KEY").expect("IDENTITY_API_KEY must be set")
}

/// Base URL of the identity provider REST API.
///
/// Overridable so tests can point the client at a local stub.
pub fn identity_base_url() -> String {
    std::env::var("IDENTITY_BASE_URL")
        .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string())
}
