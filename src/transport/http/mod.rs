pub mod error;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod auth;
    pub mod cart;
    pub mod explore;
    pub mod health;
    pub mod interest;
    pub mod orders;
    pub mod property;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
