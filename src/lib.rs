pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{DeleteOutcome, NewProperty, PropertyPatch, RevealOutcome, Store};
pub use domain::{Buyer, Order, OrderStatus, Property, Seller};
pub use infra::identity::{GoogleIdentity, IdentityError, IdentityProvider, VerifiedIdentity};
pub use transport::http::AppState;
