pub mod store;

pub use store::{DeleteOutcome, NewProperty, PropertyPatch, RevealOutcome, Store};
