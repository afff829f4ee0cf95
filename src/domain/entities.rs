//! Canonical marketplace entities.
//!
//! One definition per entity is the source of truth for the whole crate; the
//! store maps rows into these structs and the HTTP layer shapes them into
//! response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered buyer. `provider_uid` is the identity-provider subject id.
#[derive(Debug, Clone, Serialize)]
pub struct Buyer {
    pub id: i64,
    pub provider_uid: String,
    pub name: String,
    pub email: String,
    /// Absent for accounts created through Google sign-in.
    pub phone: Option<String>,
}

/// A registered seller.
#[derive(Debug, Clone, Serialize)]
pub struct Seller {
    pub id: i64,
    pub provider_uid: String,
    pub name: String,
    pub email: String,
}

/// A property listing owned by a seller.
///
/// `ownership_document` is internal paperwork and must never appear in
/// buyer-facing responses.
#[derive(Debug, Clone)]
pub struct Property {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub owner_name: String,
    pub location: String,
    pub address: String,
    pub price_range: String,
    pub negotiable: bool,
    pub size: String,
    pub property_type: String,
    pub description: String,
    pub contacts: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub ownership_document: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An order audit record. Created as `Pending`; only the status may change
/// afterwards.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub property_id: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Confirmed" => Ok(OrderStatus::Confirmed),
            "Rejected" => Ok(OrderStatus::Rejected),
            _ => Err(()),
        }
    }
}
