//! The marketplace data store.
//!
//! This module is the single intermediary between the HTTP layer and the
//! database. It owns the connection pool, creates the schema at construction
//! time, and exposes one method per data-store operation. Handlers never
//! touch SQL directly.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::domain::{text_list, Buyer, Order, OrderStatus, Property, Seller};

/// Validated input for a new property listing.
#[derive(Debug, Clone)]
pub struct NewProperty {
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
}

/// Partial update for a property. `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub price_range: Option<String>,
    pub negotiable: Option<bool>,
    pub size: Option<String>,
    pub property_type: Option<String>,
    pub description: Option<String>,
    pub contacts: Option<String>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
}

/// Result of the one-shot contact reveal.
#[derive(Debug)]
pub enum RevealOutcome {
    /// No cart row for this (buyer, property) pair.
    Missing,
    /// First successful reveal; the gate is now permanently closed.
    Granted {
        buyer_email: String,
        seller_email: String,
    },
    /// The gate was already used for this cart row.
    AlreadyRevealed,
}

/// Result of a property deletion.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    NotFound,
    /// Order rows reference the property; the audit trail blocks deletion.
    Blocked,
    Deleted,
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connects to the database, creating the file and schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS buyers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                provider_uid TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT UNIQUE
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sellers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                provider_uid TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            )",
        )
        .execute(pool)
        .await?;

        // images/amenities hold JSON arrays of strings; ownership_document is
        // internal paperwork and never leaves the store in buyer responses.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS properties (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                seller_id INTEGER NOT NULL REFERENCES sellers(id),
                name TEXT NOT NULL,
                owner_name TEXT NOT NULL,
                location TEXT NOT NULL,
                address TEXT NOT NULL,
                price_range TEXT NOT NULL,
                negotiable BOOLEAN NOT NULL DEFAULT 0,
                size TEXT NOT NULL,
                property_type TEXT NOT NULL,
                description TEXT NOT NULL,
                contacts TEXT NOT NULL,
                images TEXT NOT NULL DEFAULT '[]',
                amenities TEXT NOT NULL DEFAULT '[]',
                ownership_document TEXT,
                created_at TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_properties_seller ON properties(seller_id)")
            .execute(pool)
            .await?;

        // The UNIQUE(buyer_id, property_id) constraint is what makes
        // add-to-cart/add-interest race-safe: duplicates are rejected by the
        // store, not by a check-then-insert.
        for table in ["cart_items", "interest_items"] {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    buyer_id INTEGER NOT NULL REFERENCES buyers(id),
                    property_id INTEGER NOT NULL REFERENCES properties(id),
                    contacted BOOLEAN NOT NULL DEFAULT 0,
                    added_at TEXT NOT NULL,
                    UNIQUE (buyer_id, property_id)
                )"
            ))
            .execute(pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_property ON {table}(property_id)"
            ))
            .execute(pool)
            .await?;
        }

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                buyer_id INTEGER NOT NULL REFERENCES buyers(id),
                seller_id INTEGER NOT NULL REFERENCES sellers(id),
                property_id INTEGER NOT NULL REFERENCES properties(id),
                status TEXT NOT NULL DEFAULT 'Pending',
                created_at TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_buyer ON orders(buyer_id)")
            .execute(pool)
            .await?;

        Ok(())
    }

    // ---------------------------------------------------------------- buyers

    pub async fn insert_buyer(
        &self,
        provider_uid: &str,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO buyers (provider_uid, name, email, phone) VALUES (?, ?, ?, ?)",
        )
        .bind(provider_uid)
        .bind(name)
        .bind(email)
        .bind(phone)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn buyer_by_id(&self, id: i64) -> Result<Option<Buyer>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM buyers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(buyer_from_row).transpose()
    }

    pub async fn buyer_by_provider_uid(&self, uid: &str) -> Result<Option<Buyer>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM buyers WHERE provider_uid = ?")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(buyer_from_row).transpose()
    }

    // --------------------------------------------------------------- sellers

    pub async fn insert_seller(
        &self,
        provider_uid: &str,
        name: &str,
        email: &str,
    ) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO sellers (provider_uid, name, email) VALUES (?, ?, ?)")
                .bind(provider_uid)
                .bind(name)
                .bind(email)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn seller_by_id(&self, id: i64) -> Result<Option<Seller>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM sellers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(seller_from_row).transpose()
    }

    pub async fn seller_by_provider_uid(&self, uid: &str) -> Result<Option<Seller>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM sellers WHERE provider_uid = ?")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(seller_from_row).transpose()
    }

    // ------------------------------------------------------------ properties

    pub async fn insert_property(&self, new: &NewProperty) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO properties (
                seller_id, name, owner_name, location, address, price_range,
                negotiable, size, property_type, description, contacts,
                images, amenities, ownership_document, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new.seller_id)
        .bind(&new.name)
        .bind(&new.owner_name)
        .bind(&new.location)
        .bind(&new.address)
        .bind(&new.price_range)
        .bind(new.negotiable)
        .bind(&new.size)
        .bind(&new.property_type)
        .bind(&new.description)
        .bind(&new.contacts)
        .bind(text_list::encode(&new.images))
        .bind(text_list::encode(&new.amenities))
        .bind(new.ownership_document.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn property_by_id(&self, id: i64) -> Result<Option<Property>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(property_from_row).transpose()
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM properties ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(property_from_row).collect()
    }

    pub async fn properties_by_seller(&self, seller_id: i64) -> Result<Vec<Property>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM properties WHERE seller_id = ? ORDER BY id")
            .bind(seller_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(property_from_row).collect()
    }

    /// Applies a partial update. Returns false when the id is unknown.
    pub async fn update_property(
        &self,
        id: i64,
        patch: &PropertyPatch,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE properties SET
                name = COALESCE(?, name),
                owner_name = COALESCE(?, owner_name),
                location = COALESCE(?, location),
                address = COALESCE(?, address),
                price_range = COALESCE(?, price_range),
                negotiable = COALESCE(?, negotiable),
                size = COALESCE(?, size),
                property_type = COALESCE(?, property_type),
                description = COALESCE(?, description),
                contacts = COALESCE(?, contacts),
                images = COALESCE(?, images),
                amenities = COALESCE(?, amenities)
            WHERE id = ?",
        )
        .bind(patch.name.as_deref())
        .bind(patch.owner_name.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.address.as_deref())
        .bind(patch.price_range.as_deref())
        .bind(patch.negotiable)
        .bind(patch.size.as_deref())
        .bind(patch.property_type.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.contacts.as_deref())
        .bind(patch.images.as_deref().map(text_list::encode))
        .bind(patch.amenities.as_deref().map(text_list::encode))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a property, cascading its cart/interest rows.
    ///
    /// Order rows are an immutable audit trail; while any reference the
    /// property, deletion is refused with [`DeleteOutcome::Blocked`].
    pub async fn delete_property(&self, id: i64) -> Result<DeleteOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Ok(DeleteOutcome::NotFound);
        }

        let order_refs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE property_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if order_refs > 0 {
            return Ok(DeleteOutcome::Blocked);
        }

        sqlx::query("DELETE FROM cart_items WHERE property_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM interest_items WHERE property_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }

    // --------------------------------------------------- cart / interest

    /// Conflict-aware insert. Returns true when a new row was created, false
    /// when the (buyer, property) pair was already present.
    async fn add_pair(
        &self,
        table: &str,
        buyer_id: i64,
        property_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} (buyer_id, property_id, contacted, added_at) VALUES (?, ?, 0, ?)
             ON CONFLICT (buyer_id, property_id) DO NOTHING",
            table
        );
        let result = sqlx::query(&sql)
            .bind(buyer_id)
            .bind(property_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn pair_properties(
        &self,
        table: &str,
        buyer_id: i64,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let sql = format!(
            "SELECT p.* FROM {} t JOIN properties p ON p.id = t.property_id
             WHERE t.buyer_id = ? ORDER BY t.id",
            table
        );
        let rows = sqlx::query(&sql).bind(buyer_id).fetch_all(&self.pool).await?;
        rows.iter().map(property_from_row).collect()
    }

    pub async fn add_cart_item(&self, buyer_id: i64, property_id: i64) -> Result<bool, sqlx::Error> {
        self.add_pair("cart_items", buyer_id, property_id).await
    }

    pub async fn cart_properties(&self, buyer_id: i64) -> Result<Vec<Property>, sqlx::Error> {
        self.pair_properties("cart_items", buyer_id).await
    }

    /// Returns false when no such cart row existed.
    pub async fn remove_cart_item(
        &self,
        buyer_id: i64,
        property_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE buyer_id = ? AND property_id = ?")
            .bind(buyer_id)
            .bind(property_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn add_interest_item(
        &self,
        buyer_id: i64,
        property_id: i64,
    ) -> Result<bool, sqlx::Error> {
        self.add_pair("interest_items", buyer_id, property_id).await
    }

    pub async fn interest_properties(&self, buyer_id: i64) -> Result<Vec<Property>, sqlx::Error> {
        self.pair_properties("interest_items", buyer_id).await
    }

    /// The one stateful business rule: disclose the buyer/seller emails for a
    /// cart row exactly once.
    ///
    /// The flip happens in an UPDATE guarded on `contacted = 0` inside a
    /// transaction, so two concurrent reveals cannot both be granted.
    pub async fn claim_contact_reveal(
        &self,
        buyer_id: i64,
        property_id: i64,
    ) -> Result<RevealOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT c.contacted, b.email AS buyer_email, s.email AS seller_email
             FROM cart_items c
             JOIN buyers b ON b.id = c.buyer_id
             JOIN properties p ON p.id = c.property_id
             JOIN sellers s ON s.id = p.seller_id
             WHERE c.buyer_id = ? AND c.property_id = ?",
        )
        .bind(buyer_id)
        .bind(property_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(RevealOutcome::Missing),
        };
        if row.try_get::<bool, _>("contacted")? {
            return Ok(RevealOutcome::AlreadyRevealed);
        }

        let flipped = sqlx::query(
            "UPDATE cart_items SET contacted = 1
             WHERE buyer_id = ? AND property_id = ? AND contacted = 0",
        )
        .bind(buyer_id)
        .bind(property_id)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() == 0 {
            return Ok(RevealOutcome::AlreadyRevealed);
        }

        tx.commit().await?;
        Ok(RevealOutcome::Granted {
            buyer_email: row.try_get("buyer_email")?,
            seller_email: row.try_get("seller_email")?,
        })
    }

    // ---------------------------------------------------------------- orders

    pub async fn insert_order(
        &self,
        buyer_id: i64,
        seller_id: i64,
        property_id: i64,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO orders (buyer_id, seller_id, property_id, status, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(buyer_id)
        .bind(seller_id)
        .bind(property_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn orders_by_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM orders WHERE buyer_id = ? ORDER BY id")
            .bind(buyer_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(order_from_row).collect()
    }

    /// Status transition, the only permitted mutation of an order.
    /// Returns false when the id is unknown.
    pub async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn buyer_from_row(row: &SqliteRow) -> Result<Buyer, sqlx::Error> {
    Ok(Buyer {
        id: row.try_get("id")?,
        provider_uid: row.try_get("provider_uid")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
    })
}

fn seller_from_row(row: &SqliteRow) -> Result<Seller, sqlx::Error> {
    Ok(Seller {
        id: row.try_get("id")?,
        provider_uid: row.try_get("provider_uid")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

fn property_from_row(row: &SqliteRow) -> Result<Property, sqlx::Error> {
    let images: String = row.try_get("images")?;
    let amenities: String = row.try_get("amenities")?;
    Ok(Property {
        id: row.try_get("id")?,
        seller_id: row.try_get("seller_id")?,
        name: row.try_get("name")?,
        owner_name: row.try_get("owner_name")?,
        location: row.try_get("location")?,
        address: row.try_get("address")?,
        price_range: row.try_get("price_range")?,
        negotiable: row.try_get("negotiable")?,
        size: row.try_get("size")?,
        property_type: row.try_get("property_type")?,
        description: row.try_get("description")?,
        contacts: row.try_get("contacts")?,
        images: text_list::decode(&images),
        amenities: text_list::decode(&amenities),
        ownership_document: row.try_get("ownership_document")?,
        created_at: row.try_get("created_at")?,
    })
}

fn order_from_row(row: &SqliteRow) -> Result<Order, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = OrderStatus::from_str(&status)
        .map_err(|_| sqlx::Error::Decode(format!("unknown order status: {}", status).into()))?;
    Ok(Order {
        id: row.try_get("id")?,
        buyer_id: row.try_get("buyer_id")?,
        seller_id: row.try_get("seller_id")?,
        property_id: row.try_get("property_id")?,
        status,
        created_at: row.try_get("created_at")?,
    })
}
