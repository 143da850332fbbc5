//! # Catalog
//!
//! The cake records and the storage contract behind every CRUD endpoint.
//!
//! Handlers only ever see [`CatalogStore`], so the in-memory backend here and
//! the Postgres backend in [`crate::database`] are interchangeable at startup.
//!
//! ## Ids
//! - Assigned by the store as `max(existing) + 1`, starting from 1
//! - Immutable once assigned, update never touches them
//! - The whole read-max-then-insert sequence happens under one lock so
//!   parallel creates cannot hand out the same id

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cake {
    pub id: u32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: u32,
}

/// The mutable fields of a cake, as sent by create/update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct CakePayload {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: u32,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Торт не найден")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All cakes in insertion order.
    async fn list(&self) -> Result<Vec<Cake>, StoreError>;

    async fn get(&self, id: u32) -> Result<Cake, StoreError>;

    /// Assigns the next id and stores the record.
    async fn create(&self, payload: CakePayload) -> Result<Cake, StoreError>;

    /// Replaces every mutable field, keeps the id.
    async fn update(&self, id: u32, payload: CakePayload) -> Result<Cake, StoreError>;

    async fn delete(&self, id: u32) -> Result<(), StoreError>;
}

pub struct MemoryStore {
    cakes: Mutex<Vec<Cake>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            cakes: Mutex::new(Vec::new()),
        }
    }

    /// Store preloaded with the shop's demo catalog.
    pub fn seeded() -> Self {
        Self {
            cakes: Mutex::new(vec![
                Cake {
                    id: 1,
                    name: "Медовик".to_string(),
                    description: Some("Торт с медом".to_string()),
                    price: Decimal::from(5500),
                    stock: 4,
                },
                Cake {
                    id: 2,
                    name: "Молочная девочка".to_string(),
                    description: Some("Нежный молочный торт".to_string()),
                    price: Decimal::from(6000),
                    stock: 3,
                },
            ]),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Cake>, StoreError> {
        Ok(self.cakes.lock().expect("catalog lock poisoned").clone())
    }

    async fn get(&self, id: u32) -> Result<Cake, StoreError> {
        let cakes = self.cakes.lock().expect("catalog lock poisoned");

        cakes
            .iter()
            .find(|cake| cake.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, payload: CakePayload) -> Result<Cake, StoreError> {
        // lock covers the max-scan and the push
        let mut cakes = self.cakes.lock().expect("catalog lock poisoned");

        let id = cakes.iter().map(|cake| cake.id).max().unwrap_or(0) + 1;
        let cake = Cake {
            id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock,
        };

        cakes.push(cake.clone());

        Ok(cake)
    }

    async fn update(&self, id: u32, payload: CakePayload) -> Result<Cake, StoreError> {
        let mut cakes = self.cakes.lock().expect("catalog lock poisoned");

        let cake = cakes
            .iter_mut()
            .find(|cake| cake.id == id)
            .ok_or(StoreError::NotFound)?;

        cake.name = payload.name;
        cake.description = payload.description;
        cake.price = payload.price;
        cake.stock = payload.stock;

        Ok(cake.clone())
    }

    async fn delete(&self, id: u32) -> Result<(), StoreError> {
        let mut cakes = self.cakes.lock().expect("catalog lock poisoned");

        let index = cakes
            .iter()
            .position(|cake| cake.id == id)
            .ok_or(StoreError::NotFound)?;

        cakes.remove(index);

        Ok(())
    }
}
