//! # Postgres
//!
//! Table-backed catalog variant, selected by setting `DATABASE_URL`.
//!
//! ## Schema
//! - One `cakes` table
//! - Fields: id (**integer**, primary key), name (**text**), description
//!   (**text**, nullable), price (**numeric**), stock (**integer**, default 0)
//!
//! ## Writes
//! - Ids follow the same `max + 1` rule as the in-memory store, computed
//!   inside the insert statement
//! - A per-store mutex keeps at most one mutation in flight, so two creates
//!   can never read the same max
//! - Every statement checks out a pool connection and returns it on each
//!   exit path

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::Mutex;
use tracing::info;

use crate::catalog::{Cake, CakePayload, CatalogStore, StoreError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cakes (
        id          INTEGER PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT,
        price       NUMERIC(12, 2) NOT NULL,
        stock       INTEGER NOT NULL DEFAULT 0
    )
";

pub async fn init_postgres(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;

    sqlx::query(SCHEMA).execute(&pool).await?;
    info!("Connected to Postgres");

    Ok(pool)
}

pub struct PgStore {
    pool: PgPool,
    write_lock: Mutex<()>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }
}

type CakeRow = (i32, String, Option<String>, Decimal, i32);

fn from_row((id, name, description, price, stock): CakeRow) -> Cake {
    Cake {
        id: id as u32,
        name,
        description,
        price,
        stock: stock.max(0) as u32,
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list(&self) -> Result<Vec<Cake>, StoreError> {
        let rows: Vec<CakeRow> =
            sqlx::query_as("SELECT id, name, description, price, stock FROM cakes ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn get(&self, id: u32) -> Result<Cake, StoreError> {
        let row: Option<CakeRow> =
            sqlx::query_as("SELECT id, name, description, price, stock FROM cakes WHERE id = $1")
                .bind(id as i32)
                .fetch_optional(&self.pool)
                .await?;

        row.map(from_row).ok_or(StoreError::NotFound)
    }

    async fn create(&self, payload: CakePayload) -> Result<Cake, StoreError> {
        let _guard = self.write_lock.lock().await;

        let row: CakeRow = sqlx::query_as(
            "INSERT INTO cakes (id, name, description, price, stock)
             VALUES ((SELECT COALESCE(MAX(id), 0) + 1 FROM cakes), $1, $2, $3, $4)
             RETURNING id, name, description, price, stock",
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.stock as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(from_row(row))
    }

    async fn update(&self, id: u32, payload: CakePayload) -> Result<Cake, StoreError> {
        let _guard = self.write_lock.lock().await;

        let row: Option<CakeRow> = sqlx::query_as(
            "UPDATE cakes SET name = $2, description = $3, price = $4, stock = $5
             WHERE id = $1
             RETURNING id, name, description, price, stock",
        )
        .bind(id as i32)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.stock as i32)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: u32) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let result = sqlx::query("DELETE FROM cakes WHERE id = $1")
            .bind(id as i32)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
