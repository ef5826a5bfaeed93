use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteExecutor};
use std::str::FromStr;

use crate::models::generate_id;
use crate::utils::truncate_chars;

/// Titles are cut to this many characters in subjects and confirmation messages.
pub const SHORT_TITLE_CHARS: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub url: String,
    pub title: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub url: String,
    pub title: String,
    pub price: Decimal,
}

impl Product {
    pub fn new(new_product: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            url: new_product.url,
            title: new_product.title,
            price: new_product.price,
            created_at: now,
            updated_at: now,
        }
    }

    /// A drop is a strictly positive price strictly below the stored one.
    pub fn is_price_drop(&self, new_price: Decimal) -> bool {
        new_price > Decimal::ZERO && new_price < self.price
    }

    pub fn short_title(&self) -> String {
        truncate_chars(&self.title, SHORT_TITLE_CHARS)
    }

    /// Inserts the product unless its url is already stored. Returns whether a row was written.
    #[tracing::instrument(name = "Insert product", skip(executor, product), fields(url = %product.url))]
    pub async fn insert_if_absent(executor: impl SqliteExecutor<'_>, product: &Product) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO products (id, url, title, price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO NOTHING
            ",
        )
        .bind(&product.id)
        .bind(&product.url)
        .bind(&product.title)
        .bind(product.price.to_string())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn find_by_url(executor: impl SqliteExecutor<'_>, url: &str) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE url = ?")
            .bind(url)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id(executor: impl SqliteExecutor<'_>, id: &str) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn fetch_all(executor: impl SqliteExecutor<'_>) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at")
            .fetch_all(executor)
            .await
    }

    #[tracing::instrument(name = "Update product price", skip(executor))]
    pub async fn update_price(executor: impl SqliteExecutor<'_>, id: &str, price: Decimal) -> sqlx::Result<()> {
        sqlx::query("UPDATE products SET price = ?, updated_at = ? WHERE id = ?")
            .bind(price.to_string())
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Deletes the product; its subscriptions go with it through the foreign key cascade.
    #[tracing::instrument(name = "Delete product", skip(executor))]
    pub async fn delete(executor: impl SqliteExecutor<'_>, id: &str) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// Prices are stored as decimal text, which sqlx has no sqlite mapping for.
impl<'r> FromRow<'r, SqliteRow> for Product {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let price: String = row.try_get("price")?;
        let price = Decimal::from_str(&price).map_err(|e| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            url: row.try_get("url")?,
            title: row.try_get("title")?,
            price,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
