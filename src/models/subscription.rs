use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteExecutor};

use crate::models::generate_id;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Subscription {
    pub id: String,
    pub user_email: String,
    pub product_id: String,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(user_email: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            user_email: user_email.into(),
            product_id: product_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Inserts the subscription unless the (email, product) pair exists. Returns whether a row was written.
    #[tracing::instrument(name = "Insert subscription", skip(executor))]
    pub async fn insert_if_absent(executor: impl SqliteExecutor<'_>, subscription: &Subscription) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO subscriptions (id, user_email, product_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_email, product_id) DO NOTHING
            ",
        )
        .bind(&subscription.id)
        .bind(&subscription.user_email)
        .bind(&subscription.product_id)
        .bind(subscription.created_at)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn find(
        executor: impl SqliteExecutor<'_>,
        user_email: &str,
        product_id: &str,
    ) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE user_email = ? AND product_id = ?",
        )
        .bind(user_email)
        .bind(product_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn fetch_for_product(executor: impl SqliteExecutor<'_>, product_id: &str) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE product_id = ? ORDER BY created_at",
        )
        .bind(product_id)
        .fetch_all(executor)
        .await
    }
}
