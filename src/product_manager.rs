use std::sync::Arc;

use crate::db::Database;
use crate::models::{NewProduct, Product, Subscription};
use crate::plugins::PluginManager;
use crate::scraper::PageFetcher;
use crate::{AppError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    Created { product: Product },
    AlreadyTracking { product: Product },
}

impl TrackOutcome {
    pub fn product(&self) -> &Product {
        match self {
            TrackOutcome::Created { product } | TrackOutcome::AlreadyTracking { product } => product,
        }
    }
}

/// Registers and removes tracking subscriptions.
pub struct ProductManager {
    db: Database,
    fetcher: Arc<dyn PageFetcher>,
    plugins: PluginManager,
}

impl ProductManager {
    pub fn new(db: Database, fetcher: Arc<dyn PageFetcher>, plugins: PluginManager) -> Self {
        Self { db, fetcher, plugins }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Subscribes `user_email` to the product at `product_url`, scraping the
    /// page first if the url has never been tracked. Nothing is persisted when
    /// the page cannot be read.
    pub async fn track(&self, product_url: &str, user_email: &str) -> Result<TrackOutcome> {
        let scraped = match Product::find_by_url(self.db.pool(), product_url).await? {
            Some(_) => None,
            None => {
                tracing::info!("New product URL, scraping {}", product_url);
                let html = self.fetcher.fetch(product_url).await?;
                let details = self.plugins.extract_details(&html).await?;
                Some(Product::new(NewProduct {
                    url: product_url.to_string(),
                    title: details.title,
                    price: details.price,
                }))
            }
        };

        let mut tx = self.db.begin().await?;

        if let Some(new_product) = &scraped {
            if Product::insert_if_absent(&mut *tx, new_product).await? {
                tracing::info!("Added new product: {}", new_product.short_title());
            }
        }

        // Re-read so a concurrent insert of the same url resolves to the stored row
        let product = Product::find_by_url(&mut *tx, product_url)
            .await?
            .ok_or_else(|| AppError::NotFound {
                resource: format!("product {}", product_url),
            })?;

        if Subscription::find(&mut *tx, user_email, &product.id).await?.is_some() {
            tx.commit().await?;
            return Ok(TrackOutcome::AlreadyTracking { product });
        }

        let subscription = Subscription::new(user_email, &product.id);
        let created = Subscription::insert_if_absent(&mut *tx, &subscription).await?;
        tx.commit().await?;

        if created {
            tracing::info!("{} is now tracking {}", user_email, product.short_title());
            Ok(TrackOutcome::Created { product })
        } else {
            Ok(TrackOutcome::AlreadyTracking { product })
        }
    }

    /// Deletes the product and, by cascade, its subscriptions. Returns whether it existed.
    pub async fn untrack(&self, product_url: &str) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        let deleted = match Product::find_by_url(&mut *tx, product_url).await? {
            Some(product) => Product::delete(&mut *tx, &product.id).await?,
            None => false,
        };
        tx.commit().await?;

        if deleted {
            tracing::info!("Stopped tracking {}", product_url);
        }
        Ok(deleted)
    }
}
