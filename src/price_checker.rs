use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;

use crate::db::Database;
use crate::models::{Product, Subscription};
use crate::plugins::traits::{NotifierPlugin, PriceDropEvent};
use crate::plugins::PluginManager;
use crate::scraper::PageFetcher;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub products_checked: usize,
    pub price_drops: usize,
    pub failures: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum CheckOutcome {
    Dropped { sent: usize, failed: usize },
    Unchanged,
}

/// Re-checks every tracked product and alerts subscribers on a price drop.
pub struct PriceChecker {
    db: Database,
    fetcher: Arc<dyn PageFetcher>,
    plugins: PluginManager,
    notifier: Arc<dyn NotifierPlugin>,
}

impl PriceChecker {
    pub fn new(
        db: Database,
        fetcher: Arc<dyn PageFetcher>,
        plugins: PluginManager,
        notifier: Arc<dyn NotifierPlugin>,
    ) -> Self {
        Self {
            db,
            fetcher,
            plugins,
            notifier,
        }
    }

    /// One full pass over the store. Per-product failures are logged and counted,
    /// only a failure to list the products aborts the sweep.
    pub async fn run_sweep(&self) -> Result<SweepReport> {
        let start_time = Instant::now();
        let products = Product::fetch_all(self.db.pool()).await?;
        let mut report = SweepReport::default();

        if products.is_empty() {
            tracing::info!("No products in the database to check.");
            return Ok(report);
        }

        tracing::info!("Starting price check for {} products", products.len());

        for product in &products {
            report.products_checked += 1;
            match self.check_product(product).await {
                Ok(CheckOutcome::Dropped { sent, failed }) => {
                    report.price_drops += 1;
                    report.notifications_sent += sent;
                    report.notifications_failed += failed;
                }
                Ok(CheckOutcome::Unchanged) => {}
                Err(e) => {
                    report.failures += 1;
                    tracing::warn!("Skipping {} ({}): {}", product.short_title(), product.url, e);
                }
            }
        }

        tracing::info!(
            products_checked = report.products_checked,
            price_drops = report.price_drops,
            failures = report.failures,
            notifications_sent = report.notifications_sent,
            notifications_failed = report.notifications_failed,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Price check finished"
        );
        Ok(report)
    }

    async fn check_product(&self, product: &Product) -> Result<CheckOutcome> {
        tracing::debug!("Checking product: {}...", product.short_title());

        let html = self.fetcher.fetch(&product.url).await?;
        let new_price = self.plugins.extract_price(&html).await?;

        if !product.is_price_drop(new_price) {
            tracing::debug!("No price drop for {} ({} -> {})", product.short_title(), product.price, new_price);
            return Ok(CheckOutcome::Unchanged);
        }

        tracing::info!(
            "PRICE DROP DETECTED for {}! Old: {}, New: {}",
            product.short_title(),
            product.price,
            new_price
        );

        let (sent, failed) = self.notify_subscribers(product, new_price).await?;

        let mut tx = self.db.begin().await?;
        Product::update_price(&mut *tx, &product.id, new_price).await?;
        tx.commit().await?;

        Ok(CheckOutcome::Dropped { sent, failed })
    }

    async fn notify_subscribers(&self, product: &Product, new_price: Decimal) -> Result<(usize, usize)> {
        let subscriptions = Subscription::fetch_for_product(self.db.pool(), &product.id).await?;
        let mut sent = 0;
        let mut failed = 0;

        // One message per subscriber, in order
        for subscription in &subscriptions {
            let event = PriceDropEvent::new(&subscription.user_email, product, new_price);
            let result = self.notifier.notify(&event).await;
            if result.success {
                sent += 1;
            } else {
                failed += 1;
            }
        }

        Ok((sent, failed))
    }
}
