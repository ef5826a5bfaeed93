use super::*;
use dealrelay::config::SchedulerConfig;
use dealrelay::models::{NewProduct, Product};
use dealrelay::PriceScheduler;
use rust_decimal::Decimal;
use tokio::sync::Notify;

/// Holds every fetch until released, so a sweep can be caught mid-flight.
#[derive(Default)]
struct GatedFetcher {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl PageFetcher for GatedFetcher {
    async fn fetch(&self, _url: &str) -> dealrelay::Result<String> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(amazon_page(KETTLE_TITLE, "45", "00"))
    }
}

fn scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        check_interval_secs: 3600,
    }
}

#[tokio::test]
async fn test_run_now_performs_a_sweep() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "50", "00"));
    ctx.product_manager.track(KETTLE_URL, "anna@example.com").await?;
    ctx.fetcher.set_page(KETTLE_URL, amazon_page(KETTLE_TITLE, "45", "00"));

    let scheduler = PriceScheduler::new(Arc::clone(&ctx.checker), scheduler_config()).await?;
    let report = scheduler.run_now().await?.expect("no sweep was running");

    assert_eq!(report.price_drops, 1);
    assert!(!scheduler.is_running());
    assert_eq!(ctx.stored_price(KETTLE_URL).await?, "45.00");
    Ok(())
}

#[tokio::test]
async fn test_overlapping_run_is_skipped() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    let product = Product::new(NewProduct {
        url: KETTLE_URL.to_string(),
        title: KETTLE_TITLE.to_string(),
        price: Decimal::new(5000, 2),
    });
    Product::insert_if_absent(ctx.db.pool(), &product).await?;

    let fetcher = Arc::new(GatedFetcher::default());
    let checker = Arc::new(PriceChecker::new(
        ctx.db.clone(),
        fetcher.clone(),
        PluginManager::with_default_plugins().await,
        ctx.notifier.clone(),
    ));
    let scheduler = PriceScheduler::new(checker, scheduler_config()).await?;

    let first = scheduler.run_now();
    let second = async {
        fetcher.started.notified().await;
        assert!(scheduler.is_running());
        let skipped = scheduler.run_now().await;
        fetcher.release.notify_one();
        skipped
    };
    let (first, second) = tokio::join!(first, second);

    assert!(second?.is_none());
    assert_eq!(first?.map(|report| report.price_drops), Some(1));
    assert!(!scheduler.is_running());
    assert_eq!(ctx.stored_price(KETTLE_URL).await?, "45.00");
    Ok(())
}

#[tokio::test]
async fn test_scheduler_start_and_shutdown() -> anyhow::Result<()> {
    let ctx = TestContext::new().await?;
    let mut scheduler = PriceScheduler::new(Arc::clone(&ctx.checker), scheduler_config()).await?;

    scheduler.start().await?;
    assert!(!scheduler.is_running());
    scheduler.shutdown().await?;
    Ok(())
}
