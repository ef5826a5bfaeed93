use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use dealrelay::plugins::notifiers::EmailNotifier;
use dealrelay::plugins::PluginManager;
use dealrelay::scraper::{HttpFetcher, PageFetcher};
use dealrelay::web::{self, AppState};
use dealrelay::{AppConfig, Database, PriceChecker, PriceScheduler, ProductManager};

#[derive(Parser)]
#[command(name = "dealrelay", version, about = "Price drop tracking with email alerts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server and the background price checker (default)
    Serve,
    /// Run one price check over all tracked products and exit
    Check,
    /// Stop tracking a product and drop its subscriptions
    Untrack { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dealrelay=debug".parse()?),
        )
        .with_writer(writer)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    if config.notifications.smtp.credentials().is_none() {
        tracing::warn!("SENDER_EMAIL or SENDER_PASSWORD is not set; price drop emails will not be sent");
    }

    let db = Database::connect(&config.database).await?;
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.scraper)?);
    let plugins = PluginManager::with_default_plugins().await;
    let notifier = Arc::new(EmailNotifier::new(config.notifications.smtp.clone()));

    let checker = Arc::new(PriceChecker::new(
        db.clone(),
        Arc::clone(&fetcher),
        plugins.clone(),
        notifier,
    ));
    let product_manager = Arc::new(ProductManager::new(db.clone(), fetcher, plugins));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting DealRelay...");

            let mut scheduler = PriceScheduler::new(checker, config.scheduler.clone()).await?;
            scheduler.start().await?;

            let state = AppState {
                product_manager,
                config,
            };
            web::serve(state, shutdown_signal()).await?;

            info!("Shutting down...");
            scheduler.shutdown().await?;
        }
        Command::Check => {
            let report = checker.run_sweep().await?;
            info!("Price check complete: {:?}", report);
        }
        Command::Untrack { url } => {
            if product_manager.untrack(&url).await? {
                info!("Removed {} and its subscriptions", url);
            } else {
                info!("{} was not being tracked", url);
            }
        }
    }

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
