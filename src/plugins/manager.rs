use rust_decimal::Decimal;
use scraper::Html;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::extractors::{AmazonExtractor, MetaTagExtractor};
use super::traits::{ExtractorPlugin, ExtractionError, ProductDetails};

pub type ExtractorPluginBox = Box<dyn ExtractorPlugin>;

/// Ordered registry of extraction strategies. Earlier registrations win.
#[derive(Clone)]
pub struct PluginManager {
    extractors: Arc<RwLock<Vec<ExtractorPluginBox>>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            extractors: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Manager with the shipped strategies: Amazon markup first, meta tags as fallback.
    pub async fn with_default_plugins() -> Self {
        let manager = Self::new();
        manager.initialize_default_plugins().await;
        manager
    }

    /// Register an extractor plugin; a plugin of the same type is replaced in place
    pub async fn register_extractor(&self, plugin: ExtractorPluginBox) {
        let mut extractors = self.extractors.write().await;
        match extractors
            .iter()
            .position(|existing| existing.extractor_type() == plugin.extractor_type())
        {
            Some(index) => extractors[index] = plugin,
            None => extractors.push(plugin),
        }
    }

    pub async fn has_extractor(&self, extractor_type: &str) -> bool {
        let extractors = self.extractors.read().await;
        extractors.iter().any(|e| e.extractor_type() == extractor_type)
    }

    pub async fn list_extractor_types(&self) -> Vec<String> {
        let extractors = self.extractors.read().await;
        extractors.iter().map(|e| e.extractor_type().to_string()).collect()
    }

    pub async fn initialize_default_plugins(&self) {
        self.register_extractor(Box::new(AmazonExtractor::new())).await;
        self.register_extractor(Box::new(MetaTagExtractor::new())).await;
    }

    /// Title and price from the first extractor that reads both.
    pub async fn extract_details(&self, html: &str) -> Result<ProductDetails, ExtractionError> {
        let extractors = self.extractors.read().await;
        let document = Html::parse_document(html);
        first_success(&extractors, |extractor| extractor.extract(&document))
    }

    /// Price from the first extractor that reads one; the title is not required.
    pub async fn extract_price(&self, html: &str) -> Result<Decimal, ExtractionError> {
        let extractors = self.extractors.read().await;
        let document = Html::parse_document(html);
        first_success(&extractors, |extractor| extractor.extract_price(&document))
    }
}

/// Runs `attempt` over the extractors in order; on total failure returns the first strategy's error.
fn first_success<T>(
    extractors: &[ExtractorPluginBox],
    mut attempt: impl FnMut(&dyn ExtractorPlugin) -> Result<T, ExtractionError>,
) -> Result<T, ExtractionError> {
    let mut first_error = None;
    for extractor in extractors {
        match attempt(extractor.as_ref()) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("Extractor {} failed: {}", extractor.extractor_type(), e);
                first_error.get_or_insert(e);
            }
        }
    }
    Err(first_error.unwrap_or(ExtractionError::NoExtractors))
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
