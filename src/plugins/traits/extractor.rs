use rust_decimal::Decimal;
use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title and price read from a product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub title: String,
    pub price: Decimal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("product title not found")]
    TitleNotFound,

    #[error("price element not found: {selector}")]
    PriceNotFound { selector: String },

    #[error("unparsable price: {raw}")]
    InvalidPrice { raw: String },

    #[error("no extractor could read the page")]
    NoExtractors,
}

/// A markup strategy for reading product details from one family of pages.
///
/// Implementations work on an already parsed document so the manager can
/// parse once and try every registered strategy in turn.
pub trait ExtractorPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn extractor_type(&self) -> &str;
    fn description(&self) -> &str;

    fn extract_title(&self, document: &Html) -> Result<String, ExtractionError>;
    fn extract_price(&self, document: &Html) -> Result<Decimal, ExtractionError>;

    fn extract(&self, document: &Html) -> Result<ProductDetails, ExtractionError> {
        let title = self.extract_title(document)?;
        let price = self.extract_price(document)?;
        Ok(ProductDetails { title, price })
    }
}
