use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::str::FromStr;

use crate::plugins::traits::{ExtractorPlugin, ExtractionError};

const TITLE_SELECTOR: &str = r#"meta[property="og:title"]"#;
const PRICE_SELECTOR: &str = r#"meta[property="product:price:amount"], meta[itemprop="price"]"#;

/// Fallback for shops that publish Open Graph / schema.org product metadata.
pub struct MetaTagExtractor {
    title: Selector,
    price: Selector,
}

impl Default for MetaTagExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaTagExtractor {
    pub fn new() -> Self {
        MetaTagExtractor {
            title: Selector::parse(TITLE_SELECTOR).expect("static selector"),
            price: Selector::parse(PRICE_SELECTOR).expect("static selector"),
        }
    }

    fn first_content<'a>(document: &'a Html, selector: &Selector) -> Option<&'a str> {
        document
            .select(selector)
            .filter_map(|element| element.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
    }
}

impl ExtractorPlugin for MetaTagExtractor {
    fn name(&self) -> &str {
        "Meta Tag Extractor"
    }

    fn extractor_type(&self) -> &str {
        "meta_tags"
    }

    fn description(&self) -> &str {
        "Reads og:title and product:price:amount meta tags"
    }

    fn extract_title(&self, document: &Html) -> Result<String, ExtractionError> {
        Self::first_content(document, &self.title)
            .map(str::to_string)
            .ok_or(ExtractionError::TitleNotFound)
    }

    fn extract_price(&self, document: &Html) -> Result<Decimal, ExtractionError> {
        let raw = Self::first_content(document, &self.price).ok_or_else(|| ExtractionError::PriceNotFound {
            selector: PRICE_SELECTOR.to_string(),
        })?;

        // Some shops publish a decimal comma ("45,90")
        let normalized = if raw.contains(',') && !raw.contains('.') {
            raw.replace(',', ".")
        } else {
            raw.replace(',', "")
        };

        Decimal::from_str(&normalized)
            .ok()
            .filter(|price| *price > Decimal::ZERO)
            .ok_or_else(|| ExtractionError::InvalidPrice { raw: raw.to_string() })
    }
}
