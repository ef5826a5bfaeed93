use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::str::FromStr;

use crate::plugins::traits::{ExtractorPlugin, ExtractionError};

const TITLE_SELECTOR: &str = "#productTitle";
const PRICE_WHOLE_SELECTOR: &str = ".a-price-whole";
const PRICE_FRACTION_SELECTOR: &str = ".a-price-fraction";

/// Reads Amazon product pages: the `productTitle` element and a price split
/// into `a-price-whole` / `a-price-fraction` elements.
pub struct AmazonExtractor {
    title: Selector,
    price_whole: Selector,
    price_fraction: Selector,
}

impl Default for AmazonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AmazonExtractor {
    pub fn new() -> Self {
        AmazonExtractor {
            title: Selector::parse(TITLE_SELECTOR).expect("static selector"),
            price_whole: Selector::parse(PRICE_WHOLE_SELECTOR).expect("static selector"),
            price_fraction: Selector::parse(PRICE_FRACTION_SELECTOR).expect("static selector"),
        }
    }

    fn first_text(document: &Html, selector: &Selector) -> Option<String> {
        document
            .select(selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
    }
}

/// Joins the two price parts. Grouping separators in the whole part are dropped,
/// so both "1.299," and "1,299." read as 1299. The result is always positive.
pub fn parse_split_price(whole: &str, fraction: &str) -> Result<Decimal, ExtractionError> {
    let whole: String = whole
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != ',')
        .collect();
    let fraction = fraction.trim();
    let raw = format!("{}.{}", whole, fraction);

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !digits_only(&whole) || !digits_only(fraction) {
        return Err(ExtractionError::InvalidPrice { raw });
    }

    let parsed = if fraction.is_empty() {
        Decimal::from_str(&whole)
    } else {
        Decimal::from_str(&raw)
    };
    // A zero reading means the shop showed no real price
    parsed
        .ok()
        .filter(|price| *price > Decimal::ZERO)
        .ok_or(ExtractionError::InvalidPrice { raw })
}

impl ExtractorPlugin for AmazonExtractor {
    fn name(&self) -> &str {
        "Amazon Extractor"
    }

    fn extractor_type(&self) -> &str {
        "amazon"
    }

    fn description(&self) -> &str {
        "Reads title and split whole/fraction price from Amazon product pages"
    }

    fn extract_title(&self, document: &Html) -> Result<String, ExtractionError> {
        Self::first_text(document, &self.title)
            .filter(|title| !title.is_empty())
            .ok_or(ExtractionError::TitleNotFound)
    }

    fn extract_price(&self, document: &Html) -> Result<Decimal, ExtractionError> {
        let whole = Self::first_text(document, &self.price_whole).ok_or_else(|| ExtractionError::PriceNotFound {
            selector: PRICE_WHOLE_SELECTOR.to_string(),
        })?;
        let fraction = Self::first_text(document, &self.price_fraction).ok_or_else(|| {
            ExtractionError::PriceNotFound {
                selector: PRICE_FRACTION_SELECTOR.to_string(),
            }
        })?;

        parse_split_price(&whole, &fraction)
    }
}
