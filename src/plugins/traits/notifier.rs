use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceDropEvent {
    pub recipient: String,
    pub product_id: String,
    pub product_title: String,
    pub product_url: String,
    pub old_price: Decimal,
    pub new_price: Decimal,
}

impl PriceDropEvent {
    pub fn new(recipient: impl Into<String>, product: &Product, new_price: Decimal) -> Self {
        Self {
            recipient: recipient.into(),
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            product_url: product.url.clone(),
            old_price: product.price,
            new_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Trait for delivering price drop alerts to one subscriber.
///
/// Delivery problems are reported through [`NotificationResult`] rather than
/// an `Err`, so one failed recipient never interrupts the caller's loop.
#[async_trait]
pub trait NotifierPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn plugin_type(&self) -> &str;
    fn description(&self) -> &str;

    async fn notify(&self, event: &PriceDropEvent) -> NotificationResult;
}
