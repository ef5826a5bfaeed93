pub mod extractor;
pub mod notifier;

pub use extractor::{ExtractorPlugin, ExtractionError, ProductDetails};
pub use notifier::{NotifierPlugin, PriceDropEvent, NotificationResult};
