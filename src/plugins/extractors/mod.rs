// Extractor plugin implementations
pub mod amazon;
pub mod meta_tags;

pub use amazon::AmazonExtractor;
pub use meta_tags::MetaTagExtractor;
