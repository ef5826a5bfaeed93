pub mod traits;
pub mod manager;
pub mod extractors;
pub mod notifiers;

pub use manager::PluginManager;
pub use traits::{ExtractorPlugin, NotifierPlugin};
