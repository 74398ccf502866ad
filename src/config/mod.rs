//! Configuration module

mod site;

pub use site::CollectionConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
pub use site::SourceConfig;
