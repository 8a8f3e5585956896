//! Configuration module

mod site;

pub use site::ConfigOverrides;
pub use site::ErrorPolicy;
pub use site::FrontmatterFormat;
pub use site::HighlightConfig;
pub use site::SiteConfig;
