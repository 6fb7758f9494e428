pub mod traits;
pub mod chart;
pub mod catalog;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use chart::{ChartConfig, CandlePosition, MalformedPolicy};
pub use catalog::{CatalogConfig, CatalogEntry};
pub use traits::ConfigSection;
