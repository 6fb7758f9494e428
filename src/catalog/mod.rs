pub mod kind;
pub mod registry;

pub use kind::{kind_name, IndicatorKind};
pub use registry::{IndicatorCatalog, IndicatorMetadata, IndicatorProfile};
