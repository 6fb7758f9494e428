use super::traits::ConfigSection;
use crate::catalog::{IndicatorCatalog, IndicatorKind, IndicatorMetadata};
use crate::error::TradechartError;
use crate::types::{Placement, RenderType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: IndicatorKind,
    pub render_type: RenderType,
    pub placement: Placement,
}

/// Indicator catalog as it appears in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub indicators: Vec<CatalogEntry>,
    pub single: Vec<IndicatorKind>,
    pub double_depth: Vec<IndicatorKind>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::from_catalog(&IndicatorCatalog::standard())
    }
}

impl CatalogConfig {
    pub fn from_catalog(catalog: &IndicatorCatalog) -> Self {
        let indicators = catalog
            .kinds()
            .into_iter()
            .filter_map(|kind| {
                catalog.get(kind).map(|meta| CatalogEntry {
                    kind,
                    render_type: meta.render_type,
                    placement: meta.placement,
                })
            })
            .collect();

        Self {
            indicators,
            single: catalog.single_kinds(),
            double_depth: catalog.double_depth_kinds(),
        }
    }

    pub fn build(&self) -> Result<IndicatorCatalog, TradechartError> {
        self.validate()?;
        IndicatorCatalog::from_tables(
            self.indicators.iter().map(|entry| {
                (
                    entry.kind,
                    IndicatorMetadata {
                        render_type: entry.render_type,
                        placement: entry.placement,
                    },
                )
            }),
            self.single.iter().copied(),
            self.double_depth.iter().copied(),
        )
    }
}

impl ConfigSection for CatalogConfig {
    fn section_name() -> &'static str {
        "catalog"
    }

    fn validate(&self) -> Result<(), TradechartError> {
        let mut seen = HashSet::new();
        for entry in &self.indicators {
            if !seen.insert(entry.kind) {
                return Err(TradechartError::Configuration(format!(
                    "Indicator '{}' is listed more than once",
                    entry.kind
                )));
            }
            if matches!(entry.render_type, RenderType::Candlestick | RenderType::Bar) {
                return Err(TradechartError::Configuration(format!(
                    "Indicator '{}' cannot use the {} render type",
                    entry.kind,
                    entry.render_type.as_str()
                )));
            }
        }
        for kind in self.single.iter().chain(self.double_depth.iter()) {
            if !seen.contains(kind) {
                return Err(TradechartError::Configuration(format!(
                    "Indicator '{}' is listed in a depth set but has no catalog entry",
                    kind
                )));
            }
        }
        Ok(())
    }
}
