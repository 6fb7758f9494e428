use super::kind::{kind_name, IndicatorKind};
use crate::error::{Result, TradechartError};
use crate::types::{Depth, Placement, RenderType};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorMetadata {
    pub render_type: RenderType,
    pub placement: Placement,
}

/// Everything the builder needs to know about one classified kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorProfile {
    pub kind: IndicatorKind,
    pub render_type: RenderType,
    pub placement: Placement,
    pub depth: Depth,
}

/// Immutable lookup tables: render type and placement per kind, plus the
/// "is single" and "double depth" membership sets.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    metadata: HashMap<IndicatorKind, IndicatorMetadata>,
    single: HashSet<IndicatorKind>,
    double_depth: HashSet<IndicatorKind>,
}

impl IndicatorCatalog {
    /// Builds a catalog from its tables.
    ///
    /// Every member of `single` and `double_depth` must have metadata.
    pub fn from_tables(
        metadata: impl IntoIterator<Item = (IndicatorKind, IndicatorMetadata)>,
        single: impl IntoIterator<Item = IndicatorKind>,
        double_depth: impl IntoIterator<Item = IndicatorKind>,
    ) -> Result<Self> {
        let catalog = Self {
            metadata: metadata.into_iter().collect(),
            single: single.into_iter().collect(),
            double_depth: double_depth.into_iter().collect(),
        };

        for kind in catalog.single.iter().chain(catalog.double_depth.iter()) {
            if !catalog.metadata.contains_key(kind) {
                return Err(TradechartError::Configuration(format!(
                    "Indicator '{}' is listed in a depth set but has no render type/placement",
                    kind
                )));
            }
        }

        Ok(catalog)
    }

    /// The compiled-in dashboard catalog.
    pub fn standard() -> Self {
        use IndicatorKind::*;
        use Placement::{Main, Own};
        use RenderType::{Line, Macd as MacdRender, Scatter};

        let table = [
            (PatternsDataLines, Line, Main),
            (PatternsDataPoints, Scatter, Main),
            (TopsBottoms, Scatter, Main),
            (DataLines, Line, Main),
            (Cps, Line, Main),
            (Ichi, Line, Main),
            (Boll, Line, Main),
            (Adx, Line, Own),
            (Stock, Line, Own),
            (Order, Scatter, Main),
            (Ema, Line, Main),
            (Sma, Line, Main),
            (Rma, Line, Main),
            (Rsi, Line, Own),
            (Mfi, Line, Own),
            (Cci, Line, Own),
            (Zerolagmacd, MacdRender, Own),
            (Macd, MacdRender, Own),
        ];

        Self {
            metadata: table
                .into_iter()
                .map(|(kind, render_type, placement)| {
                    (kind, IndicatorMetadata { render_type, placement })
                })
                .collect(),
            single: [
                PatternsDataLines,
                PatternsDataPoints,
                TopsBottoms,
                DataLines,
                Order,
                Ema,
                Sma,
                Rma,
                Rsi,
                Mfi,
                Cci,
                Cps,
            ]
            .into_iter()
            .collect(),
            double_depth: [Ema, Sma, Order, PatternsDataPoints, PatternsDataLines]
                .into_iter()
                .collect(),
        }
    }

    pub fn get(&self, kind: IndicatorKind) -> Option<&IndicatorMetadata> {
        self.metadata.get(&kind)
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.metadata.contains_key(&kind)
    }

    pub fn is_single(&self, kind: IndicatorKind) -> bool {
        self.single.contains(&kind)
    }

    pub fn is_double_depth(&self, kind: IndicatorKind) -> bool {
        self.double_depth.contains(&kind)
    }

    /// Payload depth for `kind`. Double-depth membership wins over single.
    pub fn depth(&self, kind: IndicatorKind) -> Depth {
        if self.is_double_depth(kind) {
            Depth::DoubleKeyed
        } else if self.is_single(kind) {
            Depth::Single
        } else {
            Depth::Keyed
        }
    }

    /// Resolves a raw key such as `"ema12"` to its catalogued kind.
    ///
    /// Returns `None` when the stripped name is not a known kind or is
    /// missing from this catalog; callers skip such keys.
    pub fn classify(&self, raw_key: &str) -> Option<IndicatorKind> {
        let kind: IndicatorKind = kind_name(raw_key)?.parse().ok()?;
        self.contains(kind).then_some(kind)
    }

    pub fn profile(&self, kind: IndicatorKind) -> Option<IndicatorProfile> {
        self.get(kind).map(|meta| IndicatorProfile {
            kind,
            render_type: meta.render_type,
            placement: meta.placement,
            depth: self.depth(kind),
        })
    }

    /// Kinds in this catalog, sorted for stable output.
    pub fn kinds(&self) -> Vec<IndicatorKind> {
        let mut kinds: Vec<_> = self.metadata.keys().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn single_kinds(&self) -> Vec<IndicatorKind> {
        let mut kinds: Vec<_> = self.single.iter().copied().collect();
        kinds.sort();
        kinds
    }

    pub fn double_depth_kinds(&self) -> Vec<IndicatorKind> {
        let mut kinds: Vec<_> = self.double_depth.iter().copied().collect();
        kinds.sort();
        kinds
    }
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
