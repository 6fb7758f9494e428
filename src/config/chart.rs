use super::traits::ConfigSection;
use crate::error::TradechartError;
use crate::series::SeriesStyle;
use crate::types::RenderType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub line_stroke_width: u32,
    pub scatter_marker_size: u32,
    pub line_marker_size: u32,
    pub candle_stroke_width: u32,
    pub candle_position: CandlePosition,
    pub include_volume: bool,
    pub on_malformed: MalformedPolicy,
}

/// Where the candle series sits relative to the indicator overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandlePosition {
    First,
    Last,
}

/// What a build does with an indicator whose payload cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Leave the indicator out and keep building
    Skip,
    /// Fail the whole build
    Abort,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            line_stroke_width: 2,
            scatter_marker_size: 8,
            line_marker_size: 0,
            candle_stroke_width: 1,
            candle_position: CandlePosition::Last,
            include_volume: false,
            on_malformed: MalformedPolicy::Skip,
        }
    }
}

impl ChartConfig {
    /// Overlay style: scatter series get markers, everything else is a bare line.
    pub fn overlay_style(&self, render_type: RenderType) -> SeriesStyle {
        let marker_size = match render_type {
            RenderType::Scatter => self.scatter_marker_size,
            _ => self.line_marker_size,
        };
        SeriesStyle {
            stroke_width: self.line_stroke_width,
            marker_size,
        }
    }

    pub fn candle_style(&self) -> SeriesStyle {
        SeriesStyle {
            stroke_width: self.candle_stroke_width,
            marker_size: 0,
        }
    }
}

impl ConfigSection for ChartConfig {
    fn section_name() -> &'static str {
        "chart"
    }

    fn validate(&self) -> Result<(), TradechartError> {
        if self.line_stroke_width == 0 {
            return Err(TradechartError::Configuration(
                "Line stroke width must be positive".to_string()
            ));
        }
        if self.candle_stroke_width == 0 {
            return Err(TradechartError::Configuration(
                "Candle stroke width must be positive".to_string()
            ));
        }
        if self.scatter_marker_size == 0 {
            return Err(TradechartError::Configuration(
                "Scatter marker size must be positive or scatter series are invisible".to_string()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_overlay_styles() {
        let config = ChartConfig::default();
        assert_eq!(
            config.overlay_style(RenderType::Scatter),
            SeriesStyle { stroke_width: 2, marker_size: 8 }
        );
        assert_eq!(
            config.overlay_style(RenderType::Line),
            SeriesStyle { stroke_width: 2, marker_size: 0 }
        );
        assert_eq!(
            config.overlay_style(RenderType::Macd),
            SeriesStyle { stroke_width: 2, marker_size: 0 }
        );
        assert_eq!(config.candle_style(), SeriesStyle { stroke_width: 1, marker_size: 0 });
    }

    #[test]
    fn test_zero_stroke_rejected() {
        let config = ChartConfig {
            line_stroke_width: 0,
            ..ChartConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ChartConfig::default().validate().is_ok());
    }
}
