use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{BoardError, Result};

/// Top-level configuration structure for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Interval between render ticks, in milliseconds.
    pub tick_ms: u64,
    /// Maximum number of log lines kept for the debug panel.
    pub log_lines: usize,
    pub layout: LayoutConfig,
    pub ripple: RippleConfig,
    pub flap: FlapConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            tick_ms: 150,
            log_lines: 5,
            layout: LayoutConfig::default(),
            ripple: RippleConfig::default(),
            flap: FlapConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Reads a JSON configuration file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would stall the tick loop or an animation.
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(BoardError::msg("tick_ms must be at least 1"));
        }
        if self.ripple.step_ms <= 0 {
            return Err(BoardError::msg("ripple.step_ms must be positive"));
        }
        if self.flap.step_ms <= 0 {
            return Err(BoardError::msg("flap.step_ms must be positive"));
        }
        if self.layout.min_content_width > self.layout.max_content_width {
            return Err(BoardError::msg(format!(
                "layout.min_content_width ({}) exceeds layout.max_content_width ({})",
                self.layout.min_content_width, self.layout.max_content_width
            )));
        }
        Ok(())
    }
}

/// Geometry and pacing knobs for the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Terminals narrower than this get the "too narrow" screen.
    pub min_width: u16,
    /// Lower bound of the usable content width.
    pub min_content_width: usize,
    /// Upper bound of the usable content width.
    pub max_content_width: usize,
    /// Columns subtracted from the terminal width before clamping.
    pub margin: usize,
    /// Half-period of the play indicator blink.
    pub blink_ms: i64,
    pub title: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_width: 80,
            min_content_width: 62,
            max_content_width: 120,
            margin: 18,
            blink_ms: 500,
            title: "PHRASE BOARD · NEXT TRANSITIONS".to_string(),
        }
    }
}

/// Settings for the animated header border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Width of the highlighted diagonal band, in cells.
    pub band: usize,
    /// Milliseconds per phase step.
    pub step_ms: i64,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            band: 6,
            step_ms: 90,
        }
    }
}

/// Split-flap animation for recommendation rows that change in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlapConfig {
    /// Milliseconds per flap.
    pub step_ms: i64,
}

impl Default for FlapConfig {
    fn default() -> Self {
        Self { step_ms: 60 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_geometry() {
        let config = BoardConfig::default();
        assert_eq!(config.tick_ms, 150);
        assert_eq!(config.layout.min_width, 80);
        assert_eq!(config.layout.max_content_width, 120);
        assert_eq!(config.ripple.step_ms, 90);
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = BoardConfig::from_json(r#"{ "tick_ms": 100, "ripple": { "band": 3 } }"#)
            .expect("partial config should parse");

        assert_eq!(config.tick_ms, 100);
        assert_eq!(config.ripple.band, 3);
        assert_eq!(config.ripple.step_ms, 90);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn rejects_malformed_documents() {
        let err = BoardConfig::from_json("{ tick_ms: }").unwrap_err();
        assert!(format!("{err}").starts_with("invalid document"));
    }

    #[test]
    fn rejects_settings_that_stall_the_board() {
        let err = BoardConfig::from_json(r#"{ "tick_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, BoardError::Message(_)));
        assert_eq!(err.to_string(), "tick_ms must be at least 1");

        let err = BoardConfig::from_json(r#"{ "flap": { "step_ms": -5 } }"#).unwrap_err();
        assert!(err.to_string().contains("flap.step_ms"));

        let err =
            BoardConfig::from_json(r#"{ "layout": { "max_content_width": 40 } }"#).unwrap_err();
        assert!(err.to_string().contains("exceeds"));

        assert!(BoardConfig::default().validate().is_ok());
    }
}
