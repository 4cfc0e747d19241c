//! Settings for the observer capture tool.

use crate::error::Result;
use crate::graphics::MarkerStyle;
use crate::units::DistanceUnit;

/// Token that switches the tool into observer capture.
pub const TOOL_MODE_OBSERVER: &str = "Observer";
/// Token that switches the tool into target capture.
pub const TOOL_MODE_TARGET: &str = "Target";

/// Initial offsets, marker styles and mode tokens of a controller.
///
/// Every field is optional in the JSON form and falls back to its default.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LosConfig {
    /// Height of the observer above the surface, in `offset_unit`.
    pub observer_offset: f64,
    /// Height of the target above the surface, in `offset_unit`.
    pub target_offset: f64,
    pub offset_unit: DistanceUnit,
    pub observer_marker: MarkerStyle,
    pub target_marker: MarkerStyle,
    pub observer_token: String,
    pub target_token: String,
}

impl Default for LosConfig {
    fn default() -> Self {
        Self {
            observer_offset: 2.0,
            target_offset: 0.0,
            offset_unit: DistanceUnit::Meters,
            observer_marker: MarkerStyle::observer(),
            target_marker: MarkerStyle::target(),
            observer_token: TOOL_MODE_OBSERVER.to_string(),
            target_token: TOOL_MODE_TARGET.to_string(),
        }
    }
}

impl LosConfig {
    /// Saves this configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: LosConfig = serde_json::from_str(&data)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LosConfig::default();
        assert_eq!(cfg.observer_offset, 2.0);
        assert_eq!(cfg.target_offset, 0.0);
        assert_eq!(cfg.offset_unit, DistanceUnit::Meters);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: LosConfig =
            serde_json::from_str(r#"{"offset_unit":"feet","target_offset":1.5}"#).unwrap();
        assert_eq!(cfg.offset_unit, DistanceUnit::Feet);
        assert_eq!(cfg.target_offset, 1.5);
        assert_eq!(cfg.observer_offset, 2.0);
        assert_eq!(cfg.observer_token, "Observer");
    }
}
