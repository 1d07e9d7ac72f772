//! Overlay configuration
//!
//! Chosen once at startup. The environment picks how automatic mode derives
//! its flag and the compatibility profile picks how layout failures degrade.

use crate::overlay::error::{OverlayError, OverlayResult};
use crate::processing::indicator::IndicatorStyle;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the overlay runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Environment {
    /// Real hardware with a meaningful capture/mirroring signal.
    #[default]
    Device,
    /// A developer simulator. Automatic mode always shows indicators.
    Simulator,
}

/// Platform-version capability profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Compatibility {
    /// Contacts whose position cannot be converted keep their last known position.
    #[default]
    Native,
    /// Older platform targets: any conversion failure renders nothing.
    Shim,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayConfig {
    pub indicator: IndicatorStyle,
    pub environment: Environment,
    pub compatibility: Compatibility,
}

impl OverlayConfig {
    pub fn from_json_str(json: &str) -> OverlayResult<Self> {
        let config: OverlayConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> OverlayResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!("loaded overlay config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> OverlayResult<()> {
        let diameter = self.indicator.diameter;
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(OverlayError::Configuration(format!(
                "indicator diameter must be a positive number, got {}",
                diameter
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = OverlayConfig::from_json_str("{}").unwrap();
        assert_eq!(config, OverlayConfig::default());
        assert_eq!(config.indicator.diameter, 40.0);
        assert_eq!(config.environment, Environment::Device);
        assert_eq!(config.compatibility, Compatibility::Native);
    }

    #[test]
    fn test_parse_all_fields() {
        let config = OverlayConfig::from_json_str(
            r#"{ "indicator": { "diameter": 56 }, "environment": "simulator", "compatibility": "shim" }"#,
        )
        .unwrap();
        assert_eq!(config.indicator.diameter, 56.0);
        assert_eq!(config.environment, Environment::Simulator);
        assert_eq!(config.compatibility, Compatibility::Shim);
    }

    #[test]
    fn test_rejects_non_positive_diameter() {
        let err = OverlayConfig::from_json_str(r#"{ "indicator": { "diameter": 0 } }"#).unwrap_err();
        assert!(matches!(err, OverlayError::Configuration(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.json");
        std::fs::write(&path, r#"{ "environment": "simulator" }"#).unwrap();

        let config = OverlayConfig::load(&path).unwrap();
        assert_eq!(config.environment, Environment::Simulator);
    }
}
