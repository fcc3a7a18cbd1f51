//! Storefront configuration
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_LOAD_BOUNDARY_CARD_FRACTION, DEFAULT_PRODUCTS_PATH, DEFAULT_SCROLL_CORRECTION_PX,
    DEFAULT_SCROLL_DURATION_MS, DEFAULT_SCROLL_EASING, DEFAULT_SETTLE_DELAY_MS,
};

const DEFAULT_STOREFRONT_DATA: &str =
    include_str!("../../storefront-web/static/assets/data/storefront.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Switches and tuning values for the category window and scroll navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Grow the category window as the user scrolls instead of mounting everything.
    #[serde(default = "default_true")]
    pub dynamic_growth: bool,
    /// Compact layout: search header, anonymous lead block and a category picker.
    #[serde(default)]
    pub compact_layout: bool,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u32,
    #[serde(default)]
    pub header_height_px: f64,
    #[serde(default)]
    pub heading_margin_px: f64,
    #[serde(default = "default_scroll_correction_px")]
    pub scroll_correction_px: f64,
    #[serde(default = "default_scroll_duration_ms")]
    pub scroll_duration_ms: u32,
    #[serde(default = "default_scroll_easing")]
    pub scroll_easing: String,
    #[serde(default = "default_load_boundary_card_fraction")]
    pub load_boundary_card_fraction: f64,
    #[serde(default = "default_products_path")]
    pub products_path: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            dynamic_growth: true,
            compact_layout: false,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            header_height_px: 0.0,
            heading_margin_px: 0.0,
            scroll_correction_px: DEFAULT_SCROLL_CORRECTION_PX,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
            scroll_easing: default_scroll_easing(),
            load_boundary_card_fraction: DEFAULT_LOAD_BOUNDARY_CARD_FRACTION,
            products_path: default_products_path(),
        }
    }
}

impl StorefrontConfig {
    /// Parse and validate a config document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a tuning value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_STOREFRONT_DATA).unwrap_or_else(|err| {
            log::error!("Falling back to default storefront config: {err}");
            Self::default()
        })
    }

    #[must_use]
    pub fn default_config() -> Self {
        Self::load_from_static()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.load_boundary_card_fraction) {
            return Err(ConfigError::Invalid {
                field: "load_boundary_card_fraction",
                reason: format!("{} is outside 0..=1", self.load_boundary_card_fraction),
            });
        }
        if self.header_height_px < 0.0 {
            return Err(ConfigError::Invalid {
                field: "header_height_px",
                reason: String::from("must not be negative"),
            });
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_settle_delay_ms() -> u32 {
    DEFAULT_SETTLE_DELAY_MS
}

const fn default_scroll_correction_px() -> f64 {
    DEFAULT_SCROLL_CORRECTION_PX
}

const fn default_scroll_duration_ms() -> u32 {
    DEFAULT_SCROLL_DURATION_MS
}

fn default_scroll_easing() -> String {
    String::from(DEFAULT_SCROLL_EASING)
}

const fn default_load_boundary_card_fraction() -> f64 {
    DEFAULT_LOAD_BOUNDARY_CARD_FRACTION
}

fn default_products_path() -> String {
    String::from(DEFAULT_PRODUCTS_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_config_parses() {
        let config = StorefrontConfig::from_json(DEFAULT_STOREFRONT_DATA).unwrap();
        assert!(config.dynamic_growth);
        assert_eq!(config.products_path, "/wa/products");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = StorefrontConfig::from_json("{}").unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert!((config.load_boundary_card_fraction - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.settle_delay_ms, 300);
    }

    #[test]
    fn rejects_out_of_range_boundary_fraction() {
        let err = StorefrontConfig::from_json(r#"{"load_boundary_card_fraction": 1.5}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "load_boundary_card_fraction",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            StorefrontConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
