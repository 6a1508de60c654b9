//! Runtime configuration for pricing and autosave.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [pricing]
//! bespoke_unit_price = "30.00"
//!
//! [pricing.vat_mode]
//! mode = "exclusive"
//! rate_percent = "20"
//!
//! [autosave]
//! delay_ms = 2000
//! enabled = true
//! ```

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// How VAT is applied to a quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VatMode {
    /// Prices already include VAT. VAT is reported as zero and the total
    /// equals the subtotal.
    #[default]
    Inclusive,
    /// VAT is added on top of the taxable subtotal at `rate_percent`.
    Exclusive { rate_percent: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub vat_mode: VatMode,
    /// Price of one unit of bespoke uplift.
    pub bespoke_unit_price: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vat_mode: VatMode::Inclusive,
            bespoke_unit_price: Decimal::new(3000, 2),
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let VatMode::Exclusive { rate_percent } = self.vat_mode {
            if rate_percent < Decimal::ZERO {
                return Err(ConfigError::Invalid(format!(
                    "VAT rate must be non-negative, got {rate_percent}"
                )));
            }
        }
        if self.bespoke_unit_price < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "bespoke unit price must be non-negative, got {}",
                self.bespoke_unit_price
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last change before a save is dispatched.
    pub delay_ms: u64,
    pub enabled: bool,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            enabled: true,
        }
    }
}

impl AutosaveConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub pricing: PricingConfig,
    pub autosave: AutosaveConfig,
}

impl QuoteConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.pricing.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&input)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = QuoteConfig::from_toml_str("").unwrap();

        assert_eq!(config, QuoteConfig::default());
        assert_eq!(config.pricing.vat_mode, VatMode::Inclusive);
        assert_eq!(config.pricing.bespoke_unit_price, dec!(30.00));
        assert_eq!(config.autosave.delay(), Duration::from_millis(2000));
        assert!(config.autosave.enabled);
    }

    #[test]
    fn exclusive_vat_mode_parses() {
        let config = QuoteConfig::from_toml_str(
            r#"
            [pricing]
            bespoke_unit_price = "35.50"

            [pricing.vat_mode]
            mode = "exclusive"
            rate_percent = "20"

            [autosave]
            delay_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(
            config.pricing.vat_mode,
            VatMode::Exclusive {
                rate_percent: dec!(20)
            }
        );
        assert_eq!(config.pricing.bespoke_unit_price, dec!(35.50));
        assert_eq!(config.autosave.delay_ms, 500);
        assert!(config.autosave.enabled);
    }

    #[test]
    fn negative_vat_rate_is_invalid() {
        let result = QuoteConfig::from_toml_str(
            r#"
            [pricing.vat_mode]
            mode = "exclusive"
            rate_percent = "-5"
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn negative_bespoke_price_is_invalid() {
        let result = QuoteConfig::from_toml_str(
            r#"
            [pricing]
            bespoke_unit_price = "-1"
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_vat_mode_is_a_parse_error() {
        let result = QuoteConfig::from_toml_str(
            r#"
            [pricing.vat_mode]
            mode = "reverse_charge"
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let result = QuoteConfig::load(Path::new("/definitely/not/here.toml"));

        match result {
            Err(ConfigError::Io { path, .. }) => assert!(path.contains("not/here.toml")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
