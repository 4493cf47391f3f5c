//! Pricing configuration
//!
//! Every tunable number the engine uses lives here. The configuration is
//! built once at startup and handed to [`PricingEngine`](crate::engine::PricingEngine);
//! nothing reads the environment after that.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, Rate};
use crate::error::PricingError;

/// A passenger-accident (NNTX) package with tiered per-seat pricing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerPackageConfig {
    pub code: String,
    pub name: String,
    /// Per-seat price for non-commercial vehicles
    pub per_seat: Decimal,
    /// Per-seat price for commercial vehicles
    pub commercial_per_seat: Decimal,
}

/// An optional BS-coded clause that can be attached to a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraPackageConfig {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Pricing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Currency every amount is quoted in
    pub currency: Currency,
    /// Vehicle value below which the minimum-fee floor may apply
    pub minimum_fee_threshold: Decimal,
    /// Minimum physical-damage fee for eligible vehicles
    pub minimum_fee_floor: Decimal,
    /// Share of the effective package rate charged on battery value
    pub battery_surcharge_fraction: Decimal,
    /// Percentage points AU009 adds on top of the garage-choice package
    pub au009_additional_rate: Decimal,
    /// Lowest custom rate a user may enter, in percent
    pub min_override_rate: Decimal,
    /// Highest custom rate a user may enter, in percent
    pub max_override_rate: Decimal,
    /// Flat passenger-accident fee per seat
    pub passenger_fee_per_seat: Decimal,
    /// Tiered passenger-accident packages
    pub passenger_packages: Vec<PassengerPackageConfig>,
    /// Replacement liability fee table keyed by category code
    pub liability_fees: Option<BTreeMap<String, Decimal>>,
    /// Deductible per claim for commercial vehicles
    pub commercial_deductible: Decimal,
    /// Deductible per claim for everything else
    pub standard_deductible: Decimal,
    /// Catalog of extra packages known to the product
    pub extra_packages: Vec<ExtraPackageConfig>,
    /// Extra package codes enabled for this deployment
    pub enabled_extra_packages: Vec<String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::VND,
            minimum_fee_threshold: dec!(500000000),
            minimum_fee_floor: dec!(5500000),
            battery_surcharge_fraction: dec!(0.5),
            au009_additional_rate: dec!(0.10),
            min_override_rate: dec!(0.1),
            max_override_rate: dec!(10),
            passenger_fee_per_seat: dec!(10000),
            passenger_packages: default_passenger_packages(),
            liability_fees: None,
            commercial_deductible: dec!(1000000),
            standard_deductible: dec!(500000),
            extra_packages: default_extra_packages(),
            enabled_extra_packages: Vec::new(),
        }
    }
}

fn default_passenger_packages() -> Vec<PassengerPackageConfig> {
    [
        ("NNTX10", "Mức 10 triệu/chỗ", dec!(10000), dec!(15000)),
        ("NNTX20", "Mức 20 triệu/chỗ", dec!(20000), dec!(30000)),
        ("NNTX50", "Mức 50 triệu/chỗ", dec!(50000), dec!(75000)),
        ("NNTX100", "Mức 100 triệu/chỗ", dec!(100000), dec!(150000)),
    ]
    .into_iter()
    .map(|(code, name, per_seat, commercial_per_seat)| PassengerPackageConfig {
        code: code.to_string(),
        name: name.to_string(),
        per_seat,
        commercial_per_seat,
    })
    .collect()
}

fn default_extra_packages() -> Vec<ExtraPackageConfig> {
    ["BS007", "BS008", "BS009"]
        .into_iter()
        .map(|code| ExtraPackageConfig {
            code: code.to_string(),
            name: format!("Điều khoản bổ sung {}", code),
            description: String::new(),
        })
        .collect()
}

impl PricingConfig {
    /// Loads configuration from the environment
    ///
    /// Reads `PRICING_*` variables (after loading `.env` if present) on top
    /// of the defaults. `PRICING_ENABLED_EXTRA_PACKAGES` is a comma-separated
    /// list of codes.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("PRICING")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("enabled_extra_packages"),
            )
            .build()?
            .try_deserialize()
            .map(Self::normalized)
    }

    /// Loads configuration from a TOML document
    ///
    /// Keys not present in the document keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map(Self::normalized)
    }

    /// Trims enabled extra-package codes and drops empty entries
    pub fn normalized(mut self) -> Self {
        self.enabled_extra_packages = self
            .enabled_extra_packages
            .iter()
            .map(|code| code.trim())
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Checks the configuration for inconsistent values
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.minimum_fee_threshold.is_sign_negative() || self.minimum_fee_floor.is_sign_negative() {
            return Err(PricingError::configuration("Minimum fee settings must not be negative"));
        }
        if self.battery_surcharge_fraction.is_sign_negative() {
            return Err(PricingError::configuration(
                "Battery surcharge fraction must not be negative",
            ));
        }
        if self.min_override_rate > self.max_override_rate {
            return Err(PricingError::configuration(format!(
                "Override rate bounds are inverted: {} > {}",
                self.min_override_rate, self.max_override_rate
            )));
        }
        if let Some(table) = &self.liability_fees {
            if let Some((code, _)) = table.iter().find(|(_, fee)| fee.is_sign_negative()) {
                return Err(PricingError::configuration(format!(
                    "Liability fee for '{}' must not be negative",
                    code
                )));
            }
        }
        for code in &self.enabled_extra_packages {
            if !self.extra_packages.iter().any(|pkg| &pkg.code == code) {
                return Err(PricingError::configuration(format!(
                    "Enabled extra package '{}' is not in the catalog",
                    code
                )));
            }
        }
        Ok(())
    }

    pub fn minimum_fee_threshold(&self) -> Money {
        Money::new(self.minimum_fee_threshold, self.currency)
    }

    pub fn minimum_fee_floor(&self) -> Money {
        Money::new(self.minimum_fee_floor, self.currency)
    }

    pub fn passenger_fee_per_seat(&self) -> Money {
        Money::new(self.passenger_fee_per_seat, self.currency)
    }

    pub fn min_override_rate(&self) -> Rate {
        Rate::from_percentage(self.min_override_rate)
    }

    pub fn max_override_rate(&self) -> Rate {
        Rate::from_percentage(self.max_override_rate)
    }

    /// Extra packages that are both catalogued and enabled, in catalog order
    pub fn enabled_extra_package_catalog(&self) -> Vec<&ExtraPackageConfig> {
        self.extra_packages
            .iter()
            .filter(|pkg| self.enabled_extra_packages.contains(&pkg.code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.minimum_fee_floor(), Money::vnd(5_500_000));
        assert!(config.enabled_extra_package_catalog().is_empty());
    }

    #[test]
    fn test_toml_overrides_keep_defaults() {
        let config = PricingConfig::from_toml_str(
            r#"
            battery_surcharge_fraction = "0.4"
            enabled_extra_packages = ["BS007"]
            "#,
        )
        .unwrap();

        assert_eq!(config.battery_surcharge_fraction, dec!(0.4));
        assert_eq!(config.minimum_fee_floor, dec!(5500000));
        assert_eq!(config.enabled_extra_package_catalog().len(), 1);
    }

    #[test]
    fn test_enabled_codes_are_trimmed() {
        let config = PricingConfig {
            enabled_extra_packages: vec!["BS007".to_string(), " BS009".to_string(), " ".to_string()],
            ..PricingConfig::default()
        }
        .normalized();

        assert_eq!(config.enabled_extra_packages, vec!["BS007", "BS009"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_enabled_codes_are_trimmed() {
        let config = PricingConfig::from_toml_str(r#"enabled_extra_packages = [" BS008 "]"#).unwrap();
        assert_eq!(config.enabled_extra_packages, vec!["BS008"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_enabled_package_rejected() {
        let config = PricingConfig {
            enabled_extra_packages: vec!["BS999".to_string()],
            ..PricingConfig::default()
        };
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_inverted_override_bounds_rejected() {
        let config = PricingConfig {
            min_override_rate: dec!(5),
            max_override_rate: dec!(1),
            ..PricingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
