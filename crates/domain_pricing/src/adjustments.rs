//! Renewal adjustment and deductible

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::usage::UsageClassKey;

/// Percentage adjustment applied on renewal (positive loads, negative discounts)
///
/// The percentage is applied to the total insured value, i.e. the vehicle
/// value plus the battery value for hybrid and electric vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalAdjustment {
    rate: Rate,
}

impl RenewalAdjustment {
    /// Creates an adjustment from a percentage in `[-100, 100]`
    pub fn from_percentage(percentage: Decimal) -> Result<Self, PricingError> {
        if percentage < dec!(-100) || percentage > dec!(100) {
            return Err(PricingError::validation(format!(
                "Renewal adjustment {}% is outside [-100, 100]",
                percentage
            )));
        }
        Ok(Self {
            rate: Rate::from_percentage(percentage),
        })
    }

    /// No adjustment
    pub fn none() -> Self {
        Self { rate: Rate::zero() }
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn apply(&self, insured_value: &Money) -> Result<Money, PricingError> {
        Ok(self.rate.apply(insured_value)?)
    }
}

impl Default for RenewalAdjustment {
    fn default() -> Self {
        Self::none()
    }
}

/// Per-claim deductible by usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductiblePolicy {
    pub commercial: Money,
    pub standard: Money,
}

impl DeductiblePolicy {
    pub fn from_config(config: &PricingConfig) -> Self {
        Self {
            commercial: Money::new(config.commercial_deductible, config.currency),
            standard: Money::new(config.standard_deductible, config.currency),
        }
    }

    pub fn deductible_for(&self, key: &UsageClassKey) -> Money {
        if key.is_commercial() {
            self.commercial
        } else {
            self.standard
        }
    }
}

impl Default for DeductiblePolicy {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}
