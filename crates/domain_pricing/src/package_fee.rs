//! Physical-damage package fee
//!
//! The calculator applies one formula to whatever rate it is handed. Whether
//! that rate came from the tariff or from a user override is decided before
//! this point and never reaches it.

use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::usage::UsageClassKey;

/// Minimum premium guaranteed for low-value private passenger cars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumFeePolicy {
    /// Vehicle value strictly below which the floor may apply
    pub threshold: Money,
    /// Fee charged when the computed fee falls below it
    pub floor: Money,
}

impl MinimumFeePolicy {
    pub fn new(threshold: Money, floor: Money) -> Self {
        Self { threshold, floor }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.minimum_fee_threshold(), config.minimum_fee_floor())
    }
}

impl Default for MinimumFeePolicy {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

/// Result of a package fee computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFee {
    pub fee: Money,
    pub has_minimum_fee_applied: bool,
}

/// Computes the physical-damage fee for a package
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageFeeCalculator {
    policy: MinimumFeePolicy,
}

impl PackageFeeCalculator {
    pub fn new(policy: MinimumFeePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MinimumFeePolicy {
        &self.policy
    }

    /// Computes `vehicle_value × rate` and applies the minimum-fee floor
    ///
    /// # Arguments
    ///
    /// * `vehicle_value` - Declared vehicle value, excluding battery
    /// * `rate` - The effective rate for the selected package
    /// * `key` - Resolved usage key, which decides floor eligibility
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative value or rate, and `Money` when
    /// the value is in a different currency than the policy.
    pub fn compute_fee(
        &self,
        vehicle_value: Money,
        rate: Rate,
        key: &UsageClassKey,
    ) -> Result<PackageFee, PricingError> {
        if vehicle_value.is_negative() {
            return Err(PricingError::validation("Vehicle value must not be negative"));
        }
        if rate.is_negative() {
            return Err(PricingError::validation("Rate must not be negative"));
        }

        let fee = rate.apply(&vehicle_value)?;

        if key.is_minimum_fee_eligible()
            && vehicle_value.checked_cmp(&self.policy.threshold)?.is_lt()
            && fee.checked_cmp(&self.policy.floor)?.is_lt()
        {
            return Ok(PackageFee {
                fee: self.policy.floor,
                has_minimum_fee_applied: true,
            });
        }

        Ok(PackageFee {
            fee,
            has_minimum_fee_applied: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::UsageClassResolver;
    use crate::vehicle::UsageClass;
    use rust_decimal_macros::dec;

    fn key(usage: UsageClass) -> UsageClassKey {
        UsageClassResolver::new().resolve_usage(usage).key
    }

    #[test]
    fn test_fee_is_value_times_rate() {
        let calc = PackageFeeCalculator::default();
        let result = calc
            .compute_fee(
                Money::vnd(800_000_000),
                Rate::from_percentage(dec!(1.5)),
                &key(UsageClass::PrivatePassenger),
            )
            .unwrap();

        assert_eq!(result.fee, Money::vnd(12_000_000));
        assert!(!result.has_minimum_fee_applied);
    }

    #[test]
    fn test_default_policy() {
        let calc = PackageFeeCalculator::default();
        assert_eq!(calc.policy().threshold, Money::vnd(500_000_000));
        assert_eq!(calc.policy().floor, Money::vnd(5_500_000));
    }

    #[test]
    fn test_floor_for_low_value_private_car() {
        let calc = PackageFeeCalculator::default();
        let result = calc
            .compute_fee(
                Money::vnd(300_000_000),
                Rate::from_percentage(dec!(1.0)),
                &key(UsageClass::PrivatePassenger),
            )
            .unwrap();

        assert_eq!(result.fee, Money::vnd(5_500_000));
        assert!(result.has_minimum_fee_applied);
    }

    #[test]
    fn test_floor_not_applied_to_commercial() {
        let calc = PackageFeeCalculator::default();
        let result = calc
            .compute_fee(
                Money::vnd(300_000_000),
                Rate::from_percentage(dec!(1.0)),
                &key(UsageClass::CommercialCargo),
            )
            .unwrap();

        assert_eq!(result.fee, Money::vnd(3_000_000));
        assert!(!result.has_minimum_fee_applied);
    }

    #[test]
    fn test_floor_not_applied_at_threshold() {
        let calc = PackageFeeCalculator::default();
        let result = calc
            .compute_fee(
                Money::vnd(500_000_000),
                Rate::from_percentage(dec!(1.0)),
                &key(UsageClass::PrivatePassenger),
            )
            .unwrap();

        assert_eq!(result.fee, Money::vnd(5_000_000));
        assert!(!result.has_minimum_fee_applied);
    }

    #[test]
    fn test_fee_above_floor_kept() {
        let calc = PackageFeeCalculator::default();
        let result = calc
            .compute_fee(
                Money::vnd(450_000_000),
                Rate::from_percentage(dec!(1.3)),
                &key(UsageClass::PrivatePassenger),
            )
            .unwrap();

        assert_eq!(result.fee, Money::vnd(5_850_000));
        assert!(!result.has_minimum_fee_applied);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let calc = PackageFeeCalculator::default();
        let err = calc
            .compute_fee(
                Money::vnd(1),
                Rate::from_percentage(dec!(-1)),
                &key(UsageClass::PrivatePassenger),
            )
            .unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }
}
