//! Traction battery surcharge
//!
//! Hybrid and electric vehicles pay an additional premium on the battery
//! value at a fraction of the effective package rate.

use rust_decimal::Decimal;

use core_kernel::{Currency, Money, Rate};
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::vehicle::DrivetrainType;

#[derive(Debug, Clone, Copy)]
pub struct BatterySurchargeCalculator {
    fraction: Decimal,
    currency: Currency,
}

impl BatterySurchargeCalculator {
    pub fn new(fraction: Decimal, currency: Currency) -> Self {
        Self { fraction, currency }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.battery_surcharge_fraction, config.currency)
    }

    /// Share of the package rate charged on the battery
    pub fn fraction(&self) -> Decimal {
        self.fraction
    }

    /// Rate charged on the battery value for a given package rate
    pub fn surcharge_rate(&self, package_rate: Rate) -> Rate {
        package_rate.scale(self.fraction)
    }

    /// Computes the surcharge
    ///
    /// Combustion drivetrains always return zero, whatever else is passed.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when a hybrid or electric drivetrain has no
    /// battery value or a negative one.
    pub fn compute_surcharge(
        &self,
        drivetrain: DrivetrainType,
        battery_value: Option<Money>,
        package_rate: Rate,
    ) -> Result<Money, PricingError> {
        if !drivetrain.has_traction_battery() {
            return Ok(Money::zero(self.currency));
        }

        let battery = battery_value.ok_or_else(|| {
            PricingError::validation("Battery value is required for hybrid and electric vehicles")
        })?;
        if battery.is_negative() {
            return Err(PricingError::validation("Battery value must not be negative"));
        }

        Ok(self.surcharge_rate(package_rate).apply(&battery)?)
    }
}

impl Default for BatterySurchargeCalculator {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_combustion_is_zero() {
        let calc = BatterySurchargeCalculator::default();
        let surcharge = calc
            .compute_surcharge(
                DrivetrainType::Combustion,
                Some(Money::vnd(200_000_000)),
                Rate::from_percentage(dec!(1.5)),
            )
            .unwrap();
        assert!(surcharge.is_zero());
    }

    #[test]
    fn test_surcharge_rate_is_half_the_package_rate() {
        let calc = BatterySurchargeCalculator::default();
        assert_eq!(calc.fraction(), dec!(0.5));
        assert_eq!(
            calc.surcharge_rate(Rate::from_percentage(dec!(1.5))),
            Rate::from_percentage(dec!(0.75))
        );
    }

    #[test]
    fn test_electric_surcharge_uses_fraction() {
        let calc = BatterySurchargeCalculator::default();
        let surcharge = calc
            .compute_surcharge(
                DrivetrainType::Electric,
                Some(Money::vnd(200_000_000)),
                Rate::from_percentage(dec!(1.5)),
            )
            .unwrap();
        assert_eq!(surcharge, Money::vnd(1_500_000));
    }

    #[test]
    fn test_hybrid_without_battery_rejected() {
        let calc = BatterySurchargeCalculator::default();
        let err = calc
            .compute_surcharge(DrivetrainType::Hybrid, None, Rate::from_percentage(dec!(1.5)))
            .unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[test]
    fn test_negative_battery_rejected() {
        let calc = BatterySurchargeCalculator::default();
        assert!(calc
            .compute_surcharge(
                DrivetrainType::Electric,
                Some(Money::vnd(-1)),
                Rate::from_percentage(dec!(1.5)),
            )
            .is_err());
    }
}
