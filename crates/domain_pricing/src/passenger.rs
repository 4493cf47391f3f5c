//! Passenger accident (NNTX) fee

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};
use crate::config::{PassengerPackageConfig, PricingConfig};
use crate::error::PricingError;

/// How the per-seat price is chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum PassengerFeeBasis {
    /// The configured flat per-seat fee
    Flat,
    /// An explicit per-seat fee
    PerSeat(Money),
    /// A package from the schedule, by code
    Package(String),
}

impl Default for PassengerFeeBasis {
    fn default() -> Self {
        PassengerFeeBasis::Flat
    }
}

/// A tier of the passenger-accident schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerPackage {
    pub code: String,
    pub name: String,
    pub per_seat: Money,
    pub commercial_per_seat: Money,
}

impl PassengerPackage {
    fn from_config(config: &PassengerPackageConfig, currency: Currency) -> Self {
        Self {
            code: config.code.clone(),
            name: config.name.clone(),
            per_seat: Money::new(config.per_seat, currency),
            commercial_per_seat: Money::new(config.commercial_per_seat, currency),
        }
    }

    pub fn price_per_seat(&self, commercial: bool) -> Money {
        if commercial {
            self.commercial_per_seat
        } else {
            self.per_seat
        }
    }
}

#[derive(Debug, Clone)]
pub struct PassengerAccidentFeeCalculator {
    flat_per_seat: Money,
    schedule: Vec<PassengerPackage>,
}

impl PassengerAccidentFeeCalculator {
    pub fn new(flat_per_seat: Money, schedule: Vec<PassengerPackage>) -> Self {
        Self {
            flat_per_seat,
            schedule,
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        let schedule = config
            .passenger_packages
            .iter()
            .map(|package| PassengerPackage::from_config(package, config.currency))
            .collect();
        Self::new(config.passenger_fee_per_seat(), schedule)
    }

    pub fn schedule(&self) -> &[PassengerPackage] {
        &self.schedule
    }

    pub fn package(&self, code: &str) -> Option<&PassengerPackage> {
        self.schedule.iter().find(|package| package.code == code)
    }

    /// Computes `seat_count × per-seat price`
    ///
    /// # Errors
    ///
    /// * `Validation` if the seat count is zero or a per-seat fee is negative
    /// * `Configuration` if the package code is not in the schedule
    pub fn compute_fee(
        &self,
        seat_count: u32,
        basis: &PassengerFeeBasis,
        commercial: bool,
    ) -> Result<Money, PricingError> {
        if seat_count < 1 {
            return Err(PricingError::validation("Seat count must be at least 1"));
        }

        let per_seat = match basis {
            PassengerFeeBasis::Flat => self.flat_per_seat,
            PassengerFeeBasis::PerSeat(fee) => *fee,
            PassengerFeeBasis::Package(code) => self
                .package(code)
                .map(|package| package.price_per_seat(commercial))
                .ok_or_else(|| {
                    PricingError::configuration(format!(
                        "Passenger accident package '{}' is not in the schedule",
                        code
                    ))
                })?,
        };

        if per_seat.is_negative() {
            return Err(PricingError::validation("Per-seat fee must not be negative"));
        }

        Ok(per_seat * Decimal::from(seat_count))
    }
}

impl Default for PassengerAccidentFeeCalculator {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_fee_per_seat() {
        let calc = PassengerAccidentFeeCalculator::default();
        let fee = calc.compute_fee(5, &PassengerFeeBasis::Flat, false).unwrap();
        assert_eq!(fee, Money::vnd(50_000));
    }

    #[test]
    fn test_explicit_per_seat_fee() {
        let calc = PassengerAccidentFeeCalculator::default();
        let fee = calc
            .compute_fee(7, &PassengerFeeBasis::PerSeat(Money::vnd(25_000)), false)
            .unwrap();
        assert_eq!(fee, Money::vnd(175_000));
    }

    #[test]
    fn test_schedule_prices_commercial_separately() {
        let calc = PassengerAccidentFeeCalculator::default();
        let basis = PassengerFeeBasis::Package("NNTX20".to_string());

        assert_eq!(calc.compute_fee(4, &basis, false).unwrap(), Money::vnd(80_000));
        assert_eq!(calc.compute_fee(4, &basis, true).unwrap(), Money::vnd(120_000));
    }

    #[test]
    fn test_unknown_package_is_configuration_error() {
        let calc = PassengerAccidentFeeCalculator::default();
        let err = calc
            .compute_fee(4, &PassengerFeeBasis::Package("NNTX999".to_string()), false)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_zero_seats_rejected() {
        let calc = PassengerAccidentFeeCalculator::default();
        assert!(calc.compute_fee(0, &PassengerFeeBasis::Flat, false).is_err());
    }
}
