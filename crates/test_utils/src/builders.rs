//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::{Money, Rate};
use domain_pricing::{
    CoverageSelection, DrivetrainType, PassengerFeeBasis, QuoteInputs, RateOverride,
    RenewalAdjustment, UsageClass, VehicleProfile,
};
use rust_decimal::Decimal;

use crate::fixtures::MoneyFixtures;

/// Builder for vehicle profiles in tests
#[derive(Debug, Clone)]
pub struct TestVehicleBuilder {
    value: Money,
    seat_count: u32,
    cargo_capacity_kg: Option<u32>,
    usage_class: UsageClass,
    drivetrain: DrivetrainType,
    battery_value: Option<Money>,
    age_years: u32,
}

impl Default for TestVehicleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestVehicleBuilder {
    /// Creates a builder for a one-year-old 800M family car
    pub fn new() -> Self {
        Self {
            value: MoneyFixtures::vnd_800m(),
            seat_count: 5,
            cargo_capacity_kg: None,
            usage_class: UsageClass::PrivatePassenger,
            drivetrain: DrivetrainType::Combustion,
            battery_value: None,
            age_years: 1,
        }
    }

    pub fn with_value(mut self, value: Money) -> Self {
        self.value = value;
        self
    }

    /// Sets the value in whole dong
    pub fn with_vnd_value(self, amount: i64) -> Self {
        self.with_value(Money::vnd(amount))
    }

    pub fn with_seats(mut self, seats: u32) -> Self {
        self.seat_count = seats;
        self
    }

    pub fn with_cargo_capacity_kg(mut self, kg: u32) -> Self {
        self.cargo_capacity_kg = Some(kg);
        self
    }

    pub fn with_usage(mut self, usage: UsageClass) -> Self {
        self.usage_class = usage;
        self
    }

    /// Makes the vehicle electric with the given battery value
    pub fn electric(mut self, battery_value: Money) -> Self {
        self.drivetrain = DrivetrainType::Electric;
        self.battery_value = Some(battery_value);
        self
    }

    /// Makes the vehicle hybrid with the given battery value
    pub fn hybrid(mut self, battery_value: Money) -> Self {
        self.drivetrain = DrivetrainType::Hybrid;
        self.battery_value = Some(battery_value);
        self
    }

    pub fn with_age(mut self, years: u32) -> Self {
        self.age_years = years;
        self
    }

    /// Builds the profile
    ///
    /// # Panics
    ///
    /// Panics if the configured fields violate profile invariants
    pub fn build(self) -> VehicleProfile {
        VehicleProfile::builder()
            .value(self.value)
            .seat_count(self.seat_count)
            .cargo_capacity_kg(self.cargo_capacity_kg)
            .usage_class(self.usage_class)
            .drivetrain(self.drivetrain)
            .battery_value(self.battery_value)
            .age_years(self.age_years)
            .build()
            .expect("test vehicle should be valid")
    }
}

/// Builder for complete quote inputs
#[derive(Debug, Clone)]
pub struct QuoteInputsBuilder {
    profile: VehicleProfile,
    coverage: CoverageSelection,
    rate_override: Option<RateOverride>,
}

impl Default for QuoteInputsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteInputsBuilder {
    /// Creates a builder for the default vehicle, package 0, physical damage only
    pub fn new() -> Self {
        Self {
            profile: TestVehicleBuilder::new().build(),
            coverage: CoverageSelection::package(0),
            rate_override: None,
        }
    }

    pub fn with_profile(mut self, profile: VehicleProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_package(mut self, index: usize) -> Self {
        self.coverage.package_index = index;
        self
    }

    pub fn with_liability(mut self) -> Self {
        self.coverage = self.coverage.with_liability();
        self
    }

    pub fn with_passenger_accident(mut self) -> Self {
        self.coverage = self.coverage.with_passenger_accident(PassengerFeeBasis::Flat);
        self
    }

    pub fn with_passenger_package(mut self, code: impl Into<String>) -> Self {
        self.coverage = self
            .coverage
            .with_passenger_accident(PassengerFeeBasis::Package(code.into()));
        self
    }

    /// Sets a renewal adjustment percentage
    ///
    /// # Panics
    ///
    /// Panics if the percentage is outside [-100, 100]
    pub fn with_renewal_percentage(mut self, percentage: Decimal) -> Self {
        let renewal = RenewalAdjustment::from_percentage(percentage)
            .expect("renewal percentage should be valid");
        self.coverage = self.coverage.with_renewal(renewal);
        self
    }

    pub fn with_extra_package(mut self, code: impl Into<String>) -> Self {
        self.coverage = self.coverage.with_extra_package(code);
        self
    }

    /// Overrides the rate of the currently selected package
    pub fn with_override_percentage(mut self, percentage: Decimal) -> Self {
        self.rate_override = Some(RateOverride::new(
            self.coverage.package_index,
            Rate::from_percentage(percentage),
        ));
        self
    }

    pub fn build(self) -> QuoteInputs {
        QuoteInputs {
            profile: self.profile,
            coverage: self.coverage,
            rate_override: self.rate_override,
        }
    }
}
