//! Pre-built Test Fixtures
//!
//! Provides ready-to-use vehicles, amounts and dates for the pricing tests.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_pricing::{DrivetrainType, UsageClass, VehicleIntake, VehicleProfile};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Mid-range family car value (700M-1B band)
    pub fn vnd_800m() -> Money {
        Money::vnd(800_000_000)
    }

    /// Low-value car, below the minimum-fee threshold
    pub fn vnd_300m() -> Money {
        Money::vnd(300_000_000)
    }

    /// Typical traction battery value
    pub fn vnd_battery_200m() -> Money {
        Money::vnd(200_000_000)
    }

    /// The minimum physical-damage fee
    pub fn vnd_minimum_fee() -> Money {
        Money::vnd(5_500_000)
    }

    pub fn vnd_zero() -> Money {
        Money::zero(Currency::VND)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_30k() -> Money {
        Money::new(dec!(30000.00), Currency::USD)
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// Standard valuation date (Jun 1, 2026)
    pub fn valuation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date")
    }

    /// First registration three and a half years before valuation
    pub fn registration_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 12, 1).expect("valid date")
    }
}

/// Fixture for vehicle profiles
pub struct VehicleFixtures;

impl VehicleFixtures {
    fn build(value: Money, seats: u32, usage: UsageClass, age: u32) -> VehicleProfile {
        VehicleProfile::builder()
            .value(value)
            .seat_count(seats)
            .usage_class(usage)
            .age_years(age)
            .build()
            .expect("valid fixture profile")
    }

    /// 800M five-seat family car, one year old
    pub fn family_car() -> VehicleProfile {
        Self::build(MoneyFixtures::vnd_800m(), 5, UsageClass::PrivatePassenger, 1)
    }

    /// 300M five-seat family car, one year old
    pub fn budget_car() -> VehicleProfile {
        Self::build(MoneyFixtures::vnd_300m(), 5, UsageClass::PrivatePassenger, 1)
    }

    /// 800M seven-seat self-drive rental, one year old
    pub fn rental_taxi() -> VehicleProfile {
        Self::build(MoneyFixtures::vnd_800m(), 7, UsageClass::SelfDriveTaxi, 1)
    }

    /// 1.2B commercial truck with 10 tonnes payload
    pub fn heavy_truck() -> VehicleProfile {
        VehicleProfile::builder()
            .value(Money::vnd(1_200_000_000))
            .seat_count(3)
            .cargo_capacity_kg(Some(10_000))
            .usage_class(UsageClass::CommercialCargo)
            .age_years(4)
            .build()
            .expect("valid fixture profile")
    }

    /// 800M electric family car with a 200M battery
    pub fn electric_car() -> VehicleProfile {
        VehicleProfile::builder()
            .value(MoneyFixtures::vnd_800m())
            .seat_count(5)
            .usage_class(UsageClass::PrivatePassenger)
            .drivetrain(DrivetrainType::Electric)
            .battery_value(Some(MoneyFixtures::vnd_battery_200m()))
            .age_years(1)
            .build()
            .expect("valid fixture profile")
    }

    /// 12-year-old family car, outside the garage-choice packages
    pub fn old_car() -> VehicleProfile {
        Self::build(MoneyFixtures::vnd_300m(), 5, UsageClass::PrivatePassenger, 12)
    }
}

/// Fixture for raw intake records
pub struct IntakeFixtures;

impl IntakeFixtures {
    /// Intake record for the family car
    pub fn family_car() -> VehicleIntake {
        VehicleIntake {
            vehicle_value: dec!(800000000),
            seat_count: 5,
            cargo_capacity_kg: None,
            usage_class: "khong_kd_cho_nguoi".to_string(),
            engine_type: "xang".to_string(),
            battery_value: None,
            manufacture_year: Some(2025),
            registration_date: None,
        }
    }
}
