//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Money, Rate};
use domain_pricing::{DrivetrainType, UsageClass, VehicleProfile};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating any declared usage class
pub fn usage_class_strategy() -> impl Strategy<Value = UsageClass> {
    proptest::sample::select(UsageClass::ALL.to_vec())
}

/// Strategy for usage classes that have a tariff in the standard rate table
pub fn priced_usage_strategy() -> impl Strategy<Value = UsageClass> {
    let classes: Vec<UsageClass> = UsageClass::ALL
        .iter()
        .copied()
        .filter(|u| *u != UsageClass::TrailerDumpTruck)
        .collect();
    proptest::sample::select(classes)
}

/// Strategy for priced usage classes that never trigger the minimum-fee floor
pub fn non_floor_usage_strategy() -> impl Strategy<Value = UsageClass> {
    let classes: Vec<UsageClass> = UsageClass::ALL
        .iter()
        .copied()
        .filter(|u| {
            !matches!(
                u,
                UsageClass::PrivatePassenger | UsageClass::Unspecified | UsageClass::TrailerDumpTruck
            )
        })
        .collect();
    proptest::sample::select(classes)
}

/// Strategy for vehicle values in whole dong (0 to 5B)
pub fn vnd_value_strategy() -> impl Strategy<Value = Money> {
    (0i64..5_000_000_000i64).prop_map(Money::vnd)
}

/// Strategy for vehicle values below the minimum-fee threshold
pub fn low_vnd_value_strategy() -> impl Strategy<Value = Money> {
    (0i64..500_000_000i64).prop_map(Money::vnd)
}

/// Strategy for tariff-scale percentages accepted as overrides (0.10% to 10.00%)
pub fn override_percentage_strategy() -> impl Strategy<Value = Decimal> {
    (10i64..=1000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for non-negative rates (0% to 10%, two decimal places)
pub fn rate_strategy() -> impl Strategy<Value = Rate> {
    (0i64..=1000i64).prop_map(|n| Rate::from_percentage(Decimal::new(n, 2)))
}

/// Strategy for vehicle ages in years
pub fn age_strategy() -> impl Strategy<Value = u32> {
    0u32..25u32
}

/// Strategy for seat counts
pub fn seat_count_strategy() -> impl Strategy<Value = u32> {
    1u32..60u32
}

/// Strategy for optional cargo capacity in kilograms
pub fn cargo_capacity_strategy() -> impl Strategy<Value = Option<u32>> {
    proptest::option::of(0u32..40_000u32)
}

/// Strategy for valid, priceable vehicle profiles of any drivetrain
pub fn vehicle_profile_strategy() -> impl Strategy<Value = VehicleProfile> {
    (
        vnd_value_strategy(),
        seat_count_strategy(),
        cargo_capacity_strategy(),
        priced_usage_strategy(),
        prop_oneof![
            Just(DrivetrainType::Combustion),
            Just(DrivetrainType::Hybrid),
            Just(DrivetrainType::Electric),
        ],
        0i64..500_000_000i64,
        age_strategy(),
    )
        .prop_map(|(value, seats, cargo, usage, drivetrain, battery, age)| {
            let battery_value = drivetrain
                .has_traction_battery()
                .then(|| Money::vnd(battery));
            VehicleProfile::builder()
                .value(value)
                .seat_count(seats)
                .cargo_capacity_kg(cargo)
                .usage_class(usage)
                .drivetrain(drivetrain)
                .battery_value(battery_value)
                .age_years(age)
                .build()
                .expect("generated profile should be valid")
        })
}

/// Strategy for valid, priceable combustion vehicle profiles
pub fn combustion_profile_strategy() -> impl Strategy<Value = VehicleProfile> {
    (
        vnd_value_strategy(),
        seat_count_strategy(),
        cargo_capacity_strategy(),
        priced_usage_strategy(),
        age_strategy(),
    )
        .prop_map(|(value, seats, cargo, usage, age)| {
            VehicleProfile::builder()
                .value(value)
                .seat_count(seats)
                .cargo_capacity_kg(cargo)
                .usage_class(usage)
                .age_years(age)
                .build()
                .expect("generated profile should be valid")
        })
}
