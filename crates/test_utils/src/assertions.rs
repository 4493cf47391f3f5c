//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_pricing::CalculationResult;

/// Asserts that a Money value is positive
pub fn assert_money_positive(money: &Money) {
    assert!(money.is_positive(), "Expected positive money, got {}", money);
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that money values sum to a total
///
/// # Panics
///
/// Panics on currency mismatch or if the sum doesn't equal the total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = Money::sum(total.currency(), parts).expect("parts should share a currency");
    assert_eq!(
        sum.amount(),
        total.amount(),
        "Parts sum to {}, expected {}",
        sum,
        total
    );
}

/// Asserts that a result's grand total equals the sum of its components
pub fn assert_total_consistent(result: &CalculationResult) {
    assert_money_sum_equals(
        &[
            result.physical_damage_fee(),
            result.battery_surcharge(),
            result.liability_fee(),
            result.passenger_accident_fee(),
            result.renewal_adjustment(),
        ],
        &result.grand_total(),
    );
}
