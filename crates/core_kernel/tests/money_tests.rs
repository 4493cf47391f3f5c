//! Unit tests for the Money and Rate value objects
//!
//! Tests cover creation, arithmetic, currency handling and the rate
//! helpers used by premium calculations.

use core_kernel::{Currency, Money, MoneyError, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cmp::Ordering;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::VND);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_vnd_shortcut() {
        let m = Money::vnd(5_500_000);
        assert_eq!(m.amount(), dec!(5500000));
        assert_eq!(m.currency(), Currency::VND);
    }

    #[test]
    fn test_zero() {
        let m = Money::zero(Currency::VND);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }

    #[test]
    fn test_vnd_has_no_minor_units() {
        assert_eq!(Currency::VND.decimal_places(), 0);
        assert_eq!(Currency::USD.decimal_places(), 2);
        assert_eq!(Currency::default(), Currency::VND);
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_same_currency() {
        let total = Money::vnd(12_000_000).checked_add(&Money::vnd(480_700)).unwrap();
        assert_eq!(total, Money::vnd(12_480_700));
    }

    #[test]
    fn test_checked_sub_mismatch() {
        let result = Money::vnd(1).checked_sub(&Money::new(dec!(1), Currency::USD));
        assert_eq!(
            result,
            Err(MoneyError::CurrencyMismatch("VND".to_string(), "USD".to_string()))
        );
    }

    #[test]
    fn test_checked_cmp() {
        let a = Money::vnd(3_000_000);
        let b = Money::vnd(5_500_000);
        assert_eq!(a.checked_cmp(&b).unwrap(), Ordering::Less);
        assert!(a.checked_cmp(&Money::new(dec!(1), Currency::USD)).is_err());
    }

    #[test]
    fn test_negation_for_discounts() {
        let m = -Money::vnd(8_000_000);
        assert!(m.is_negative());
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let items: Vec<Money> = vec![];
        assert!(Money::sum(Currency::VND, &items).unwrap().is_zero());
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money::new(Decimal::MAX, Currency::VND);
        assert_eq!(max.checked_add(&Money::vnd(1)), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_checked_sub_overflow() {
        let min = Money::new(Decimal::MIN, Currency::VND);
        assert_eq!(min.checked_sub(&Money::vnd(1)), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_sum_overflow_is_an_error() {
        let half = Money::new(Decimal::MAX / dec!(2), Currency::VND);
        let items = vec![half, half, half];
        assert_eq!(Money::sum(Currency::VND, &items), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_sum_rejects_mixed_currencies() {
        let items = vec![Money::vnd(1), Money::new(dec!(1), Currency::USD)];
        assert!(Money::sum(Currency::VND, &items).is_err());
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_percentage_round_trip() {
        let rate = Rate::from_percentage(dec!(1.25));
        assert_eq!(rate.as_decimal(), dec!(0.0125));
        assert_eq!(rate.as_percentage(), dec!(1.25));
    }

    #[test]
    fn test_apply_to_vehicle_value() {
        let fee = Rate::from_percentage(dec!(1.0)).apply(&Money::vnd(300_000_000));
        assert_eq!(fee, Ok(Money::vnd(3_000_000)));
    }

    #[test]
    fn test_apply_overflow_is_an_error() {
        let huge = Money::new(Decimal::MAX, Currency::VND);
        assert_eq!(Rate::new(dec!(2)).apply(&huge), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = MoneyError::CurrencyMismatch("VND".to_string(), "USD".to_string());
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_ordering() {
        assert!(Rate::from_percentage(dec!(0.1)) < Rate::from_percentage(dec!(10)));
        assert!(Rate::from_percentage(dec!(-1)).is_negative());
        assert!(!Rate::zero().is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rate::from_percentage(dec!(2.40)).to_string(), "2.4%");
    }
}

mod display {
    use super::*;

    #[test]
    fn test_vnd_display_has_no_decimals() {
        assert_eq!(Money::vnd(480_700).to_string(), "₫ 480700");
    }
}
