//! Contract-intake boundary
//!
//! Raw intake records carry stringly-typed usage and engine codes. They are
//! validated here and converted into a [`VehicleProfile`] before anything is
//! priced.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::{Validate, ValidationError};

use core_kernel::{Currency, Money};
use crate::error::PricingError;
use crate::vehicle::{
    age_from_manufacture_year, age_from_registration_date, DrivetrainType, UsageClass,
    VehicleProfile,
};

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Vehicle data as captured on a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VehicleIntake {
    /// Declared vehicle value (giá trị xe)
    #[validate(custom(function = "validate_non_negative"))]
    pub vehicle_value: Decimal,

    #[validate(range(min = 1, max = 100))]
    pub seat_count: u32,

    /// Payload in kilograms for goods vehicles
    pub cargo_capacity_kg: Option<u32>,

    /// Usage wire code, e.g. `khong_kd_cho_nguoi`
    #[validate(length(max = 64))]
    pub usage_class: String,

    /// Engine code: `xang`, `dau`, `hybrid` or `dien`
    #[validate(length(min = 1, max = 32))]
    pub engine_type: String,

    /// Battery value, required for hybrid and electric vehicles
    pub battery_value: Option<Decimal>,

    #[validate(range(min = 1900, max = 2100))]
    pub manufacture_year: Option<i32>,

    pub registration_date: Option<NaiveDate>,
}

impl VehicleIntake {
    /// Parses the usage code, mapping unknown codes to `Unspecified`
    pub fn usage(&self) -> UsageClass {
        UsageClass::from_code(&self.usage_class).unwrap_or_else(|| {
            if !self.usage_class.trim().is_empty() {
                warn!(code = %self.usage_class, "Unknown usage code at intake");
            }
            UsageClass::Unspecified
        })
    }

    /// Vehicle age at the valuation date
    ///
    /// Uses the manufacture year when present, otherwise the first
    /// registration date.
    pub fn age_years(&self, valuation_date: NaiveDate) -> Result<u32, PricingError> {
        match (self.manufacture_year, self.registration_date) {
            (Some(year), _) => Ok(age_from_manufacture_year(year, valuation_date)),
            (None, Some(registered)) => Ok(age_from_registration_date(registered, valuation_date)),
            (None, None) => Err(PricingError::validation(
                "Manufacture year or registration date is required",
            )),
        }
    }

    /// Validates the record and builds the profile
    ///
    /// # Arguments
    ///
    /// * `valuation_date` - Date the vehicle age is measured at
    /// * `currency` - Currency the amounts are denominated in
    pub fn into_profile(
        &self,
        valuation_date: NaiveDate,
        currency: Currency,
    ) -> Result<VehicleProfile, PricingError> {
        self.validate()
            .map_err(|errors| PricingError::validation(errors.to_string()))?;

        let drivetrain = DrivetrainType::from_code(&self.engine_type).ok_or_else(|| {
            PricingError::validation(format!("Unknown engine type '{}'", self.engine_type))
        })?;

        // Forms send a zero battery value for combustion vehicles
        let battery_value = match (drivetrain.has_traction_battery(), self.battery_value) {
            (false, Some(value)) if value.is_zero() => None,
            (_, value) => value.map(|v| Money::new(v, currency)),
        };

        VehicleProfile::builder()
            .value(Money::new(self.vehicle_value, currency))
            .seat_count(self.seat_count)
            .cargo_capacity_kg(self.cargo_capacity_kg)
            .usage_class(self.usage())
            .drivetrain(drivetrain)
            .battery_value(battery_value)
            .age_years(self.age_years(valuation_date)?)
            .build()
    }
}
