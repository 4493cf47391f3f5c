//! Vehicle profile value objects
//!
//! A [`VehicleProfile`] is the immutable snapshot every calculation is run
//! against. It is created from contract-intake data and replaced wholesale
//! on edit; nothing in the engine mutates it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};
use crate::error::PricingError;

/// Declared purpose of a vehicle
///
/// Serialized with the intake wire codes so persisted contracts keep
/// their original values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageClass {
    /// Family passenger car, no commercial use
    #[serde(rename = "khong_kd_cho_nguoi")]
    PrivatePassenger,
    /// Goods vehicle not used for hire
    #[serde(rename = "khong_kd_cho_hang")]
    PrivateCargo,
    /// Pickup or van, no commercial use
    #[serde(rename = "khong_kd_pickup_van")]
    PrivatePickupVan,
    /// Commercial goods haulage
    #[serde(rename = "kd_cho_hang")]
    CommercialCargo,
    /// Tow truck / tractor head
    #[serde(rename = "kd_dau_keo")]
    TowTruck,
    /// Intercity and provincial coaches
    #[serde(rename = "kd_cho_khach_lien_tinh")]
    IntercityCoach,
    /// Ride-hailing (fewer than 9 seats)
    #[serde(rename = "kd_grab_be")]
    RideHail,
    /// Taxi and self-drive rental
    #[serde(rename = "kd_taxi_tu_lai")]
    SelfDriveTaxi,
    /// Contract passenger transport above 9 seats
    #[serde(rename = "kd_hop_dong_tren_9c")]
    CharterCoach,
    /// Scheduled bus
    #[serde(rename = "kd_bus")]
    Bus,
    /// Pickup or van used commercially
    #[serde(rename = "kd_pickup_van")]
    CommercialPickupVan,
    /// Special purpose vehicles (ambulances and similar)
    #[serde(rename = "kd_chuyen_dung")]
    SpecialPurpose,
    /// Trailers and dump trucks
    #[serde(rename = "kd_romooc_ben")]
    TrailerDumpTruck,
    /// Usage missing or not recognised at intake
    #[serde(rename = "unspecified")]
    Unspecified,
}

impl UsageClass {
    /// Every usage class, in catalog order
    pub const ALL: [UsageClass; 14] = [
        UsageClass::PrivatePassenger,
        UsageClass::PrivateCargo,
        UsageClass::PrivatePickupVan,
        UsageClass::CommercialCargo,
        UsageClass::TowTruck,
        UsageClass::IntercityCoach,
        UsageClass::RideHail,
        UsageClass::SelfDriveTaxi,
        UsageClass::CharterCoach,
        UsageClass::Bus,
        UsageClass::CommercialPickupVan,
        UsageClass::SpecialPurpose,
        UsageClass::TrailerDumpTruck,
        UsageClass::Unspecified,
    ];

    /// Returns the intake wire code
    pub fn code(&self) -> &'static str {
        match self {
            UsageClass::PrivatePassenger => "khong_kd_cho_nguoi",
            UsageClass::PrivateCargo => "khong_kd_cho_hang",
            UsageClass::PrivatePickupVan => "khong_kd_pickup_van",
            UsageClass::CommercialCargo => "kd_cho_hang",
            UsageClass::TowTruck => "kd_dau_keo",
            UsageClass::IntercityCoach => "kd_cho_khach_lien_tinh",
            UsageClass::RideHail => "kd_grab_be",
            UsageClass::SelfDriveTaxi => "kd_taxi_tu_lai",
            UsageClass::CharterCoach => "kd_hop_dong_tren_9c",
            UsageClass::Bus => "kd_bus",
            UsageClass::CommercialPickupVan => "kd_pickup_van",
            UsageClass::SpecialPurpose => "kd_chuyen_dung",
            UsageClass::TrailerDumpTruck => "kd_romooc_ben",
            UsageClass::Unspecified => "unspecified",
        }
    }

    /// Parses an intake wire code
    ///
    /// Returns `None` for unknown codes; the intake boundary maps those to
    /// [`UsageClass::Unspecified`].
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.iter().copied().find(|usage| usage.code() == code)
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            UsageClass::PrivatePassenger => "Private passenger car",
            UsageClass::PrivateCargo => "Goods vehicle (not for hire)",
            UsageClass::PrivatePickupVan => "Pickup / van (not for hire)",
            UsageClass::CommercialCargo => "Commercial truck",
            UsageClass::TowTruck => "Tow truck / tractor head",
            UsageClass::IntercityCoach => "Intercity coach",
            UsageClass::RideHail => "Ride-hail (< 9 seats)",
            UsageClass::SelfDriveTaxi => "Taxi / self-drive rental",
            UsageClass::CharterCoach => "Charter coach (> 9 seats)",
            UsageClass::Bus => "Bus",
            UsageClass::CommercialPickupVan => "Pickup / van (commercial)",
            UsageClass::SpecialPurpose => "Special purpose vehicle",
            UsageClass::TrailerDumpTruck => "Trailer / dump truck",
            UsageClass::Unspecified => "Unspecified",
        }
    }
}

/// Drivetrain of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivetrainType {
    Combustion,
    Hybrid,
    Electric,
}

impl DrivetrainType {
    /// Parses an intake engine code (`xang`, `dau`, `hybrid`, `dien`, ...)
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        if code.contains("hybrid") {
            Some(DrivetrainType::Hybrid)
        } else if code.contains("dien") || code.contains("electric") {
            Some(DrivetrainType::Electric)
        } else if matches!(code.as_str(), "xang" | "dau" | "diesel" | "gasoline" | "combustion") {
            Some(DrivetrainType::Combustion)
        } else {
            None
        }
    }

    /// Returns true for drivetrains carrying a traction battery
    pub fn has_traction_battery(&self) -> bool {
        matches!(self, DrivetrainType::Hybrid | DrivetrainType::Electric)
    }
}

impl Default for DrivetrainType {
    fn default() -> Self {
        DrivetrainType::Combustion
    }
}

/// Full years between manufacture and the valuation date
pub fn age_from_manufacture_year(manufacture_year: i32, valuation_date: NaiveDate) -> u32 {
    (valuation_date.year() - manufacture_year).max(0) as u32
}

/// Full years between first registration and the valuation date
pub fn age_from_registration_date(registration_date: NaiveDate, valuation_date: NaiveDate) -> u32 {
    let mut years = valuation_date.year() - registration_date.year();
    if (valuation_date.month(), valuation_date.day())
        < (registration_date.month(), registration_date.day())
    {
        years -= 1;
    }
    years.max(0) as u32
}

/// Immutable snapshot of the insured vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleProfile {
    value: Money,
    seat_count: u32,
    cargo_capacity_kg: Option<u32>,
    usage_class: UsageClass,
    drivetrain: DrivetrainType,
    battery_value: Option<Money>,
    age_years: u32,
}

impl VehicleProfile {
    /// Starts a profile builder
    pub fn builder() -> VehicleProfileBuilder {
        VehicleProfileBuilder::default()
    }

    /// Declared vehicle value (excluding battery)
    pub fn value(&self) -> Money {
        self.value
    }

    pub fn currency(&self) -> Currency {
        self.value.currency()
    }

    pub fn seat_count(&self) -> u32 {
        self.seat_count
    }

    pub fn cargo_capacity_kg(&self) -> Option<u32> {
        self.cargo_capacity_kg
    }

    pub fn usage_class(&self) -> UsageClass {
        self.usage_class
    }

    pub fn drivetrain(&self) -> DrivetrainType {
        self.drivetrain
    }

    /// Battery value, present only for hybrid and electric drivetrains
    pub fn battery_value(&self) -> Option<Money> {
        self.battery_value
    }

    /// Vehicle age in full years at valuation
    pub fn age_years(&self) -> u32 {
        self.age_years
    }

    /// Total insured value: vehicle value plus battery value when present
    pub fn total_insured_value(&self) -> Result<Money, PricingError> {
        match self.battery_value {
            Some(battery) => Ok(self.value.checked_add(&battery)?),
            None => Ok(self.value),
        }
    }

    /// Returns a copy with a different usage class
    ///
    /// Profiles are replaced wholesale; this is a convenience for edits that
    /// touch a single intake field.
    pub fn with_usage_class(&self, usage_class: UsageClass) -> Self {
        Self {
            usage_class,
            ..self.clone()
        }
    }

    /// Returns a copy with a different declared value
    pub fn with_value(&self, value: Money) -> Result<Self, PricingError> {
        VehicleProfileBuilder::from_profile(self).value(value).build()
    }
}

/// Builder for [`VehicleProfile`] that enforces the intake invariants
#[derive(Debug, Clone, Default)]
pub struct VehicleProfileBuilder {
    value: Option<Money>,
    seat_count: Option<u32>,
    cargo_capacity_kg: Option<u32>,
    usage_class: Option<UsageClass>,
    drivetrain: DrivetrainType,
    battery_value: Option<Money>,
    age_years: u32,
}

impl VehicleProfileBuilder {
    fn from_profile(profile: &VehicleProfile) -> Self {
        Self {
            value: Some(profile.value),
            seat_count: Some(profile.seat_count),
            cargo_capacity_kg: profile.cargo_capacity_kg,
            usage_class: Some(profile.usage_class),
            drivetrain: profile.drivetrain,
            battery_value: profile.battery_value,
            age_years: profile.age_years,
        }
    }

    pub fn value(mut self, value: Money) -> Self {
        self.value = Some(value);
        self
    }

    pub fn seat_count(mut self, seats: u32) -> Self {
        self.seat_count = Some(seats);
        self
    }

    pub fn cargo_capacity_kg(mut self, kg: Option<u32>) -> Self {
        self.cargo_capacity_kg = kg;
        self
    }

    pub fn usage_class(mut self, usage: UsageClass) -> Self {
        self.usage_class = Some(usage);
        self
    }

    pub fn drivetrain(mut self, drivetrain: DrivetrainType) -> Self {
        self.drivetrain = drivetrain;
        self
    }

    pub fn battery_value(mut self, battery: Option<Money>) -> Self {
        self.battery_value = battery;
        self
    }

    pub fn age_years(mut self, years: u32) -> Self {
        self.age_years = years;
        self
    }

    /// Validates and builds the profile
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Validation` if:
    /// - the value, seat count or usage class is missing
    /// - the value or battery value is negative
    /// - the seat count is zero
    /// - a hybrid/electric drivetrain has no battery value, or a combustion
    ///   drivetrain carries one
    /// - the battery value is in a different currency than the vehicle value
    pub fn build(self) -> Result<VehicleProfile, PricingError> {
        let value = self
            .value
            .ok_or_else(|| PricingError::validation("Vehicle value is required"))?;
        if value.is_negative() {
            return Err(PricingError::validation("Vehicle value must not be negative"));
        }

        let seat_count = self
            .seat_count
            .ok_or_else(|| PricingError::validation("Seat count is required"))?;
        if seat_count < 1 {
            return Err(PricingError::validation("Seat count must be at least 1"));
        }

        let usage_class = self
            .usage_class
            .ok_or_else(|| PricingError::validation("Usage class is required"))?;

        match (self.drivetrain.has_traction_battery(), self.battery_value) {
            (true, None) => {
                return Err(PricingError::validation(
                    "Battery value is required for hybrid and electric vehicles",
                ));
            }
            (true, Some(battery)) => {
                if battery.is_negative() {
                    return Err(PricingError::validation("Battery value must not be negative"));
                }
                if battery.currency() != value.currency() {
                    return Err(PricingError::validation(format!(
                        "Battery value currency {} does not match vehicle value currency {}",
                        battery.currency(),
                        value.currency()
                    )));
                }
            }
            (false, Some(_)) => {
                return Err(PricingError::validation(
                    "Battery value only applies to hybrid and electric vehicles",
                ));
            }
            (false, None) => {}
        }

        Ok(VehicleProfile {
            value,
            seat_count,
            cargo_capacity_kg: self.cargo_capacity_kg,
            usage_class,
            drivetrain: self.drivetrain,
            battery_value: self.battery_value,
            age_years: self.age_years,
        })
    }
}
