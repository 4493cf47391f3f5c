//! Physical-damage rate table
//!
//! Each usage class has its own grid of percentages keyed by vehicle age
//! band and package. The private passenger grid is further split by vehicle
//! value band. An empty cell means the package is not offered for that
//! vehicle.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Rate;
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::usage::UsageClassKey;
use crate::vehicle::{UsageClass, VehicleProfile};

/// Vehicle value band of the tariff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBand {
    /// Below 500,000,000
    Under500M,
    /// 500,000,000 up to 700,000,000
    From500MTo700M,
    /// 700,000,000 up to 1,000,000,000
    From700MTo1B,
    /// 1,000,000,000 and above
    From1B,
}

impl ValueBand {
    pub fn from_value(value: Decimal) -> Self {
        if value < dec!(500000000) {
            ValueBand::Under500M
        } else if value < dec!(700000000) {
            ValueBand::From500MTo700M
        } else if value < dec!(1000000000) {
            ValueBand::From700MTo1B
        } else {
            ValueBand::From1B
        }
    }

    fn row(&self) -> usize {
        match self {
            ValueBand::Under500M => 0,
            ValueBand::From500MTo700M => 1,
            ValueBand::From700MTo1B => 2,
            ValueBand::From1B => 3,
        }
    }
}

/// Vehicle age band of the tariff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Under3,
    From3To6,
    From6To10,
    From10,
}

impl AgeBand {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=2 => AgeBand::Under3,
            3..=5 => AgeBand::From3To6,
            6..=9 => AgeBand::From6To10,
            _ => AgeBand::From10,
        }
    }

    fn column(&self) -> usize {
        match self {
            AgeBand::Under3 => 0,
            AgeBand::From3To6 => 1,
            AgeBand::From6To10 => 2,
            AgeBand::From10 => 3,
        }
    }
}

/// Tariff cells for the four grid packages of one row
type TariffRow = [Option<Decimal>; 4];

/// Rows of one usage class, indexed by [`AgeBand`]
type AgeRows = [TariffRow; 4];

/// Tariff of one usage class
///
/// Only the private passenger tariff is split by vehicle value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageTariff {
    /// Rows indexed `[value band][age band]`
    ValueBanded([AgeRows; 4]),
    AgeOnly(AgeRows),
}

impl UsageTariff {
    /// Basic-package rate of a new vehicle in the top value band
    fn reference_rate(&self) -> Option<Decimal> {
        match self {
            UsageTariff::ValueBanded(bands) => bands[ValueBand::From1B.row()][AgeBand::Under3.column()][0],
            UsageTariff::AgeOnly(rows) => rows[AgeBand::Under3.column()][0],
        }
    }

    fn row(&self, profile: &VehicleProfile) -> &TariffRow {
        let age = AgeBand::from_years(profile.age_years()).column();
        match self {
            UsageTariff::ValueBanded(bands) => {
                &bands[ValueBand::from_value(profile.value().amount()).row()][age]
            }
            UsageTariff::AgeOnly(rows) => &rows[age],
        }
    }
}

macro_rules! row {
    ($a:literal, $b:literal, $c:literal, $d:literal) => {
        [Some(dec!($a)), Some(dec!($b)), Some(dec!($c)), Some(dec!($d))]
    };
    ($a:literal, $b:literal, $c:literal) => {
        [Some(dec!($a)), Some(dec!($b)), Some(dec!($c)), None]
    };
}

const PRIVATE_PASSENGER: UsageTariff = UsageTariff::ValueBanded([
    // Under 500M
    [row!(1.25, 1.25, 1.3, 1.3), row!(1.35, 1.4, 1.45, 1.5), row!(1.45, 1.55, 1.6, 1.7), row!(1.54, 1.69, 1.74)],
    // 500M to 700M
    [row!(1.1, 1.1, 1.15, 1.15), row!(1.2, 1.25, 1.3, 1.35), row!(1.3, 1.4, 1.45, 1.55), row!(1.4, 1.55, 1.6)],
    // 700M to 1B
    [row!(1.0, 1.0, 1.05, 1.05), row!(1.1, 1.15, 1.2, 1.25), row!(1.25, 1.35, 1.4, 1.5), row!(1.35, 1.5, 1.55)],
    // 1B and above
    [row!(1.0, 1.0, 1.0, 1.0), row!(1.1, 1.15, 1.2, 1.2), row!(1.21, 1.31, 1.36, 1.46), row!(1.32, 1.47, 1.52)],
]);

const PRIVATE_CARGO: AgeRows =
    [row!(1.15, 1.15, 1.2, 1.2), row!(1.2, 1.25, 1.3, 1.35), row!(1.3, 1.4, 1.45, 1.55), row!(1.5, 1.65, 1.7)];
const PICKUP_VAN: AgeRows =
    [row!(1.3, 1.3, 1.35, 1.35), row!(1.35, 1.4, 1.45, 1.5), row!(1.45, 1.55, 1.6, 1.7), row!(1.55, 1.7, 1.75)];
const COMMERCIAL_CARGO: AgeRows =
    [row!(1.21, 1.21, 1.26, 1.26), row!(1.32, 1.37, 1.42, 1.47), row!(1.43, 1.53, 1.58, 1.68), row!(1.55, 1.7, 1.75)];
const TOW_TRUCK: AgeRows =
    [row!(1.65, 1.65, 1.65, 1.65), row!(1.76, 1.81, 1.81, 1.86), row!(1.95, 2.05, 2.05, 2.15), row!(2.2, 2.35, 2.4)];
const INTERCITY_COACH: AgeRows =
    [row!(1.5, 1.5, 1.55, 1.55), row!(1.6, 1.65, 1.7, 1.75), row!(1.8, 1.9, 1.95, 2.05), row!(1.9, 2.05, 2.1)];
const RIDE_HAIL: AgeRows =
    [row!(1.8, 1.8, 1.85, 1.85), row!(1.9, 1.95, 2.0, 2.05), row!(2.2, 2.3, 2.35, 2.45), row!(2.4, 2.55, 2.6)];
const SELF_DRIVE_TAXI: AgeRows =
    [row!(2.4, 2.4, 2.45, 2.45), row!(2.5, 2.55, 2.6, 2.65), row!(2.7, 2.8, 2.85, 2.95), row!(3.2, 3.35, 3.4)];
const CHARTER_COACH: AgeRows =
    [row!(1.15, 1.15, 1.2, 1.2), row!(1.25, 1.3, 1.35, 1.4), row!(1.4, 1.5, 1.55, 1.65), row!(1.5, 1.65, 1.7)];
const BUS: AgeRows =
    [row!(1.25, 1.25, 1.3, 1.3), row!(1.35, 1.4, 1.45, 1.5), row!(1.45, 1.55, 1.6, 1.7), row!(1.54, 1.69, 1.74)];
const SPECIAL_PURPOSE: AgeRows =
    [row!(1.15, 1.15, 1.2, 1.2), row!(1.2, 1.25, 1.3, 1.35), row!(1.3, 1.4, 1.45, 1.55), row!(1.5, 1.65, 1.7)];

/// The published tariff
///
/// Trailer and dump trucks have no published rows.
fn standard_tariffs() -> HashMap<UsageClass, UsageTariff> {
    [
        (UsageClass::PrivatePassenger, PRIVATE_PASSENGER),
        (UsageClass::PrivateCargo, UsageTariff::AgeOnly(PRIVATE_CARGO)),
        (UsageClass::PrivatePickupVan, UsageTariff::AgeOnly(PICKUP_VAN)),
        (UsageClass::CommercialCargo, UsageTariff::AgeOnly(COMMERCIAL_CARGO)),
        (UsageClass::TowTruck, UsageTariff::AgeOnly(TOW_TRUCK)),
        (UsageClass::IntercityCoach, UsageTariff::AgeOnly(INTERCITY_COACH)),
        (UsageClass::RideHail, UsageTariff::AgeOnly(RIDE_HAIL)),
        (UsageClass::SelfDriveTaxi, UsageTariff::AgeOnly(SELF_DRIVE_TAXI)),
        (UsageClass::CharterCoach, UsageTariff::AgeOnly(CHARTER_COACH)),
        (UsageClass::Bus, UsageTariff::AgeOnly(BUS)),
        (UsageClass::CommercialPickupVan, UsageTariff::AgeOnly(PICKUP_VAN)),
        (UsageClass::SpecialPurpose, UsageTariff::AgeOnly(SPECIAL_PURPOSE)),
    ]
    .into_iter()
    .collect()
}

/// Index of the theft-of-parts package derived from the garage-choice cell
const AU009_PACKAGE: usize = 4;
const AU009_BASE_PACKAGE: usize = 3;

/// A physical-damage package in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDefinition {
    pub index: usize,
    pub name: String,
    pub detail: String,
}

fn standard_packages() -> Vec<PackageDefinition> {
    [
        ("Gói Cơ bản", "Bảo hiểm cơ bản"),
        ("Gói + AU001", "Thêm: Thay mới không khấu hao"),
        ("Gói + AU001 + AU006", "Thêm: Thủy kích"),
        ("Gói + AU001 + AU002 + AU006", "Thêm: Lựa chọn garage"),
        ("Gói + AU001 + AU002 + AU006 + AU009", "Thêm: Mất cắp bộ phận"),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, detail))| PackageDefinition {
        index,
        name: name.to_string(),
        detail: detail.to_string(),
    })
    .collect()
}

/// How the rate for the selected package is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum RateSelection {
    /// The tariff rate of the package
    Base,
    /// A user-entered rate on the tariff scale
    Override(Rate),
}

/// A package as presented for one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOption {
    pub index: usize,
    pub name: String,
    pub detail: String,
    /// Tariff rate for this vehicle, `None` when not offered
    pub base_rate: Option<Rate>,
    pub applicable: bool,
}

/// Static rate lookup for physical-damage packages
#[derive(Debug, Clone)]
pub struct RateTable {
    packages: Vec<PackageDefinition>,
    tariffs: HashMap<UsageClass, UsageTariff>,
    au009_additional_rate: Decimal,
}

impl RateTable {
    /// Builds the standard table with the default AU009 loading
    pub fn standard() -> Self {
        Self::from_config(&PricingConfig::default())
    }

    /// Builds the standard table using the configured AU009 loading
    pub fn from_config(config: &PricingConfig) -> Self {
        Self {
            packages: standard_packages(),
            tariffs: standard_tariffs(),
            au009_additional_rate: config.au009_additional_rate,
        }
    }

    /// Replaces the tariff of one usage class
    pub fn with_tariff(mut self, usage: UsageClass, tariff: UsageTariff) -> Self {
        self.tariffs.insert(usage, tariff);
        self
    }

    /// Removes the tariff of one usage class
    pub fn without_tariff(mut self, usage: UsageClass) -> Self {
        self.tariffs.remove(&usage);
        self
    }

    pub fn packages(&self) -> &[PackageDefinition] {
        &self.packages
    }

    /// Looks up a package definition
    pub fn package(&self, index: usize) -> Result<&PackageDefinition, PricingError> {
        self.packages
            .get(index)
            .ok_or(PricingError::PackageNotFound(index))
    }

    fn tariff(&self, key: &UsageClassKey) -> Result<&UsageTariff, PricingError> {
        self.tariffs.get(&key.usage()).ok_or_else(|| {
            PricingError::configuration(format!(
                "Rate table has no tariff for usage class '{}'",
                key.code()
            ))
        })
    }

    fn tariff_cell(
        &self,
        index: usize,
        profile: &VehicleProfile,
        key: &UsageClassKey,
    ) -> Result<Option<Decimal>, PricingError> {
        let row = self.tariff(key)?.row(profile);

        Ok(match index {
            AU009_PACKAGE => row[AU009_BASE_PACKAGE].map(|cell| cell + self.au009_additional_rate),
            i if i < row.len() => row[i],
            _ => None,
        })
    }

    /// Tariff rate of a package for this vehicle and usage
    ///
    /// # Errors
    ///
    /// * `PackageNotFound` if the index is outside the catalog
    /// * `Configuration` if the table has no tariff for the usage class
    /// * `PackageNotApplicable` if the tariff has no cell for this vehicle
    pub fn base_rate(
        &self,
        index: usize,
        profile: &VehicleProfile,
        key: &UsageClassKey,
    ) -> Result<Rate, PricingError> {
        self.package(index)?;
        self.tariff_cell(index, profile, key)?
            .map(Rate::from_percentage)
            .ok_or_else(|| {
                PricingError::not_applicable(
                    index,
                    format!(
                        "not offered for {} vehicles aged {} years",
                        key.code(),
                        profile.age_years()
                    ),
                )
            })
    }

    /// Factor a custom rate is scaled by for a usage class
    ///
    /// Custom rates are entered on the private passenger scale. The factor
    /// is the usage's new-vehicle basic rate over the private passenger one
    /// (2.4 for a self-drive taxi).
    pub fn override_multiplier(&self, key: &UsageClassKey) -> Result<Decimal, PricingError> {
        let private = self
            .tariffs
            .get(&UsageClass::PrivatePassenger)
            .and_then(UsageTariff::reference_rate)
            .filter(|rate| !rate.is_zero())
            .ok_or_else(|| PricingError::configuration("Rate table has no private passenger reference rate"))?;
        let usage = self.tariff(key)?.reference_rate().ok_or_else(|| {
            PricingError::configuration(format!(
                "Rate table has no reference rate for usage class '{}'",
                key.code()
            ))
        })?;

        Ok(usage / private)
    }

    /// Resolves the single rate a calculation uses
    ///
    /// The package must be applicable even when overridden.
    pub fn effective_rate(
        &self,
        index: usize,
        profile: &VehicleProfile,
        key: &UsageClassKey,
        selection: &RateSelection,
    ) -> Result<Rate, PricingError> {
        let base = self.base_rate(index, profile, key)?;

        match selection {
            RateSelection::Base => Ok(base),
            RateSelection::Override(rate) => Ok(rate.scale(self.override_multiplier(key)?)),
        }
    }

    /// Returns true if the package is offered for this vehicle and usage
    pub fn is_applicable(&self, index: usize, profile: &VehicleProfile, key: &UsageClassKey) -> bool {
        index < self.packages.len()
            && matches!(self.tariff_cell(index, profile, key), Ok(Some(_)))
    }

    /// Lists every package with its rate for this vehicle
    pub fn package_options(&self, profile: &VehicleProfile, key: &UsageClassKey) -> Vec<PackageOption> {
        self.packages
            .iter()
            .map(|package| {
                let base_rate = self
                    .tariff_cell(package.index, profile, key)
                    .ok()
                    .flatten()
                    .map(Rate::from_percentage);
                PackageOption {
                    index: package.index,
                    name: package.name.clone(),
                    detail: package.detail.clone(),
                    base_rate,
                    applicable: base_rate.is_some(),
                }
            })
            .collect()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Money;

    fn car(value: i64, age: u32, usage: UsageClass) -> VehicleProfile {
        VehicleProfile::builder()
            .value(Money::vnd(value))
            .seat_count(5)
            .usage_class(usage)
            .age_years(age)
            .build()
            .unwrap()
    }

    fn key(usage: UsageClass) -> UsageClassKey {
        crate::usage::UsageClassResolver::new().resolve_usage(usage).key
    }

    fn rates(table: &RateTable, profile: &VehicleProfile) -> Vec<Decimal> {
        let key = key(profile.usage_class());
        (0..4)
            .map(|i| table.base_rate(i, profile, &key).unwrap().as_percentage())
            .collect()
    }

    #[test]
    fn test_bands() {
        assert_eq!(ValueBand::from_value(dec!(499999999)), ValueBand::Under500M);
        assert_eq!(ValueBand::from_value(dec!(500000000)), ValueBand::From500MTo700M);
        assert_eq!(ValueBand::from_value(dec!(1000000000)), ValueBand::From1B);
        assert_eq!(AgeBand::from_years(3), AgeBand::From3To6);
        assert_eq!(AgeBand::from_years(10), AgeBand::From10);
    }

    #[test]
    fn test_private_passenger_lookup() {
        let table = RateTable::standard();
        let profile = car(800_000_000, 4, UsageClass::PrivatePassenger);
        let key = key(UsageClass::PrivatePassenger);

        assert_eq!(table.base_rate(3, &profile, &key).unwrap(), Rate::from_percentage(dec!(1.25)));
        assert_eq!(table.base_rate(4, &profile, &key).unwrap(), Rate::from_percentage(dec!(1.35)));
    }

    #[test]
    fn test_usage_rows_ignore_value() {
        let table = RateTable::standard();

        assert_eq!(
            rates(&table, &car(600_000_000, 3, UsageClass::SelfDriveTaxi)),
            vec![dec!(2.5), dec!(2.55), dec!(2.6), dec!(2.65)]
        );
        assert_eq!(
            rates(&table, &car(800_000_000, 4, UsageClass::CommercialCargo)),
            vec![dec!(1.32), dec!(1.37), dec!(1.42), dec!(1.47)]
        );
        assert_eq!(
            rates(&table, &car(300_000_000, 1, UsageClass::TowTruck)),
            rates(&table, &car(3_000_000_000, 1, UsageClass::TowTruck))
        );
    }

    #[test]
    fn test_old_vehicle_excludes_garage_packages() {
        let table = RateTable::standard();
        let profile = car(300_000_000, 12, UsageClass::PrivatePassenger);
        let key = key(UsageClass::PrivatePassenger);

        assert!(table.is_applicable(2, &profile, &key));
        assert!(!table.is_applicable(3, &profile, &key));
        assert!(!table.is_applicable(4, &profile, &key));
        assert!(matches!(
            table.base_rate(3, &profile, &key),
            Err(PricingError::PackageNotApplicable { index: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_package() {
        let table = RateTable::standard();
        let profile = car(300_000_000, 1, UsageClass::PrivatePassenger);
        let key = key(UsageClass::PrivatePassenger);

        assert_eq!(table.base_rate(9, &profile, &key), Err(PricingError::PackageNotFound(9)));
        assert!(!table.is_applicable(9, &profile, &key));
    }

    #[test]
    fn test_override_scaled_for_usage() {
        let table = RateTable::standard();
        let profile = car(800_000_000, 1, UsageClass::SelfDriveTaxi);
        let selection = RateSelection::Override(Rate::from_percentage(dec!(1.5)));

        let rate = table
            .effective_rate(0, &profile, &key(UsageClass::SelfDriveTaxi), &selection)
            .unwrap();
        assert_eq!(rate.as_percentage(), dec!(3.6));
    }

    #[test]
    fn test_override_multipliers_follow_sheet() {
        let table = RateTable::standard();
        let multiplier = |usage| table.override_multiplier(&key(usage)).unwrap();

        assert_eq!(multiplier(UsageClass::PrivatePassenger), dec!(1));
        assert_eq!(multiplier(UsageClass::RideHail), dec!(1.8));
        assert_eq!(multiplier(UsageClass::SelfDriveTaxi), dec!(2.4));
        assert_eq!(multiplier(UsageClass::CommercialCargo), dec!(1.21));
    }

    #[test]
    fn test_trailer_has_no_tariff() {
        let table = RateTable::standard();
        let profile = car(800_000_000, 1, UsageClass::TrailerDumpTruck);
        let key = key(UsageClass::TrailerDumpTruck);

        assert!(table.base_rate(0, &profile, &key).unwrap_err().is_configuration());
        assert!(table.override_multiplier(&key).unwrap_err().is_configuration());
        assert!(!table.is_applicable(0, &profile, &key));
        assert!(table.package_options(&profile, &key).iter().all(|o| !o.applicable));
    }

    #[test]
    fn test_removed_tariff_is_configuration_error() {
        let table = RateTable::standard().without_tariff(UsageClass::Bus);
        let profile = car(800_000_000, 1, UsageClass::Bus);

        let err = table.base_rate(0, &profile, &key(UsageClass::Bus)).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_replacement_tariff() {
        let rows = [[Some(dec!(2.0)), None, None, None]; 4];
        let table = RateTable::standard().with_tariff(UsageClass::Bus, UsageTariff::AgeOnly(rows));
        let profile = car(800_000_000, 1, UsageClass::Bus);
        let key = key(UsageClass::Bus);

        assert_eq!(table.base_rate(0, &profile, &key).unwrap().as_percentage(), dec!(2.0));
        assert!(!table.is_applicable(1, &profile, &key));
    }

    #[test]
    fn test_package_options_lists_catalog() {
        let table = RateTable::standard();
        let profile = car(300_000_000, 12, UsageClass::PrivatePassenger);
        let options = table.package_options(&profile, &key(UsageClass::PrivatePassenger));

        assert_eq!(options.len(), 5);
        assert_eq!(options[0].name, "Gói Cơ bản");
        assert_eq!(
            options.iter().filter(|o| o.applicable).count(),
            3
        );
        assert!(options[4].base_rate.is_none());
    }
}
