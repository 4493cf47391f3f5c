//! Compulsory third-party liability (TNDS) fee
//!
//! The fee is a fixed amount per category. Categories are derived from seat
//! count, cargo capacity and usage; vehicle value never enters into it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Currency, Money};
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::usage::{LiabilityGroup, UsageClassKey};

/// Liability fee category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LiabilityCategory {
    PrivateUnder6Seats,
    Private6To11Seats,
    Private12To24Seats,
    PrivateOver24Seats,
    PrivatePickupVan,
    CommercialUnder6Seats,
    /// Commercial passenger vehicle with 6 to 16 seats, priced per seat count
    CommercialSeats(u8),
    Commercial17To24Seats,
    CommercialOver24Seats,
    CommercialPickupVan,
    CargoUnder3Tonnes,
    Cargo3To8Tonnes,
    Cargo8To15Tonnes,
    CargoOver15Tonnes,
}

impl LiabilityCategory {
    /// Every category, in tariff order
    pub fn all() -> Vec<LiabilityCategory> {
        let mut all = vec![
            LiabilityCategory::PrivateUnder6Seats,
            LiabilityCategory::Private6To11Seats,
            LiabilityCategory::Private12To24Seats,
            LiabilityCategory::PrivateOver24Seats,
            LiabilityCategory::PrivatePickupVan,
            LiabilityCategory::CommercialUnder6Seats,
        ];
        all.extend((6..=16).map(LiabilityCategory::CommercialSeats));
        all.extend([
            LiabilityCategory::Commercial17To24Seats,
            LiabilityCategory::CommercialOver24Seats,
            LiabilityCategory::CommercialPickupVan,
            LiabilityCategory::CargoUnder3Tonnes,
            LiabilityCategory::Cargo3To8Tonnes,
            LiabilityCategory::Cargo8To15Tonnes,
            LiabilityCategory::CargoOver15Tonnes,
        ]);
        all
    }

    /// Tariff code of the category
    pub fn code(&self) -> String {
        match self {
            LiabilityCategory::PrivateUnder6Seats => "duoi_6_cho_khong_kd".to_string(),
            LiabilityCategory::Private6To11Seats => "6_den_11_cho_khong_kd".to_string(),
            LiabilityCategory::Private12To24Seats => "12_den_24_cho_khong_kd".to_string(),
            LiabilityCategory::PrivateOver24Seats => "tren_24_cho_khong_kd".to_string(),
            LiabilityCategory::PrivatePickupVan => "pickup_khong_kd".to_string(),
            LiabilityCategory::CommercialUnder6Seats => "duoi_6_cho_kd".to_string(),
            LiabilityCategory::CommercialSeats(seats) => format!("{}_cho_kd", seats),
            LiabilityCategory::Commercial17To24Seats => "tren_16_den_24_kd".to_string(),
            LiabilityCategory::CommercialOver24Seats => "tren_24_kd".to_string(),
            LiabilityCategory::CommercialPickupVan => "pickup_kd".to_string(),
            LiabilityCategory::CargoUnder3Tonnes => "tai_duoi_3_tan".to_string(),
            LiabilityCategory::Cargo3To8Tonnes => "tai_3_den_8_tan".to_string(),
            LiabilityCategory::Cargo8To15Tonnes => "tai_8_den_15_tan".to_string(),
            LiabilityCategory::CargoOver15Tonnes => "tai_tren_15_tan".to_string(),
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|category| category.code() == code)
    }

    pub fn label(&self) -> String {
        match self {
            LiabilityCategory::PrivateUnder6Seats => "Xe < 6 chỗ (Không KD)".to_string(),
            LiabilityCategory::Private6To11Seats => "Xe 6-11 chỗ (Không KD)".to_string(),
            LiabilityCategory::Private12To24Seats => "Xe 12-24 chỗ (Không KD)".to_string(),
            LiabilityCategory::PrivateOver24Seats => "Xe > 24 chỗ (Không KD)".to_string(),
            LiabilityCategory::PrivatePickupVan => "Bán tải, Van (Không KD)".to_string(),
            LiabilityCategory::CommercialUnder6Seats => "Xe < 6 chỗ (Kinh doanh)".to_string(),
            LiabilityCategory::CommercialSeats(seats) => format!("Xe {} chỗ (Kinh doanh)", seats),
            LiabilityCategory::Commercial17To24Seats => "Xe 17-24 chỗ (Kinh doanh)".to_string(),
            LiabilityCategory::CommercialOver24Seats => "Xe > 24 chỗ (Kinh doanh)".to_string(),
            LiabilityCategory::CommercialPickupVan => "Bán tải, Van (Kinh doanh)".to_string(),
            LiabilityCategory::CargoUnder3Tonnes => "Xe tải < 3 tấn".to_string(),
            LiabilityCategory::Cargo3To8Tonnes => "Xe tải 3-8 tấn".to_string(),
            LiabilityCategory::Cargo8To15Tonnes => "Xe tải 8-15 tấn".to_string(),
            LiabilityCategory::CargoOver15Tonnes => "Xe tải > 15 tấn".to_string(),
        }
    }

    /// Derives the category of a vehicle
    ///
    /// Profiles with the same seat count, cargo capacity and usage key
    /// always land in the same category. A missing cargo capacity counts
    /// as zero tonnes.
    pub fn derive(seat_count: u32, cargo_capacity_kg: Option<u32>, key: &UsageClassKey) -> Self {
        match key.liability_group() {
            LiabilityGroup::PickupVan => {
                if key.is_commercial() {
                    LiabilityCategory::CommercialPickupVan
                } else {
                    LiabilityCategory::PrivatePickupVan
                }
            }
            LiabilityGroup::Cargo => {
                let tonnes = Decimal::from(cargo_capacity_kg.unwrap_or(0)) / dec!(1000);
                if tonnes < dec!(3) {
                    LiabilityCategory::CargoUnder3Tonnes
                } else if tonnes <= dec!(8) {
                    LiabilityCategory::Cargo3To8Tonnes
                } else if tonnes <= dec!(15) {
                    LiabilityCategory::Cargo8To15Tonnes
                } else {
                    LiabilityCategory::CargoOver15Tonnes
                }
            }
            LiabilityGroup::Passenger if key.is_commercial() => match seat_count {
                0..=5 => LiabilityCategory::CommercialUnder6Seats,
                6..=16 => LiabilityCategory::CommercialSeats(seat_count as u8),
                17..=24 => LiabilityCategory::Commercial17To24Seats,
                _ => LiabilityCategory::CommercialOver24Seats,
            },
            LiabilityGroup::Passenger => match seat_count {
                0..=5 => LiabilityCategory::PrivateUnder6Seats,
                6..=11 => LiabilityCategory::Private6To11Seats,
                12..=24 => LiabilityCategory::Private12To24Seats,
                _ => LiabilityCategory::PrivateOver24Seats,
            },
        }
    }
}

impl fmt::Display for LiabilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<LiabilityCategory> for String {
    fn from(category: LiabilityCategory) -> Self {
        category.code()
    }
}

impl TryFrom<String> for LiabilityCategory {
    type Error = PricingError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        LiabilityCategory::from_code(&code)
            .ok_or_else(|| PricingError::validation(format!("Unknown liability category '{}'", code)))
    }
}

/// Resolved category and its fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiabilityFee {
    pub category: LiabilityCategory,
    pub fee: Money,
}

/// Looks up liability fees by category
#[derive(Debug, Clone)]
pub struct LiabilityFeeResolver {
    fees: HashMap<LiabilityCategory, Money>,
}

impl LiabilityFeeResolver {
    /// Resolver with the statutory fee table
    pub fn standard(currency: Currency) -> Self {
        let fees = [
            (LiabilityCategory::PrivateUnder6Seats, 480_700),
            (LiabilityCategory::Private6To11Seats, 873_400),
            (LiabilityCategory::Private12To24Seats, 1_397_000),
            (LiabilityCategory::PrivateOver24Seats, 2_007_500),
            (LiabilityCategory::PrivatePickupVan, 480_700),
            (LiabilityCategory::CommercialUnder6Seats, 831_600),
            (LiabilityCategory::CommercialSeats(6), 1_021_900),
            (LiabilityCategory::CommercialSeats(7), 1_188_000),
            (LiabilityCategory::CommercialSeats(8), 1_378_300),
            (LiabilityCategory::CommercialSeats(9), 1_544_400),
            (LiabilityCategory::CommercialSeats(10), 1_663_200),
            (LiabilityCategory::CommercialSeats(11), 1_821_600),
            (LiabilityCategory::CommercialSeats(12), 2_004_200),
            (LiabilityCategory::CommercialSeats(13), 2_253_900),
            (LiabilityCategory::CommercialSeats(14), 2_443_100),
            (LiabilityCategory::CommercialSeats(15), 2_633_400),
            (LiabilityCategory::CommercialSeats(16), 3_359_400),
            (LiabilityCategory::Commercial17To24Seats, 5_095_200),
            (LiabilityCategory::CommercialOver24Seats, 5_294_300),
            (LiabilityCategory::CommercialPickupVan, 1_026_300),
            (LiabilityCategory::CargoUnder3Tonnes, 938_300),
            (LiabilityCategory::Cargo3To8Tonnes, 1_826_000),
            (LiabilityCategory::Cargo8To15Tonnes, 3_020_600),
            (LiabilityCategory::CargoOver15Tonnes, 3_520_000),
        ]
        .into_iter()
        .map(|(category, fee)| (category, Money::new(Decimal::from(fee), currency)))
        .collect();

        Self { fees }
    }

    /// Resolver over a replacement table keyed by category code
    ///
    /// Categories missing from the table fail at resolution time.
    pub fn from_table(table: &BTreeMap<String, Decimal>, currency: Currency) -> Result<Self, PricingError> {
        let fees = table
            .iter()
            .map(|(code, fee)| {
                let category = LiabilityCategory::from_code(code).ok_or_else(|| {
                    PricingError::configuration(format!("Unknown liability category code '{}'", code))
                })?;
                Ok((category, Money::new(*fee, currency)))
            })
            .collect::<Result<HashMap<_, _>, PricingError>>()?;

        Ok(Self { fees })
    }

    /// Resolver from configuration: the replacement table if set, else standard
    pub fn from_config(config: &PricingConfig) -> Result<Self, PricingError> {
        match &config.liability_fees {
            Some(table) => Self::from_table(table, config.currency),
            None => Ok(Self::standard(config.currency)),
        }
    }

    /// Fee of a category
    pub fn fee_for(&self, category: LiabilityCategory) -> Result<Money, PricingError> {
        self.fees.get(&category).copied().ok_or_else(|| {
            PricingError::configuration(format!(
                "No liability fee configured for category '{}'",
                category
            ))
        })
    }

    /// The explicit category if one was chosen, else the derived one
    pub fn category_for(
        &self,
        explicit: Option<LiabilityCategory>,
        seat_count: u32,
        cargo_capacity_kg: Option<u32>,
        key: &UsageClassKey,
    ) -> LiabilityCategory {
        explicit.unwrap_or_else(|| {
            let category = LiabilityCategory::derive(seat_count, cargo_capacity_kg, key);
            debug!(category = %category, usage = key.code(), "Derived liability category");
            category
        })
    }

    /// Resolves the category and looks up its fee
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when the table has no fee for the category.
    pub fn resolve_fee(
        &self,
        explicit: Option<LiabilityCategory>,
        seat_count: u32,
        cargo_capacity_kg: Option<u32>,
        key: &UsageClassKey,
    ) -> Result<LiabilityFee, PricingError> {
        let category = self.category_for(explicit, seat_count, cargo_capacity_kg, key);
        Ok(LiabilityFee {
            category,
            fee: self.fee_for(category)?,
        })
    }
}

impl Default for LiabilityFeeResolver {
    fn default() -> Self {
        Self::standard(Currency::VND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::UsageClassResolver;
    use crate::vehicle::UsageClass;

    fn key(usage: UsageClass) -> UsageClassKey {
        UsageClassResolver::new().resolve_usage(usage).key
    }

    #[test]
    fn test_codes_round_trip() {
        for category in LiabilityCategory::all() {
            assert_eq!(LiabilityCategory::from_code(&category.code()), Some(category));
        }
        assert_eq!(LiabilityCategory::all().len(), 24);
    }

    #[test]
    fn test_standard_table_is_exhaustive() {
        let resolver = LiabilityFeeResolver::default();
        for category in LiabilityCategory::all() {
            assert!(resolver.fee_for(category).is_ok(), "missing {}", category);
        }
    }

    #[test]
    fn test_private_five_seater() {
        let resolved = LiabilityFeeResolver::default()
            .resolve_fee(None, 5, None, &key(UsageClass::PrivatePassenger))
            .unwrap();
        assert_eq!(resolved.category, LiabilityCategory::PrivateUnder6Seats);
        assert_eq!(resolved.fee, Money::vnd(480_700));
    }

    #[test]
    fn test_commercial_per_seat_categories() {
        let taxi = key(UsageClass::SelfDriveTaxi);
        assert_eq!(LiabilityCategory::derive(7, None, &taxi), LiabilityCategory::CommercialSeats(7));
        assert_eq!(LiabilityCategory::derive(16, None, &taxi).code(), "16_cho_kd");
        assert_eq!(LiabilityCategory::derive(17, None, &taxi), LiabilityCategory::Commercial17To24Seats);
        assert_eq!(LiabilityCategory::derive(45, None, &taxi), LiabilityCategory::CommercialOver24Seats);
    }

    #[test]
    fn test_cargo_tonnage_boundaries() {
        let truck = key(UsageClass::CommercialCargo);
        assert_eq!(LiabilityCategory::derive(2, None, &truck), LiabilityCategory::CargoUnder3Tonnes);
        assert_eq!(LiabilityCategory::derive(2, Some(2_999), &truck), LiabilityCategory::CargoUnder3Tonnes);
        assert_eq!(LiabilityCategory::derive(2, Some(3_000), &truck), LiabilityCategory::Cargo3To8Tonnes);
        assert_eq!(LiabilityCategory::derive(2, Some(8_000), &truck), LiabilityCategory::Cargo3To8Tonnes);
        assert_eq!(LiabilityCategory::derive(2, Some(15_000), &truck), LiabilityCategory::Cargo8To15Tonnes);
        assert_eq!(LiabilityCategory::derive(2, Some(15_001), &truck), LiabilityCategory::CargoOver15Tonnes);
    }

    #[test]
    fn test_pickup_follows_commercial_flag() {
        assert_eq!(
            LiabilityCategory::derive(5, None, &key(UsageClass::PrivatePickupVan)),
            LiabilityCategory::PrivatePickupVan
        );
        assert_eq!(
            LiabilityCategory::derive(5, None, &key(UsageClass::CommercialPickupVan)),
            LiabilityCategory::CommercialPickupVan
        );
    }

    #[test]
    fn test_partial_table_reports_configuration_error() {
        let mut table = BTreeMap::new();
        table.insert("duoi_6_cho_khong_kd".to_string(), dec!(500000));
        let resolver = LiabilityFeeResolver::from_table(&table, Currency::VND).unwrap();

        let err = resolver
            .resolve_fee(None, 7, None, &key(UsageClass::PrivatePassenger))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_explicit_category_wins() {
        let resolved = LiabilityFeeResolver::default()
            .resolve_fee(
                Some(LiabilityCategory::PrivatePickupVan),
                5,
                None,
                &key(UsageClass::PrivatePassenger),
            )
            .unwrap();
        assert_eq!(resolved.category, LiabilityCategory::PrivatePickupVan);
    }

    #[test]
    fn test_unknown_code_in_table_rejected() {
        let mut table = BTreeMap::new();
        table.insert("xe_lua".to_string(), dec!(1));
        assert!(LiabilityFeeResolver::from_table(&table, Currency::VND).is_err());
    }

    #[test]
    fn test_category_serializes_as_code() {
        let json = serde_json::to_string(&LiabilityCategory::CommercialSeats(9)).unwrap();
        assert_eq!(json, "\"9_cho_kd\"");
        let back: LiabilityCategory = serde_json::from_str("\"tai_3_den_8_tan\"").unwrap();
        assert_eq!(back, LiabilityCategory::Cargo3To8Tonnes);
    }
}
