//! Usage class resolution
//!
//! Maps a vehicle's declared usage to the key consumed by the rate table,
//! the package fee calculator and the liability fee resolver.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::vehicle::{UsageClass, VehicleProfile};
use crate::warning::Warning;

/// Which liability category family a usage class belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilityGroup {
    /// Categorised by seat count
    Passenger,
    /// Pickups and vans, single category per commercial flag
    PickupVan,
    /// Categorised by cargo tonnage
    Cargo,
}

/// Resolved pricing key for a usage class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageClassKey {
    usage: UsageClass,
    commercial: bool,
    minimum_fee_eligible: bool,
    liability_group: LiabilityGroup,
}

impl UsageClassKey {
    /// The usage class this key prices (never `Unspecified`)
    pub fn usage(&self) -> UsageClass {
        self.usage
    }

    /// True for business use (the `kd_` wire codes)
    pub fn is_commercial(&self) -> bool {
        self.commercial
    }

    /// True when the private-passenger minimum-fee floor may apply
    pub fn is_minimum_fee_eligible(&self) -> bool {
        self.minimum_fee_eligible
    }

    pub fn liability_group(&self) -> LiabilityGroup {
        self.liability_group
    }

    pub fn code(&self) -> &'static str {
        self.usage.code()
    }
}

/// A resolved key plus the warning raised when the usage was defaulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUsage {
    pub key: UsageClassKey,
    pub warning: Option<Warning>,
}

impl ResolvedUsage {
    pub fn is_defaulted(&self) -> bool {
        self.warning.is_some()
    }
}

/// Resolves usage classes to pricing keys
///
/// The resolver is total: every variant maps to exactly one key and
/// [`UsageClass::Unspecified`] maps to the private passenger key with a
/// [`Warning::UsageClassDefaulted`].
#[derive(Debug, Clone, Copy)]
pub struct UsageClassResolver {
    default_usage: UsageClass,
}

impl UsageClassResolver {
    pub fn new() -> Self {
        Self {
            default_usage: UsageClass::PrivatePassenger,
        }
    }

    /// Usage class used when the declared one is unspecified
    pub fn default_usage(&self) -> UsageClass {
        self.default_usage
    }

    /// Resolves the key for a vehicle profile
    pub fn resolve(&self, profile: &VehicleProfile) -> ResolvedUsage {
        self.resolve_usage(profile.usage_class())
    }

    /// Resolves the key for a usage class
    pub fn resolve_usage(&self, usage: UsageClass) -> ResolvedUsage {
        match usage {
            UsageClass::Unspecified => {
                warn!(
                    default_key = self.default_usage.code(),
                    "Usage class unspecified, falling back to default key"
                );
                ResolvedUsage {
                    key: Self::key_for(self.default_usage),
                    warning: Some(Warning::UsageClassDefaulted {
                        declared: usage.code().to_string(),
                        default_key: self.default_usage.code().to_string(),
                    }),
                }
            }
            declared => ResolvedUsage {
                key: Self::key_for(declared),
                warning: None,
            },
        }
    }

    /// Builds the key for a concrete usage class
    fn key_for(usage: UsageClass) -> UsageClassKey {
        UsageClassKey {
            usage,
            commercial: usage.code().starts_with("kd_"),
            minimum_fee_eligible: usage == UsageClass::PrivatePassenger,
            liability_group: Self::liability_group(usage),
        }
    }

    fn liability_group(usage: UsageClass) -> LiabilityGroup {
        match usage {
            UsageClass::PrivatePickupVan | UsageClass::CommercialPickupVan => {
                LiabilityGroup::PickupVan
            }
            UsageClass::PrivateCargo
            | UsageClass::CommercialCargo
            | UsageClass::TowTruck
            | UsageClass::TrailerDumpTruck => LiabilityGroup::Cargo,
            UsageClass::PrivatePassenger
            | UsageClass::IntercityCoach
            | UsageClass::RideHail
            | UsageClass::SelfDriveTaxi
            | UsageClass::CharterCoach
            | UsageClass::Bus
            | UsageClass::SpecialPurpose
            | UsageClass::Unspecified => LiabilityGroup::Passenger,
        }
    }
}

impl Default for UsageClassResolver {
    fn default() -> Self {
        Self::new()
    }
}
