//! Premium Calculation Domain
//!
//! This crate prices Vietnamese motor insurance quotes: the physical-damage
//! package fee, the battery surcharge for hybrid and electric vehicles, the
//! compulsory liability (TNDS) fee, the passenger accident (NNTX) fee and the
//! renewal adjustment.
//!
//! # Architecture
//!
//! Data flows one way for a given computation:
//!
//! ```text
//! VehicleProfile + selections
//!     -> UsageClassResolver -> RateTable
//!     -> PackageFeeCalculator / BatterySurchargeCalculator
//!        / LiabilityFeeResolver / PassengerAccidentFeeCalculator
//!     -> PremiumAggregator -> CalculationResult
//! ```
//!
//! Every calculator is a pure function of immutable snapshots.
//! [`RecalculationController`] owns the inputs of one quote and replaces the
//! result wholesale whenever any input changes.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_pricing::{CoverageSelection, PricingEngine, QuoteInputs, VehicleProfile, UsageClass};
//!
//! let profile = VehicleProfile::builder()
//!     .value(Money::vnd(800_000_000))
//!     .seat_count(5)
//!     .usage_class(UsageClass::PrivatePassenger)
//!     .build()?;
//!
//! let engine = PricingEngine::new(PricingConfig::from_env()?)?;
//! let result = engine.calculate(&QuoteInputs::new(profile, CoverageSelection::package(0).with_liability()))?;
//! ```

pub mod vehicle;
pub mod usage;
pub mod warning;
pub mod config;
pub mod rate_table;
pub mod package_fee;
pub mod battery;
pub mod liability;
pub mod passenger;
pub mod adjustments;
pub mod extras;
pub mod aggregator;
pub mod engine;
pub mod recalculation;
pub mod intake;
pub mod error;

pub use vehicle::{DrivetrainType, UsageClass, VehicleProfile, VehicleProfileBuilder};
pub use usage::{LiabilityGroup, ResolvedUsage, UsageClassKey, UsageClassResolver};
pub use warning::Warning;
pub use config::{ExtraPackageConfig, PassengerPackageConfig, PricingConfig};
pub use rate_table::{
    AgeBand, PackageDefinition, PackageOption, RateSelection, RateTable, UsageTariff, ValueBand,
};
pub use package_fee::{MinimumFeePolicy, PackageFee, PackageFeeCalculator};
pub use battery::BatterySurchargeCalculator;
pub use liability::{LiabilityCategory, LiabilityFee, LiabilityFeeResolver};
pub use passenger::{PassengerAccidentFeeCalculator, PassengerFeeBasis, PassengerPackage};
pub use adjustments::{DeductiblePolicy, RenewalAdjustment};
pub use extras::{ExtraPackage, ExtraPackageCatalog};
pub use aggregator::{CalculationResult, PremiumAggregator, PremiumComponents, QuoteSummary};
pub use engine::{CoverageSelection, PricingEngine, QuoteInputs, RateOverride};
pub use recalculation::RecalculationController;
pub use intake::VehicleIntake;
pub use error::PricingError;
