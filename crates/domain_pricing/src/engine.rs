//! Pricing engine
//!
//! [`PricingEngine::calculate`] runs the whole pipeline against one complete
//! input snapshot: usage resolution, rate lookup, every fee calculator and
//! aggregation. It holds no per-quote state, so one engine can price any
//! number of quotes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{Money, Rate};
use crate::adjustments::{DeductiblePolicy, RenewalAdjustment};
use crate::aggregator::{CalculationResult, PremiumAggregator, PremiumComponents};
use crate::battery::BatterySurchargeCalculator;
use crate::config::PricingConfig;
use crate::error::PricingError;
use crate::extras::ExtraPackageCatalog;
use crate::liability::{LiabilityCategory, LiabilityFee, LiabilityFeeResolver};
use crate::package_fee::{MinimumFeePolicy, PackageFeeCalculator};
use crate::passenger::{PassengerAccidentFeeCalculator, PassengerFeeBasis};
use crate::rate_table::{PackageOption, RateSelection, RateTable};
use crate::usage::{UsageClassKey, UsageClassResolver};
use crate::vehicle::VehicleProfile;
use crate::warning::Warning;

/// A user-entered replacement for a package's tariff rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOverride {
    pub package_index: usize,
    /// Custom rate on the tariff scale
    pub custom_rate: Rate,
    pub is_active: bool,
}

impl RateOverride {
    /// Creates an active override
    pub fn new(package_index: usize, custom_rate: Rate) -> Self {
        Self {
            package_index,
            custom_rate,
            is_active: true,
        }
    }

    /// Creates an active override from a percentage (e.g. 1.5 for 1.5%)
    pub fn from_percentage(package_index: usize, percentage: Decimal) -> Self {
        Self::new(package_index, Rate::from_percentage(percentage))
    }

    /// Returns true if this override replaces the rate of `package_index`
    pub fn applies_to(&self, package_index: usize) -> bool {
        self.is_active && self.package_index == package_index
    }
}

/// Which coverages the quote includes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSelection {
    pub package_index: usize,
    pub include_liability: bool,
    /// Explicit liability category; derived from the vehicle when `None`
    pub liability_category: Option<LiabilityCategory>,
    pub include_passenger_accident: bool,
    pub passenger_basis: PassengerFeeBasis,
    pub renewal: RenewalAdjustment,
    pub extra_packages: Vec<String>,
}

impl CoverageSelection {
    /// Physical damage only, for the given package
    pub fn package(package_index: usize) -> Self {
        Self {
            package_index,
            include_liability: false,
            liability_category: None,
            include_passenger_accident: false,
            passenger_basis: PassengerFeeBasis::Flat,
            renewal: RenewalAdjustment::none(),
            extra_packages: Vec::new(),
        }
    }

    pub fn with_liability(mut self) -> Self {
        self.include_liability = true;
        self
    }

    pub fn with_liability_category(mut self, category: LiabilityCategory) -> Self {
        self.include_liability = true;
        self.liability_category = Some(category);
        self
    }

    pub fn with_passenger_accident(mut self, basis: PassengerFeeBasis) -> Self {
        self.include_passenger_accident = true;
        self.passenger_basis = basis;
        self
    }

    pub fn with_renewal(mut self, renewal: RenewalAdjustment) -> Self {
        self.renewal = renewal;
        self
    }

    pub fn with_extra_package(mut self, code: impl Into<String>) -> Self {
        self.extra_packages.push(code.into());
        self
    }
}

impl Default for CoverageSelection {
    fn default() -> Self {
        Self::package(0)
    }
}

/// The complete input set of one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteInputs {
    pub profile: VehicleProfile,
    pub coverage: CoverageSelection,
    pub rate_override: Option<RateOverride>,
}

impl QuoteInputs {
    pub fn new(profile: VehicleProfile, coverage: CoverageSelection) -> Self {
        Self {
            profile,
            coverage,
            rate_override: None,
        }
    }

    pub fn with_override(mut self, rate_override: RateOverride) -> Self {
        self.rate_override = Some(rate_override);
        self
    }

    /// Resolves base or override for the selected package
    pub fn rate_selection(&self) -> RateSelection {
        match self.rate_override {
            Some(o) if o.applies_to(self.coverage.package_index) => RateSelection::Override(o.custom_rate),
            _ => RateSelection::Base,
        }
    }
}

/// The premium calculation engine
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
    resolver: UsageClassResolver,
    rate_table: RateTable,
    package_fee: PackageFeeCalculator,
    battery: BatterySurchargeCalculator,
    liability: LiabilityFeeResolver,
    passenger: PassengerAccidentFeeCalculator,
    deductible: DeductiblePolicy,
    extras: ExtraPackageCatalog,
    aggregator: PremiumAggregator,
}

impl PricingEngine {
    /// Builds an engine from configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the configuration is inconsistent or its
    /// liability table names unknown categories.
    pub fn new(config: PricingConfig) -> Result<Self, PricingError> {
        config.validate()?;
        let liability = LiabilityFeeResolver::from_config(&config)?;
        Ok(Self::assemble(config, liability))
    }

    fn assemble(config: PricingConfig, liability: LiabilityFeeResolver) -> Self {
        Self {
            resolver: UsageClassResolver::new(),
            rate_table: RateTable::from_config(&config),
            package_fee: PackageFeeCalculator::new(MinimumFeePolicy::from_config(&config)),
            battery: BatterySurchargeCalculator::from_config(&config),
            liability,
            passenger: PassengerAccidentFeeCalculator::from_config(&config),
            deductible: DeductiblePolicy::from_config(&config),
            extras: ExtraPackageCatalog::from_config(&config),
            aggregator: PremiumAggregator::new(),
            config,
        }
    }

    /// Replaces the rate table
    pub fn with_rate_table(mut self, rate_table: RateTable) -> Self {
        self.rate_table = rate_table;
        self
    }

    /// Replaces the liability fee resolver
    pub fn with_liability_resolver(mut self, liability: LiabilityFeeResolver) -> Self {
        self.liability = liability;
        self
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn rate_table(&self) -> &RateTable {
        &self.rate_table
    }

    pub fn extra_packages(&self) -> &ExtraPackageCatalog {
        &self.extras
    }

    /// Resolves the usage key for a vehicle
    pub fn usage_key(&self, profile: &VehicleProfile) -> UsageClassKey {
        self.resolver.resolve(profile).key
    }

    /// Lists the packages offered for a vehicle
    pub fn package_options(&self, profile: &VehicleProfile) -> Vec<PackageOption> {
        self.rate_table.package_options(profile, &self.usage_key(profile))
    }

    /// Returns true if the package is offered for this vehicle
    pub fn is_applicable(&self, package_index: usize, profile: &VehicleProfile) -> bool {
        self.rate_table
            .is_applicable(package_index, profile, &self.usage_key(profile))
    }

    /// Checks a custom rate against the configured bounds
    pub fn validate_override(&self, rate_override: &RateOverride) -> Result<(), PricingError> {
        let min = self.config.min_override_rate();
        let max = self.config.max_override_rate();
        if rate_override.custom_rate < min || rate_override.custom_rate > max {
            return Err(PricingError::validation(format!(
                "Custom rate {} must be between {} and {}",
                rate_override.custom_rate, min, max
            )));
        }
        self.rate_table.package(rate_override.package_index)?;
        Ok(())
    }

    /// Prices a quote
    ///
    /// The result depends only on `inputs` and the engine configuration;
    /// calling this twice with the same inputs yields equal results.
    ///
    /// # Errors
    ///
    /// * `Validation` for bad input (currency, override bounds, extra packages)
    /// * `PackageNotFound` / `PackageNotApplicable` for the selected package
    /// * `Configuration` when the rate table has no row for the usage class
    pub fn calculate(&self, inputs: &QuoteInputs) -> Result<CalculationResult, PricingError> {
        let profile = &inputs.profile;
        let coverage = &inputs.coverage;

        if profile.currency() != self.config.currency {
            return Err(PricingError::validation(format!(
                "Vehicle value is in {}, quotes are priced in {}",
                profile.currency(),
                self.config.currency
            )));
        }

        let mut warnings = Vec::new();
        let resolved = self.resolver.resolve(profile);
        warnings.extend(resolved.warning);
        let key = resolved.key;

        let package = self.rate_table.package(coverage.package_index)?.clone();

        if let Some(rate_override) = inputs.rate_override.filter(|o| o.is_active) {
            self.validate_override(&rate_override)?;
        }
        let rate_selection = inputs.rate_selection();
        let effective_rate =
            self.rate_table
                .effective_rate(package.index, profile, &key, &rate_selection)?;

        let package_fee = self
            .package_fee
            .compute_fee(profile.value(), effective_rate, &key)?;

        let battery_surcharge = self.battery.compute_surcharge(
            profile.drivetrain(),
            profile.battery_value(),
            effective_rate,
        )?;

        let liability = if coverage.include_liability {
            Some(self.liability_fee(profile, &key, coverage.liability_category, &mut warnings)?)
        } else {
            None
        };

        let passenger_accident_fee = if coverage.include_passenger_accident {
            self.passenger_fee(profile, &key, &coverage.passenger_basis, &mut warnings)?
        } else {
            Money::zero(self.config.currency)
        };

        let renewal_adjustment = coverage.renewal.apply(&profile.total_insured_value()?)?;
        let extra_packages = self.extras.select(&coverage.extra_packages)?;

        debug!(
            package = package.index,
            usage = key.code(),
            rate = %effective_rate,
            fee = %package_fee.fee,
            "Priced physical damage package"
        );

        self.aggregator.aggregate(PremiumComponents {
            package,
            rate_selection,
            effective_rate,
            package_fee,
            battery_surcharge,
            liability,
            passenger_accident_fee,
            renewal_adjustment,
            deductible: self.deductible.deductible_for(&key),
            extra_packages,
            warnings,
            profile: profile.clone(),
        })
    }

    /// Liability fee, falling back to zero with a warning for unpriced categories
    fn liability_fee(
        &self,
        profile: &VehicleProfile,
        key: &UsageClassKey,
        explicit: Option<LiabilityCategory>,
        warnings: &mut Vec<Warning>,
    ) -> Result<LiabilityFee, PricingError> {
        let seats = profile.seat_count();
        let cargo = profile.cargo_capacity_kg();

        match self.liability.resolve_fee(explicit, seats, cargo, key) {
            Ok(fee) => Ok(fee),
            Err(err) if err.is_configuration() => {
                let category = self.liability.category_for(explicit, seats, cargo, key);
                warn!(category = %category, error = %err, "Liability category unpriced, using zero fee");
                warnings.push(Warning::LiabilityCategoryUnpriced {
                    category: category.code(),
                });
                Ok(LiabilityFee {
                    category,
                    fee: Money::zero(self.config.currency),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Passenger-accident fee, falling back to zero with a warning for unknown packages
    fn passenger_fee(
        &self,
        profile: &VehicleProfile,
        key: &UsageClassKey,
        basis: &PassengerFeeBasis,
        warnings: &mut Vec<Warning>,
    ) -> Result<Money, PricingError> {
        match self
            .passenger
            .compute_fee(profile.seat_count(), basis, key.is_commercial())
        {
            Ok(fee) => Ok(fee),
            Err(err) if err.is_configuration() => {
                let code = match basis {
                    PassengerFeeBasis::Package(code) => code.clone(),
                    _ => String::new(),
                };
                warn!(code = %code, error = %err, "Passenger accident package unknown, using zero fee");
                warnings.push(Warning::PassengerPackageUnknown { code });
                Ok(Money::zero(self.config.currency))
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        let config = PricingConfig::default();
        let liability = LiabilityFeeResolver::standard(config.currency);
        Self::assemble(config, liability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{DrivetrainType, UsageClass};
    use rust_decimal_macros::dec;

    fn profile(value: i64, usage: UsageClass) -> VehicleProfile {
        VehicleProfile::builder()
            .value(Money::vnd(value))
            .seat_count(5)
            .usage_class(usage)
            .age_years(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_full_quote() {
        let engine = PricingEngine::default();
        let inputs = QuoteInputs::new(
            profile(800_000_000, UsageClass::PrivatePassenger),
            CoverageSelection::package(0)
                .with_liability()
                .with_passenger_accident(PassengerFeeBasis::Flat),
        );

        let result = engine.calculate(&inputs).unwrap();

        // 800M at 1.0% (700M-1B, under 3 years)
        assert_eq!(result.physical_damage_fee(), Money::vnd(8_000_000));
        assert_eq!(result.liability_fee(), Money::vnd(480_700));
        assert_eq!(result.passenger_accident_fee(), Money::vnd(50_000));
        assert_eq!(result.grand_total(), Money::vnd(8_530_700));
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_override_only_applies_to_its_package() {
        let engine = PricingEngine::default();
        let inputs = QuoteInputs::new(
            profile(800_000_000, UsageClass::PrivatePassenger),
            CoverageSelection::package(1),
        )
        .with_override(RateOverride::from_percentage(0, dec!(2.0)));

        let result = engine.calculate(&inputs).unwrap();
        assert!(!result.is_rate_overridden());
        assert_eq!(result.effective_rate(), Rate::from_percentage(dec!(1.0)));
    }

    #[test]
    fn test_override_out_of_bounds_rejected() {
        let engine = PricingEngine::default();
        let inputs = QuoteInputs::new(
            profile(800_000_000, UsageClass::PrivatePassenger),
            CoverageSelection::package(0),
        )
        .with_override(RateOverride::from_percentage(0, dec!(12)));

        assert!(matches!(engine.calculate(&inputs), Err(PricingError::Validation(_))));
    }

    #[test]
    fn test_inactive_override_ignored() {
        let engine = PricingEngine::default();
        let mut rate_override = RateOverride::from_percentage(0, dec!(50));
        rate_override.is_active = false;
        let inputs = QuoteInputs::new(
            profile(800_000_000, UsageClass::PrivatePassenger),
            CoverageSelection::package(0),
        )
        .with_override(rate_override);

        assert!(!engine.calculate(&inputs).unwrap().is_rate_overridden());
    }

    #[test]
    fn test_unspecified_usage_warns() {
        let engine = PricingEngine::default();
        let inputs = QuoteInputs::new(
            profile(800_000_000, UsageClass::Unspecified),
            CoverageSelection::package(0),
        );

        let result = engine.calculate(&inputs).unwrap();
        assert_eq!(result.warnings()[0].code(), "usage_class_defaulted");
    }

    #[test]
    fn test_electric_surcharge_included() {
        let engine = PricingEngine::default();
        let electric = VehicleProfile::builder()
            .value(Money::vnd(800_000_000))
            .seat_count(5)
            .usage_class(UsageClass::PrivatePassenger)
            .drivetrain(DrivetrainType::Electric)
            .battery_value(Some(Money::vnd(200_000_000)))
            .build()
            .unwrap();

        let result = engine
            .calculate(&QuoteInputs::new(electric, CoverageSelection::package(0)))
            .unwrap();

        // Half of 1.0% on 200M
        assert_eq!(result.battery_surcharge(), Money::vnd(1_000_000));
        assert_eq!(result.grand_total(), Money::vnd(9_000_000));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let engine = PricingEngine::default();
        let usd = VehicleProfile::builder()
            .value(Money::new(dec!(30000), core_kernel::Currency::USD))
            .seat_count(5)
            .usage_class(UsageClass::PrivatePassenger)
            .build()
            .unwrap();

        let err = engine
            .calculate(&QuoteInputs::new(usd, CoverageSelection::package(0)))
            .unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }
}
