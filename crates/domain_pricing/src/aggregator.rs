//! Premium aggregation
//!
//! [`PremiumAggregator`] is the only way to build a [`CalculationResult`].
//! The grand total is computed from the components at construction and the
//! result exposes no setters, so a total can never drift from its parts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, Rate};
use crate::error::PricingError;
use crate::extras::ExtraPackage;
use crate::liability::{LiabilityCategory, LiabilityFee};
use crate::package_fee::PackageFee;
use crate::rate_table::{PackageDefinition, RateSelection};
use crate::vehicle::VehicleProfile;
use crate::warning::Warning;

/// Every priced component of a quote, as produced by the calculators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremiumComponents {
    pub package: PackageDefinition,
    pub rate_selection: RateSelection,
    pub effective_rate: Rate,
    pub package_fee: PackageFee,
    pub battery_surcharge: Money,
    /// `None` when liability cover is excluded from the quote
    pub liability: Option<LiabilityFee>,
    pub passenger_accident_fee: Money,
    pub renewal_adjustment: Money,
    pub deductible: Money,
    pub extra_packages: Vec<ExtraPackage>,
    pub warnings: Vec<Warning>,
    pub profile: VehicleProfile,
}

/// A fully priced quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    currency: Currency,
    selected_package_index: usize,
    selected_package_name: String,
    rate_selection: RateSelection,
    effective_rate: Rate,
    physical_damage_fee: Money,
    battery_surcharge: Money,
    liability_category: Option<LiabilityCategory>,
    liability_fee: Money,
    passenger_accident_fee: Money,
    renewal_adjustment: Money,
    grand_total: Money,
    has_minimum_fee_applied: bool,
    deductible: Money,
    extra_packages: Vec<ExtraPackage>,
    warnings: Vec<Warning>,
    source_profile: VehicleProfile,
}

impl CalculationResult {
    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn selected_package_index(&self) -> usize {
        self.selected_package_index
    }

    pub fn selected_package_name(&self) -> &str {
        &self.selected_package_name
    }

    /// Whether the rate came from the tariff or an override
    pub fn rate_selection(&self) -> RateSelection {
        self.rate_selection
    }

    pub fn is_rate_overridden(&self) -> bool {
        matches!(self.rate_selection, RateSelection::Override(_))
    }

    /// The rate the physical-damage fee was computed with
    pub fn effective_rate(&self) -> Rate {
        self.effective_rate
    }

    pub fn physical_damage_fee(&self) -> Money {
        self.physical_damage_fee
    }

    pub fn battery_surcharge(&self) -> Money {
        self.battery_surcharge
    }

    pub fn liability_category(&self) -> Option<LiabilityCategory> {
        self.liability_category
    }

    pub fn liability_fee(&self) -> Money {
        self.liability_fee
    }

    pub fn passenger_accident_fee(&self) -> Money {
        self.passenger_accident_fee
    }

    pub fn renewal_adjustment(&self) -> Money {
        self.renewal_adjustment
    }

    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    pub fn has_minimum_fee_applied(&self) -> bool {
        self.has_minimum_fee_applied
    }

    /// Per-claim deductible; informational, not part of the total
    pub fn deductible(&self) -> Money {
        self.deductible
    }

    pub fn extra_packages(&self) -> &[ExtraPackage] {
        &self.extra_packages
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The vehicle snapshot this result was computed from
    pub fn source_profile(&self) -> &VehicleProfile {
        &self.source_profile
    }

    /// Flattens the result for persistence and display
    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            currency: self.currency,
            package_index: self.selected_package_index,
            package_name: self.selected_package_name.clone(),
            effective_rate_percent: self.effective_rate.as_percentage().normalize(),
            rate_overridden: self.is_rate_overridden(),
            physical_damage_fee: self.physical_damage_fee.amount(),
            battery_surcharge: self.battery_surcharge.amount(),
            liability_category: self.liability_category.map(|category| category.code()),
            liability_fee: self.liability_fee.amount(),
            passenger_accident_fee: self.passenger_accident_fee.amount(),
            renewal_adjustment: self.renewal_adjustment.amount(),
            grand_total: self.grand_total.amount(),
            has_minimum_fee_applied: self.has_minimum_fee_applied,
            deductible: self.deductible.amount(),
            extra_packages: self.extra_packages.iter().map(|pkg| pkg.code.clone()).collect(),
            warnings: self.warnings.iter().map(|w| w.code().to_string()).collect(),
        }
    }
}

/// Flat record of a result for contract persistence, display and export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub currency: Currency,
    pub package_index: usize,
    pub package_name: String,
    pub effective_rate_percent: Decimal,
    pub rate_overridden: bool,
    pub physical_damage_fee: Decimal,
    pub battery_surcharge: Decimal,
    pub liability_category: Option<String>,
    pub liability_fee: Decimal,
    pub passenger_accident_fee: Decimal,
    pub renewal_adjustment: Decimal,
    pub grand_total: Decimal,
    pub has_minimum_fee_applied: bool,
    pub deductible: Decimal,
    pub extra_packages: Vec<String>,
    pub warnings: Vec<String>,
}

/// Sums components into a [`CalculationResult`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PremiumAggregator;

impl PremiumAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Builds the result
    ///
    /// # Errors
    ///
    /// Returns `Money` if any component is in a different currency than the
    /// vehicle profile.
    pub fn aggregate(&self, components: PremiumComponents) -> Result<CalculationResult, PricingError> {
        let currency = components.profile.currency();
        let liability_fee = components
            .liability
            .map(|liability| liability.fee)
            .unwrap_or_else(|| Money::zero(currency));

        let grand_total = Money::sum(
            currency,
            [
                &components.package_fee.fee,
                &components.battery_surcharge,
                &liability_fee,
                &components.passenger_accident_fee,
                &components.renewal_adjustment,
            ],
        )?;

        Ok(CalculationResult {
            currency,
            selected_package_index: components.package.index,
            selected_package_name: components.package.name,
            rate_selection: components.rate_selection,
            effective_rate: components.effective_rate,
            physical_damage_fee: components.package_fee.fee,
            battery_surcharge: components.battery_surcharge,
            liability_category: components.liability.map(|liability| liability.category),
            liability_fee,
            passenger_accident_fee: components.passenger_accident_fee,
            renewal_adjustment: components.renewal_adjustment,
            grand_total,
            has_minimum_fee_applied: components.package_fee.has_minimum_fee_applied,
            deductible: components.deductible,
            extra_packages: components.extra_packages,
            warnings: components.warnings,
            source_profile: components.profile,
        })
    }
}
