//! Consistency-preserving recalculation
//!
//! A [`RecalculationController`] owns the inputs of one in-progress quote.
//! Every mutation marks the controller stale, and the only accessor for the
//! result recomputes the full pipeline first when stale. There is no way to
//! read a result computed from older inputs.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use core_kernel::{QuoteId, Rate};
use crate::aggregator::CalculationResult;
use crate::engine::{CoverageSelection, PricingEngine, QuoteInputs, RateOverride};
use crate::error::PricingError;
use crate::vehicle::{UsageClass, VehicleProfile};

#[derive(Debug, Clone)]
pub struct RecalculationController {
    quote_id: QuoteId,
    engine: Arc<PricingEngine>,
    inputs: QuoteInputs,
    /// Result for the current inputs; `None` while stale
    cached: Option<CalculationResult>,
}

impl RecalculationController {
    /// Starts a quote session; the first read computes the result
    pub fn new(quote_id: QuoteId, engine: Arc<PricingEngine>, inputs: QuoteInputs) -> Self {
        Self {
            quote_id,
            engine,
            inputs,
            cached: None,
        }
    }

    pub fn quote_id(&self) -> QuoteId {
        self.quote_id
    }

    pub fn inputs(&self) -> &QuoteInputs {
        &self.inputs
    }

    pub fn is_stale(&self) -> bool {
        self.cached.is_none()
    }

    /// Returns the result for the current inputs, recomputing if stale
    ///
    /// A failed recomputation leaves the controller stale and returns the
    /// error; no earlier result is served in its place.
    pub fn result(&mut self) -> Result<&CalculationResult, PricingError> {
        let result = match self.cached.take() {
            Some(result) => result,
            None => self.recalculate()?,
        };
        Ok(self.cached.insert(result))
    }

    #[instrument(level = "info", skip(self), fields(quote_id = %self.quote_id))]
    fn recalculate(&self) -> Result<CalculationResult, PricingError> {
        let result = self.engine.calculate(&self.inputs);
        match &result {
            Ok(result) => debug!(grand_total = %result.grand_total(), "Quote recalculated"),
            Err(err) => debug!(error = %err, "Quote recalculation failed"),
        }
        result
    }

    fn mark_stale(&mut self) {
        self.cached = None;
    }

    /// Replaces the vehicle profile
    ///
    /// An active override is cleared when its package is no longer offered
    /// for the new vehicle.
    pub fn update_profile(&mut self, profile: VehicleProfile) {
        if let Some(rate_override) = self.inputs.rate_override {
            if !self.engine.is_applicable(rate_override.package_index, &profile) {
                warn!(
                    quote_id = %self.quote_id,
                    package = rate_override.package_index,
                    "Rate override cleared, package no longer applicable"
                );
                self.inputs.rate_override = None;
            }
        }
        self.inputs.profile = profile;
        self.mark_stale();
    }

    /// Changes only the usage class of the current profile
    pub fn set_usage_class(&mut self, usage_class: UsageClass) {
        let profile = self.inputs.profile.with_usage_class(usage_class);
        self.update_profile(profile);
    }

    /// Selects a physical-damage package
    pub fn select_package(&mut self, package_index: usize) {
        self.inputs.coverage.package_index = package_index;
        self.mark_stale();
    }

    /// Applies changes to the coverage selection
    pub fn update_coverage<F>(&mut self, update: F)
    where
        F: FnOnce(&mut CoverageSelection),
    {
        update(&mut self.inputs.coverage);
        self.mark_stale();
    }

    /// Sets a custom rate for a package
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the rate is outside the configured bounds and
    /// `PackageNotFound` for an unknown package; inputs are left unchanged.
    pub fn set_rate_override(&mut self, package_index: usize, custom_rate: Rate) -> Result<(), PricingError> {
        let rate_override = RateOverride::new(package_index, custom_rate);
        self.engine.validate_override(&rate_override)?;

        self.inputs.rate_override = Some(rate_override);
        self.mark_stale();
        Ok(())
    }

    /// Reverts to the tariff rate
    pub fn clear_rate_override(&mut self) {
        self.inputs.rate_override = None;
        self.mark_stale();
    }
}
