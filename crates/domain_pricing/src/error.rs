//! Pricing domain errors
//!
//! This module defines the error taxonomy of the premium calculation
//! engine. Validation errors describe bad input and are always surfaced to
//! the caller; configuration errors describe gaps in curated tables.

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors that can occur while pricing a quote
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Malformed or missing required input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A curated table is missing an entry for a valid combination
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The package exists but is not offered for this vehicle
    #[error("Package {index} is not applicable: {reason}")]
    PackageNotApplicable {
        index: usize,
        reason: String,
    },

    /// The package index does not exist in the catalog
    #[error("Package not found: {0}")]
    PackageNotFound(usize),

    /// Money arithmetic failure
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl PricingError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PricingError::Validation(message.into())
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        PricingError::Configuration(message.into())
    }

    /// Creates a package-not-applicable error
    pub fn not_applicable(index: usize, reason: impl Into<String>) -> Self {
        PricingError::PackageNotApplicable {
            index,
            reason: reason.into(),
        }
    }

    /// Returns true for data-curation gaps
    pub fn is_configuration(&self) -> bool {
        matches!(self, PricingError::Configuration(_))
    }
}
