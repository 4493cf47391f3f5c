//! Non-fatal calculation warnings
//!
//! Warnings are raised by resolvers that can still produce a usable value
//! (a defaulted usage class, an unpriced liability category) and are carried
//! on the [`CalculationResult`](crate::aggregator::CalculationResult) so the
//! caller can surface them without re-deriving anything.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Usage class was missing or unrecognised; the default key was used
    UsageClassDefaulted { declared: String, default_key: String },
    /// Liability category has no entry in the fee table; fee fell back to 0
    LiabilityCategoryUnpriced { category: String },
    /// Passenger-accident package code is not in the schedule; fee fell back to 0
    PassengerPackageUnknown { code: String },
}

impl Warning {
    /// Stable machine code for display layers
    pub fn code(&self) -> &'static str {
        match self {
            Warning::UsageClassDefaulted { .. } => "usage_class_defaulted",
            Warning::LiabilityCategoryUnpriced { .. } => "liability_category_unpriced",
            Warning::PassengerPackageUnknown { .. } => "passenger_package_unknown",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UsageClassDefaulted { declared, default_key } => {
                write!(f, "Usage class '{}' not recognised, priced as '{}'", declared, default_key)
            }
            Warning::LiabilityCategoryUnpriced { category } => {
                write!(f, "Liability category '{}' has no configured fee", category)
            }
            Warning::PassengerPackageUnknown { code } => {
                write!(f, "Passenger accident package '{}' is not in the schedule", code)
            }
        }
    }
}
