//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! premium calculation test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built vehicles, amounts and dates
//! - `builders`: Builder patterns for profiles and quote inputs
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
