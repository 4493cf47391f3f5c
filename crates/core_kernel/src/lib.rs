//! Core Kernel - Foundational types for the premium calculation engine
//!
//! This crate provides the building blocks used by the pricing domain:
//! - Money types with precise decimal arithmetic
//! - Percentage rates
//! - Strongly-typed identifiers

pub mod money;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError, Rate};
pub use identifiers::QuoteId;
