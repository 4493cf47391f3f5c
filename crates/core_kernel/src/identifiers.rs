//! Quote identifiers
//!
//! A quote is identified by a time-ordered UUID shown with a `QTE-` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const QUOTE_PREFIX: &str = "QTE";

/// Identifier of one pricing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(Uuid);

impl QuoteId {
    /// Creates a new time-ordered identifier (v7)
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Display prefix
    pub fn prefix() -> &'static str {
        QUOTE_PREFIX
    }
}

impl Default for QuoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", QUOTE_PREFIX, self.0)
    }
}

impl FromStr for QuoteId {
    type Err = uuid::Error;

    /// Accepts both `QTE-<uuid>` and a bare UUID
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(QUOTE_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(s);
        Uuid::parse_str(raw).map(Self)
    }
}

impl From<Uuid> for QuoteId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<QuoteId> for Uuid {
    fn from(id: QuoteId) -> Uuid {
        id.0
    }
}
