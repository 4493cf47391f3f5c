//! Extra BS-coded packages
//!
//! Extra packages are optional clauses enabled per deployment. They carry no
//! fee of their own and are echoed on the result.

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::error::PricingError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtraPackage {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// The extra packages enabled for this deployment
#[derive(Debug, Clone, Default)]
pub struct ExtraPackageCatalog {
    enabled: Vec<ExtraPackage>,
}

impl ExtraPackageCatalog {
    pub fn new(enabled: Vec<ExtraPackage>) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        let enabled = config
            .enabled_extra_package_catalog()
            .into_iter()
            .map(|pkg| ExtraPackage {
                code: pkg.code.clone(),
                name: pkg.name.clone(),
                description: pkg.description.clone(),
            })
            .collect();
        Self { enabled }
    }

    pub fn enabled(&self) -> &[ExtraPackage] {
        &self.enabled
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.enabled.iter().any(|pkg| pkg.code == code)
    }

    /// Resolves selected codes to packages, keeping catalog order and
    /// dropping duplicates
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a code that is not enabled.
    pub fn select(&self, codes: &[String]) -> Result<Vec<ExtraPackage>, PricingError> {
        if let Some(code) = codes.iter().find(|code| !self.is_enabled(code)) {
            return Err(PricingError::validation(format!(
                "Extra package '{}' is not enabled",
                code
            )));
        }

        Ok(self
            .enabled
            .iter()
            .filter(|pkg| codes.contains(&pkg.code))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ExtraPackageCatalog {
        let config = PricingConfig {
            enabled_extra_packages: vec!["BS009".to_string(), "BS007".to_string()],
            ..PricingConfig::default()
        };
        ExtraPackageCatalog::from_config(&config)
    }

    #[test]
    fn test_enabled_in_catalog_order() {
        let codes: Vec<_> = catalog().enabled().iter().map(|p| p.code.clone()).collect();
        assert_eq!(codes, vec!["BS007", "BS009"]);
    }

    #[test]
    fn test_select_dedupes() {
        let selected = catalog()
            .select(&["BS009".to_string(), "BS009".to_string()])
            .unwrap();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_disabled_code_rejected() {
        let err = catalog().select(&["BS008".to_string()]).unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[test]
    fn test_empty_catalog_by_default() {
        let catalog = ExtraPackageCatalog::from_config(&PricingConfig::default());
        assert!(catalog.enabled().is_empty());
        assert!(catalog.select(&[]).unwrap().is_empty());
    }
}
