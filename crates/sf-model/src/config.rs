//! Declarative model configuration.
//!
//! Which distribution family is fitted, how the scale is derived, and which
//! terms enter the linear parameterization of location and scale are all
//! explicit configuration here — one enumerable struct instead of a family
//! of near-duplicate model files.

use serde::{Deserialize, Serialize};
use sf_core::{Error, Result};
use std::collections::HashMap;

/// Distribution family for the size distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// `ln X ~ Normal(mu, sigma)`; location is the log-mean.
    Lognormal,
    /// `X ~ Normal(mu, sigma)`; location is the mean.
    Normal,
}

/// How the effective scale is derived from the resolved log-space term `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleModel {
    /// `sigma = exp(s)`: scale independent of location.
    LogScale,
    /// `sigma = mu * exp(s)`: `s` is a log coefficient of variation, so the
    /// scale tracks the location.
    CvOfLocation,
}

/// Model configuration: family, scale derivation, registered covariates,
/// and the terms included in the linear parameterization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Distribution family.
    pub family: Family,
    /// Scale derivation mode.
    pub scale_model: ScaleModel,
    /// Names of registered covariates, in the order their values appear in
    /// observation rows.
    #[serde(default)]
    pub covariates: Vec<String>,
    /// Include per-covariate slopes on the location.
    #[serde(default)]
    pub location_covariates: bool,
    /// Include per-covariate slopes on the log-space scale term.
    #[serde(default)]
    pub scale_covariates: bool,
    /// Include per-category offsets on the location.
    #[serde(default)]
    pub location_offsets: bool,
    /// Include per-category offsets on the log-space scale term.
    #[serde(default)]
    pub scale_offsets: bool,
}

impl ModelConfig {
    /// Baseline-only configuration for a family: no covariates, no offsets,
    /// and the family's conventional scale model (independent log-scale for
    /// lognormal, constant CV for normal).
    pub fn baseline(family: Family) -> Self {
        let scale_model = match family {
            Family::Lognormal => ScaleModel::LogScale,
            Family::Normal => ScaleModel::CvOfLocation,
        };
        Self {
            family,
            scale_model,
            covariates: Vec::new(),
            location_covariates: false,
            scale_covariates: false,
            location_offsets: false,
            scale_offsets: false,
        }
    }

    /// Check internal consistency. Fatal at setup.
    pub fn validate(&self) -> Result<()> {
        if self.family == Family::Lognormal && self.scale_model == ScaleModel::CvOfLocation {
            return Err(Error::Validation(
                "cv_of_location requires a natural-scale location; the lognormal location is a log-mean"
                    .to_string(),
            ));
        }
        let mut seen = HashMap::new();
        for (i, name) in self.covariates.iter().enumerate() {
            if name.is_empty() {
                return Err(Error::Validation(format!(
                    "covariate name at position {} is empty",
                    i
                )));
            }
            if seen.insert(name.clone(), i).is_some() {
                return Err(Error::Validation(format!("duplicate covariate name '{}'", name)));
            }
        }
        if (self.location_covariates || self.scale_covariates) && self.covariates.is_empty() {
            return Err(Error::Validation(
                "covariate terms enabled but no covariates registered".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether any per-category term is fitted.
    pub fn has_category_terms(&self) -> bool {
        self.location_offsets || self.scale_offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_defaults() {
        let c = ModelConfig::baseline(Family::Lognormal);
        assert_eq!(c.scale_model, ScaleModel::LogScale);
        assert!(c.validate().is_ok());
        assert!(!c.has_category_terms());

        let c = ModelConfig::baseline(Family::Normal);
        assert_eq!(c.scale_model, ScaleModel::CvOfLocation);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_lognormal_cv_rejected() {
        let mut c = ModelConfig::baseline(Family::Lognormal);
        c.scale_model = ScaleModel::CvOfLocation;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_duplicate_covariates_rejected() {
        let mut c = ModelConfig::baseline(Family::Lognormal);
        c.covariates = vec!["lat_z".to_string(), "lat_z".to_string()];
        c.location_covariates = true;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_covariate_terms_without_covariates_rejected() {
        let mut c = ModelConfig::baseline(Family::Lognormal);
        c.location_covariates = true;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut c = ModelConfig::baseline(Family::Normal);
        c.covariates = vec!["year_z".to_string()];
        c.location_covariates = true;
        let json = serde_json::to_string(&c).unwrap();
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.family, Family::Normal);
        assert_eq!(back.scale_model, ScaleModel::CvOfLocation);
        assert_eq!(back.covariates, vec!["year_z"]);
        assert!(back.location_covariates);
        assert!(!back.scale_covariates);
    }
}
