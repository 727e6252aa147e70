//! Parameter linearization.
//!
//! A model's free parameters live in one flat vector. The layout is derived
//! from the configuration: location baseline, location covariate slopes,
//! per-category location offsets, then the same three blocks for the
//! log-space scale term. Resolution of the effective `(mu, sigma)` for an
//! observation happens here and nowhere else.

use crate::config::{ModelConfig, ScaleModel};
use sf_core::{Error, Result};
use sf_prob::math::exp_clamped;
use std::collections::HashMap;
use std::ops::Range;

const LOCATION_BOUNDS: (f64, f64) = (-1e3, 1e3);
const LOG_SCALE_BOUNDS: (f64, f64) = (-30.0, 30.0);

/// Flat parameter vector layout for one model configuration.
#[derive(Debug, Clone)]
pub struct ParameterLayout {
    loc_baseline: usize,
    loc_slopes: Range<usize>,
    loc_offsets: Range<usize>,
    scale_baseline: usize,
    scale_slopes: Range<usize>,
    scale_offsets: Range<usize>,
    names: Vec<String>,
    scale_model: ScaleModel,
}

impl ParameterLayout {
    /// Build the layout for `config` over the given category labels.
    ///
    /// Fails if the generated parameter names collide (e.g. a covariate
    /// named like a category label).
    pub fn new(config: &ModelConfig, category_labels: &[String]) -> Result<Self> {
        let scale_base = match config.scale_model {
            ScaleModel::LogScale => "log_sigma",
            ScaleModel::CvOfLocation => "log_cv",
        };

        let mut names = Vec::new();

        let loc_baseline = names.len();
        names.push("mu".to_string());

        let loc_slopes_start = names.len();
        if config.location_covariates {
            for cov in &config.covariates {
                names.push(format!("mu_{}", cov));
            }
        }
        let loc_slopes = loc_slopes_start..names.len();

        let loc_offsets_start = names.len();
        if config.location_offsets {
            for label in category_labels {
                names.push(format!("mu_{}", label));
            }
        }
        let loc_offsets = loc_offsets_start..names.len();

        let scale_baseline = names.len();
        names.push(scale_base.to_string());

        let scale_slopes_start = names.len();
        if config.scale_covariates {
            for cov in &config.covariates {
                names.push(format!("{}_{}", scale_base, cov));
            }
        }
        let scale_slopes = scale_slopes_start..names.len();

        let scale_offsets_start = names.len();
        if config.scale_offsets {
            for label in category_labels {
                names.push(format!("{}_{}", scale_base, label));
            }
        }
        let scale_offsets = scale_offsets_start..names.len();

        let mut seen = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            if let Some(prev) = seen.insert(name.clone(), i) {
                return Err(Error::Validation(format!(
                    "parameter name '{}' generated twice (positions {} and {}); rename the covariate or category",
                    name, prev, i
                )));
            }
        }

        Ok(Self {
            loc_baseline,
            loc_slopes,
            loc_offsets,
            scale_baseline,
            scale_slopes,
            scale_offsets,
            names,
            scale_model: config.scale_model,
        })
    }

    /// Total number of parameters.
    pub fn dim(&self) -> usize {
        self.names.len()
    }

    /// Parameter names in vector order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of the location baseline parameter.
    pub fn location_baseline(&self) -> usize {
        self.loc_baseline
    }

    /// Index of the scale baseline parameter (log space).
    pub fn scale_baseline(&self) -> usize {
        self.scale_baseline
    }

    /// Default bounds: generous for location terms, tighter for log-space
    /// scale terms.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        let mut bounds = vec![LOCATION_BOUNDS; self.dim()];
        bounds[self.scale_baseline] = LOG_SCALE_BOUNDS;
        for i in self.scale_slopes.clone() {
            bounds[i] = LOG_SCALE_BOUNDS;
        }
        for i in self.scale_offsets.clone() {
            bounds[i] = LOG_SCALE_BOUNDS;
        }
        bounds
    }

    /// Resolved location for one observation.
    pub fn location(&self, params: &[f64], covariates: &[f64], category: usize) -> f64 {
        let mut v = params[self.loc_baseline];
        for (j, idx) in self.loc_slopes.clone().enumerate() {
            v += params[idx] * covariates[j];
        }
        if !self.loc_offsets.is_empty() {
            v += params[self.loc_offsets.start + category];
        }
        v
    }

    /// Resolved log-space scale term for one observation.
    pub fn scale_term(&self, params: &[f64], covariates: &[f64], category: usize) -> f64 {
        let mut v = params[self.scale_baseline];
        for (j, idx) in self.scale_slopes.clone().enumerate() {
            v += params[idx] * covariates[j];
        }
        if !self.scale_offsets.is_empty() {
            v += params[self.scale_offsets.start + category];
        }
        v
    }

    /// Effective `(mu, sigma)` for one observation.
    ///
    /// The scale is always resolved in log space and exponentiated, so a
    /// `LogScale` sigma is positive for any parameter values; in
    /// `CvOfLocation` mode `sigma = mu * exp(s)` and a non-positive location
    /// makes the point an invalid region.
    pub fn effective(&self, params: &[f64], covariates: &[f64], category: usize) -> Result<(f64, f64)> {
        let mu = self.location(params, covariates, category);
        let s = self.scale_term(params, covariates, category);
        let sigma = match self.scale_model {
            ScaleModel::LogScale => exp_clamped(s),
            ScaleModel::CvOfLocation => mu * exp_clamped(s),
        };
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidRegion(format!(
                "effective scale must be finite and > 0, got mu={}, sigma={}",
                mu, sigma
            )));
        }
        Ok((mu, sigma))
    }
}
