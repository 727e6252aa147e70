//! Binned size-distribution model.
//!
//! Each observation row contributes `count * ln P(class)` where `P` is a
//! CDF difference of the configured family at the row's effective
//! `(mu, sigma)`. Fitting and prediction resolve per-class masses through
//! the same `bin_mass`, so the two paths cannot drift apart.

use crate::config::{Family, ModelConfig, ScaleModel};
use crate::linear::ParameterLayout;
use crate::schema::{ObservationTable, SizeBins};
use sf_core::traits::LogDensityModel;
use sf_core::{Error, Result};

/// Validated binned likelihood model over one bin table, one observation
/// table, and one configuration.
#[derive(Debug, Clone)]
pub struct BinnedSizeModel {
    bins: SizeBins,
    table: ObservationTable,
    config: ModelConfig,
    layout: ParameterLayout,
    init: Vec<f64>,
}

impl BinnedSizeModel {
    /// Build and validate a model.
    ///
    /// Setup-time fatal errors: inconsistent covariate arity, invalid
    /// configuration, and degenerate data — any fitted group observed in
    /// fewer than 2 distinct non-empty size classes cannot identify both
    /// location and scale.
    pub fn new(bins: SizeBins, table: ObservationTable, config: ModelConfig) -> Result<Self> {
        config.validate()?;
        if table.n_bins() != bins.n_bins() {
            return Err(Error::Validation(format!(
                "observation table was validated against {} size classes, bin table has {}",
                table.n_bins(),
                bins.n_bins()
            )));
        }
        if table.n_covariates() != config.covariates.len() {
            return Err(Error::Validation(format!(
                "configuration registers {} covariate(s), observation rows carry {}",
                config.covariates.len(),
                table.n_covariates()
            )));
        }

        if config.has_category_terms() {
            let labels = table.categories().labels();
            for (cat, distinct) in table.distinct_bins_per_category().iter().enumerate() {
                if *distinct < 2 {
                    return Err(Error::Degenerate(format!(
                        "category '{}' observed in {} distinct size class(es); at least 2 are required to identify location and scale",
                        labels[cat], distinct
                    )));
                }
            }
        } else {
            let distinct = table.distinct_bins_total();
            if distinct < 2 {
                return Err(Error::Degenerate(format!(
                    "observations span {} distinct size class(es); at least 2 are required to identify location and scale",
                    distinct
                )));
            }
        }

        let layout = ParameterLayout::new(&config, table.categories().labels())?;
        let init = moment_init(&bins, &table, &config, &layout);
        Ok(Self { bins, table, config, layout, init })
    }

    /// The bin table.
    pub fn bins(&self) -> &SizeBins {
        &self.bins
    }

    /// The observation table.
    pub fn table(&self) -> &ObservationTable {
        &self.table
    }

    /// The configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// The parameter layout.
    pub fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    fn validate_params_len(&self, got: usize) -> Result<()> {
        let expected = self.layout.dim();
        if got != expected {
            return Err(Error::Validation(format!(
                "parameter length mismatch: expected {}, got {}",
                expected, got
            )));
        }
        Ok(())
    }

    fn family_cdf(&self, x: f64, mu: f64, sigma: f64) -> Result<f64> {
        match self.config.family {
            Family::Lognormal => sf_prob::lognormal::cdf(x, mu, sigma),
            Family::Normal => sf_prob::normal::cdf(x, mu, sigma),
        }
    }

    /// Probability mass of 0-based class `k` at effective `(mu, sigma)`:
    /// `F(upper_k) - F(lower_k)`, with the top class right-open and the
    /// first class's lower limit set by the bin table's convention.
    fn bin_mass(&self, k: usize, mu: f64, sigma: f64) -> Result<f64> {
        let hi = {
            let u = self.bins.upper_limit(k);
            if u == f64::INFINITY {
                1.0
            } else {
                self.family_cdf(u, mu, sigma)?
            }
        };
        let lo = match self.bins.lower_limit(k) {
            None => 0.0,
            Some(l) => self.family_cdf(l, mu, sigma)?,
        };
        Ok(hi - lo)
    }

    fn checked_bin_mass(&self, k: usize, mu: f64, sigma: f64) -> Result<f64> {
        let p = self.bin_mass(k, mu, sigma)?;
        if !p.is_finite() || p <= 0.0 {
            return Err(Error::InvalidRegion(format!(
                "size class {} has probability {:e} at mu={}, sigma={}",
                k + 1,
                p,
                mu,
                sigma
            )));
        }
        Ok(p)
    }

    /// Predicted probability mass per size class for one covariate/category
    /// setting, at the given parameter values.
    pub fn predict_bin_probabilities(
        &self,
        params: &[f64],
        covariates: &[f64],
        category: &str,
    ) -> Result<Vec<f64>> {
        self.validate_params_len(params.len())?;
        if covariates.len() != self.table.n_covariates() {
            return Err(Error::Validation(format!(
                "expected {} covariate values, got {}",
                self.table.n_covariates(),
                covariates.len()
            )));
        }
        let cat = self
            .table
            .categories()
            .index_of(category)
            .ok_or_else(|| Error::Validation(format!("unknown category '{}'", category)))?;
        let (mu, sigma) = self.layout.effective(params, covariates, cat)?;
        (0..self.bins.n_bins()).map(|k| self.bin_mass(k, mu, sigma)).collect()
    }

    /// Observed fraction of individuals per size class, optionally
    /// restricted to one category. The observed side of the
    /// predicted-vs-observed comparison.
    pub fn observed_bin_fractions(&self, category: Option<&str>) -> Result<Vec<f64>> {
        self.table.observed_bin_fractions(category)
    }
}

impl LogDensityModel for BinnedSizeModel {
    fn dim(&self) -> usize {
        self.layout.dim()
    }

    fn parameter_names(&self) -> Vec<String> {
        self.layout.names().to_vec()
    }

    fn parameter_bounds(&self) -> Vec<(f64, f64)> {
        self.layout.bounds()
    }

    fn parameter_init(&self) -> Vec<f64> {
        self.init.clone()
    }

    fn nll(&self, params: &[f64]) -> Result<f64> {
        self.validate_params_len(params.len())?;
        let mut ll = 0.0;
        for i in 0..self.table.n_rows() {
            let (mu, sigma) = self.layout.effective(
                params,
                self.table.row_covariates(i),
                self.table.category_index(i),
            )?;
            let p = self.checked_bin_mass(self.table.bin_index(i), mu, sigma)?;
            ll += self.table.count(i) * p.ln();
        }
        Ok(-ll)
    }
}

/// Moment-matched initial values: weighted mean and sd of representative
/// class sizes (log sizes for the lognormal family), slopes and offsets at
/// zero.
fn moment_init(
    bins: &SizeBins,
    table: &ObservationTable,
    config: &ModelConfig,
    layout: &ParameterLayout,
) -> Vec<f64> {
    let k = bins.n_bins();
    let upper = bins.upper();

    let finite: Vec<f64> = upper.iter().copied().filter(|u| u.is_finite()).collect();
    let width = if finite.len() >= 2 {
        (finite[finite.len() - 1] - finite[0]) / (finite.len() - 1) as f64
    } else {
        1.0
    };

    let mut rep = Vec::with_capacity(k);
    for i in 0..k {
        let lo = bins.lower_limit(i).unwrap_or(upper[0] - width);
        let hi = if upper[i].is_finite() { upper[i] } else { lo + width };
        rep.push(0.5 * (lo + hi));
    }

    let xs: Vec<f64> = match config.family {
        Family::Lognormal => rep.iter().map(|r| r.max(1e-6).ln()).collect(),
        Family::Normal => rep,
    };

    let mut total = 0.0;
    let mut mean = 0.0;
    for i in 0..table.n_rows() {
        total += table.count(i);
        mean += table.count(i) * xs[table.bin_index(i)];
    }
    mean /= total;
    let mut var = 0.0;
    for i in 0..table.n_rows() {
        let d = xs[table.bin_index(i)] - mean;
        var += table.count(i) * d * d;
    }
    let sd = (var / total).sqrt().max(1e-3);

    let mut init = vec![0.0; layout.dim()];
    init[layout.location_baseline()] = mean;
    init[layout.scale_baseline()] = match config.scale_model {
        ScaleModel::LogScale => sd.ln(),
        ScaleModel::CvOfLocation => {
            if mean > 0.0 {
                (sd / mean).max(1e-6).ln()
            } else {
                (0.3f64).ln()
            }
        }
    };
    init
}
