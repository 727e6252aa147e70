//! Input schemas: size-class bins, categories, and observation tables.
//!
//! Everything is validated once at construction. Category labels and
//! 1-based bin indices from raw survey rows are resolved to dense integer
//! indices here; evaluation never does name lookups.

use serde::{Deserialize, Serialize};
use sf_core::{Error, Result};
use std::collections::HashMap;

/// Convention for the lower limit of the first size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowerBound {
    /// First class spans `(0, upper[0]]` — the convention for body-size data.
    Zero,
    /// First class is unbounded below.
    Unbounded,
}

/// Ordered size-class boundaries.
///
/// Class `k` (1-based externally, 0-based internally) spans
/// `(upper[k-1], upper[k]]`. The first class's lower limit is set by
/// [`LowerBound`]. The last class is right-open: the final recorded boundary
/// is the dataset's maximum, and any mass above it belongs to the top class,
/// so the per-class masses partition the distribution's support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeBins {
    upper: Vec<f64>,
    lower_bound: LowerBound,
}

impl SizeBins {
    /// Validate and build a bin table from strictly increasing upper
    /// boundaries.
    pub fn new(upper: Vec<f64>, lower_bound: LowerBound) -> Result<Self> {
        if upper.is_empty() {
            return Err(Error::Validation("at least one size-class boundary required".to_string()));
        }
        for &u in &upper {
            if u.is_nan() {
                return Err(Error::Validation("size-class boundary is NaN".to_string()));
            }
        }
        for w in upper.windows(2) {
            if w[1] <= w[0] {
                return Err(Error::Validation(format!(
                    "size-class boundaries must be strictly increasing, got {} then {}",
                    w[0], w[1]
                )));
            }
        }
        if lower_bound == LowerBound::Zero && upper[0] <= 0.0 {
            return Err(Error::Validation(format!(
                "first upper boundary must be positive with a zero lower bound, got {}",
                upper[0]
            )));
        }
        Ok(Self { upper, lower_bound })
    }

    /// Number of size classes.
    pub fn n_bins(&self) -> usize {
        self.upper.len()
    }

    /// Upper boundaries as recorded (the last one is a label: the top class
    /// is evaluated as right-open).
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Lower-limit convention for the first class.
    pub fn lower_bound(&self) -> LowerBound {
        self.lower_bound
    }

    /// Upper integration limit of 0-based class `k`.
    pub(crate) fn upper_limit(&self, k: usize) -> f64 {
        if k + 1 == self.upper.len() {
            f64::INFINITY
        } else {
            self.upper[k]
        }
    }

    /// Lower integration limit of 0-based class `k`; `None` when unbounded
    /// below.
    pub(crate) fn lower_limit(&self, k: usize) -> Option<f64> {
        if k == 0 {
            match self.lower_bound {
                LowerBound::Zero => Some(0.0),
                LowerBound::Unbounded => None,
            }
        } else {
            Some(self.upper[k - 1])
        }
    }
}

/// The set of category labels (e.g. species) a model fits offsets for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySet {
    labels: Vec<String>,
}

impl CategorySet {
    /// Validate and build a category set. Labels must be unique and
    /// non-empty.
    pub fn new(labels: Vec<String>) -> Result<Self> {
        let mut seen = HashMap::new();
        for (i, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(Error::Validation(format!("category label at position {} is empty", i)));
            }
            if seen.insert(label.clone(), i).is_some() {
                return Err(Error::Validation(format!("duplicate category label '{}'", label)));
            }
        }
        Ok(Self { labels })
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Dense index of `label`, if present.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

/// One raw observation-group row: a category, a 1-based size-class index,
/// standardized covariate values, and the number of individuals counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationRow {
    /// Category label (must be in the fitted [`CategorySet`]).
    pub category: String,
    /// 1-based size-class index, matching survey tables.
    pub bin_index: usize,
    /// Standardized covariate values, in registered order.
    #[serde(default)]
    pub covariates: Vec<f64>,
    /// Individuals observed for this (group, class) pair.
    pub count: u64,
}

/// Validated, integer-indexed observation table.
///
/// A row summarizes all individuals of one group observed in one size
/// class; likelihood cost is proportional to rows, never to individuals.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    categories: CategorySet,
    n_bins: usize,
    n_covariates: usize,
    category_idx: Vec<usize>,
    bin_idx: Vec<usize>,
    covariates: Vec<f64>,
    counts: Vec<f64>,
}

impl ObservationTable {
    /// Validate raw rows against the bin table and category set.
    ///
    /// Fatal setup errors: unknown category, bin index outside `[1, K]`,
    /// covariate arity mismatch, non-finite covariates, and categories with
    /// no observations (an offset could never be fitted for them, and
    /// silently defaulting it to zero would hide missing data).
    pub fn new(
        rows: &[ObservationRow],
        bins: &SizeBins,
        categories: CategorySet,
        n_covariates: usize,
    ) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::Validation("observation table is empty".to_string()));
        }
        let n_bins = bins.n_bins();

        let index: HashMap<&str, usize> = categories
            .labels()
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        let mut category_idx = Vec::with_capacity(rows.len());
        let mut bin_idx = Vec::with_capacity(rows.len());
        let mut covariates = Vec::with_capacity(rows.len() * n_covariates);
        let mut counts = Vec::with_capacity(rows.len());
        let mut observed = vec![false; categories.len()];

        for (i, row) in rows.iter().enumerate() {
            let cat = *index.get(row.category.as_str()).ok_or_else(|| {
                Error::Validation(format!(
                    "row {}: category '{}' is not in the fitted category set",
                    i, row.category
                ))
            })?;
            if row.bin_index < 1 || row.bin_index > n_bins {
                return Err(Error::Validation(format!(
                    "row {}: bin index {} outside [1, {}]",
                    i, row.bin_index, n_bins
                )));
            }
            if row.covariates.len() != n_covariates {
                return Err(Error::Validation(format!(
                    "row {}: expected {} covariate values, got {}",
                    i,
                    n_covariates,
                    row.covariates.len()
                )));
            }
            for (j, &v) in row.covariates.iter().enumerate() {
                if !v.is_finite() {
                    return Err(Error::Validation(format!(
                        "row {}: covariate {} is not finite ({})",
                        i, j, v
                    )));
                }
            }
            observed[cat] = true;
            category_idx.push(cat);
            bin_idx.push(row.bin_index - 1);
            covariates.extend_from_slice(&row.covariates);
            counts.push(row.count as f64);
        }

        let missing: Vec<&str> = categories
            .labels()
            .iter()
            .enumerate()
            .filter(|(i, _)| !observed[*i])
            .map(|(_, l)| l.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Validation(format!(
                "categories with no observations: {}; remove them from the category set or supply data",
                missing.join(", ")
            )));
        }

        Ok(Self { categories, n_bins, n_covariates, category_idx, bin_idx, covariates, counts })
    }

    /// Number of rows (distinct (group, class) pairs).
    pub fn n_rows(&self) -> usize {
        self.counts.len()
    }

    /// Number of size classes this table was validated against.
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Number of covariates per row.
    pub fn n_covariates(&self) -> usize {
        self.n_covariates
    }

    /// The fitted category set.
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Dense category index of row `i`.
    pub fn category_index(&self, i: usize) -> usize {
        self.category_idx[i]
    }

    /// 0-based size-class index of row `i`.
    pub fn bin_index(&self, i: usize) -> usize {
        self.bin_idx[i]
    }

    /// Covariate values of row `i`.
    pub fn row_covariates(&self, i: usize) -> &[f64] {
        &self.covariates[i * self.n_covariates..(i + 1) * self.n_covariates]
    }

    /// Individuals counted in row `i`.
    pub fn count(&self, i: usize) -> f64 {
        self.counts[i]
    }

    /// Distinct size classes with a positive count, per category.
    pub(crate) fn distinct_bins_per_category(&self) -> Vec<usize> {
        let mut seen = vec![vec![false; self.n_bins]; self.categories.len()];
        for i in 0..self.n_rows() {
            if self.counts[i] > 0.0 {
                seen[self.category_idx[i]][self.bin_idx[i]] = true;
            }
        }
        seen.iter().map(|bins| bins.iter().filter(|&&b| b).count()).collect()
    }

    /// Distinct size classes with a positive count, over the whole table.
    pub(crate) fn distinct_bins_total(&self) -> usize {
        let mut seen = vec![false; self.n_bins];
        for i in 0..self.n_rows() {
            if self.counts[i] > 0.0 {
                seen[self.bin_idx[i]] = true;
            }
        }
        seen.iter().filter(|&&b| b).count()
    }

    /// Observed fraction of individuals per size class, optionally
    /// restricted to one category. This is the observed side of the
    /// predicted-vs-observed comparison.
    pub fn observed_bin_fractions(&self, category: Option<&str>) -> Result<Vec<f64>> {
        let cat = match category {
            Some(label) => Some(self.categories.index_of(label).ok_or_else(|| {
                Error::Validation(format!("unknown category '{}'", label))
            })?),
            None => None,
        };
        let mut totals = vec![0.0; self.n_bins];
        let mut total = 0.0;
        for i in 0..self.n_rows() {
            if cat.is_some_and(|c| c != self.category_idx[i]) {
                continue;
            }
            totals[self.bin_idx[i]] += self.counts[i];
            total += self.counts[i];
        }
        if total <= 0.0 {
            return Err(Error::Degenerate(
                "no individuals observed for the requested selection".to_string(),
            ));
        }
        for t in totals.iter_mut() {
            *t /= total;
        }
        Ok(totals)
    }
}
