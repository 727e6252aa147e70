//! MCMC diagnostics: split R-hat and quality gates.
//!
//! Non-convergence is a recoverable-but-reportable condition: the run's
//! quality summary must reach the user, never be swallowed into default
//! summary statistics.

use crate::sampler::SamplerRun;
use std::fmt;

/// Diagnostics for a multi-chain sampling run.
#[derive(Debug, Clone)]
pub struct DiagnosticsResult {
    /// Split R-hat per parameter.
    pub r_hat: Vec<f64>,
}

/// High-level sampling quality status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityStatus {
    /// All gates passed.
    Ok,
    /// Some gates emitted warnings.
    Warn,
    /// One or more gates failed.
    Fail,
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityStatus::Ok => write!(f, "ok"),
            QualityStatus::Warn => write!(f, "warn"),
            QualityStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Thresholds for the sampling quality gates.
///
/// Deliberately conservative to avoid flakiness on short runs; strict
/// production thresholds belong to the caller.
#[derive(Debug, Clone)]
pub struct QualityGates {
    /// Require at least this many chains before enabling the R-hat gate.
    pub min_chains: usize,
    /// Require at least this many post-warmup draws per chain before
    /// enabling the R-hat gate.
    pub min_draws_per_chain: usize,
    /// Warn if max split R-hat exceeds this threshold.
    pub max_rhat_warn: f64,
    /// Fail if max split R-hat exceeds this threshold.
    pub max_rhat_fail: f64,
}

impl Default for QualityGates {
    fn default() -> Self {
        Self {
            min_chains: 2,
            min_draws_per_chain: 50,
            max_rhat_warn: 1.2,
            max_rhat_fail: 1.5,
        }
    }
}

/// Summary of sampling run quality.
#[derive(Debug, Clone)]
pub struct QualitySummary {
    /// Aggregated status for the run.
    pub status: QualityStatus,
    /// Non-fatal issues (suggests longer warmup/samples).
    pub warnings: Vec<String>,
    /// Hard failures (likely unusable run).
    pub failures: Vec<String>,
    /// Whether the R-hat gate was enabled for this run shape.
    pub enabled: bool,
    /// Total post-warmup draws used.
    pub total_draws: usize,
    /// Max split R-hat across parameters.
    pub max_r_hat: f64,
}

/// Split R-hat over one parameter's chains (Gelman et al.).
///
/// Each chain is split in half; R-hat compares between-half and within-half
/// variance. Returns `NaN` when the statistic is undefined (fewer than two
/// halves, or zero within-chain variance).
pub fn split_r_hat(chains: &[Vec<f64>]) -> f64 {
    let mut halves: Vec<&[f64]> = Vec::with_capacity(chains.len() * 2);
    for c in chains {
        let half = c.len() / 2;
        if half == 0 {
            continue;
        }
        halves.push(&c[..half]);
        halves.push(&c[c.len() - half..]);
    }
    let m = halves.len();
    if m < 2 {
        return f64::NAN;
    }
    let n = halves.iter().map(|h| h.len()).min().unwrap_or(0);
    if n < 2 {
        return f64::NAN;
    }

    let means: Vec<f64> = halves.iter().map(|h| h[..n].iter().sum::<f64>() / n as f64).collect();
    let vars: Vec<f64> = halves
        .iter()
        .zip(means.iter())
        .map(|(h, &mean)| {
            h[..n].iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1) as f64
        })
        .collect();

    let grand = means.iter().sum::<f64>() / m as f64;
    let b = n as f64 * means.iter().map(|&x| (x - grand) * (x - grand)).sum::<f64>()
        / (m - 1) as f64;
    let w = vars.iter().sum::<f64>() / m as f64;
    if !(w > 0.0) {
        return f64::NAN;
    }

    let var_plus = (n - 1) as f64 / n as f64 * w + b / n as f64;
    (var_plus / w).sqrt()
}

/// Compute diagnostics for a sampling run.
pub fn compute_diagnostics(run: &SamplerRun) -> DiagnosticsResult {
    let r_hat = (0..run.param_names.len())
        .map(|i| split_r_hat(&run.param_draws(i)))
        .collect();
    DiagnosticsResult { r_hat }
}

/// Derive a quality summary for a sampler run.
pub fn quality_summary(
    diag: &DiagnosticsResult,
    n_chains: usize,
    n_samples: usize,
    gates: &QualityGates,
) -> QualitySummary {
    let total_draws = n_chains.saturating_mul(n_samples);
    let enabled = n_chains >= gates.min_chains && n_samples >= gates.min_draws_per_chain;

    let max_r_hat = diag
        .r_hat
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    let mut warnings = Vec::new();
    let mut failures = Vec::new();

    if diag.r_hat.is_empty() || max_r_hat == f64::NEG_INFINITY {
        failures.push("r_hat_missing".to_string());
    } else if diag.r_hat.iter().any(|v| !v.is_finite()) {
        failures.push("r_hat_not_finite".to_string());
    }

    if !enabled {
        warnings.push("gates_disabled_short_run".to_string());
    } else if max_r_hat.is_finite() {
        if max_r_hat > gates.max_rhat_fail {
            failures.push("r_hat_high".to_string());
        } else if max_r_hat > gates.max_rhat_warn {
            warnings.push("r_hat_high".to_string());
        }
    }

    let status = if !failures.is_empty() {
        QualityStatus::Fail
    } else if !warnings.is_empty() {
        QualityStatus::Warn
    } else {
        QualityStatus::Ok
    };

    QualitySummary { status, warnings, failures, enabled, total_draws, max_r_hat }
}
