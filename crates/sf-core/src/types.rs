//! Common data types for sizefit

use serde::{Deserialize, Serialize};

/// Point-estimate result filled in by an external optimizer.
///
/// The optimizer minimizes the model's negative log-likelihood; this type is
/// what it hands back to callers (and what reporting code consumes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    /// Parameter names, in the model's stable order.
    pub names: Vec<String>,

    /// Best-fit parameter values.
    pub parameters: Vec<f64>,

    /// Parameter uncertainties, if the optimizer produced them.
    pub uncertainties: Option<Vec<f64>>,

    /// Negative log-likelihood at the minimum.
    pub nll: f64,

    /// Whether the optimizer reported convergence.
    pub converged: bool,

    /// Number of likelihood evaluations used.
    pub n_evaluations: usize,
}

impl FitResult {
    /// Create a new fit result without uncertainties.
    pub fn new(
        names: Vec<String>,
        parameters: Vec<f64>,
        nll: f64,
        converged: bool,
        n_evaluations: usize,
    ) -> Self {
        Self { names, parameters, uncertainties: None, nll, converged, n_evaluations }
    }

    /// Attach parameter uncertainties.
    pub fn with_uncertainties(mut self, uncertainties: Vec<f64>) -> Self {
        self.uncertainties = Some(uncertainties);
        self
    }

    /// Look up a fitted value by parameter name.
    pub fn parameter(&self, name: &str) -> Option<f64> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.parameters.get(idx).copied()
    }
}
