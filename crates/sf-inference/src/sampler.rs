//! Black-box sampler contract and multi-chain plumbing.
//!
//! The sampling engine is an external collaborator. [`PosteriorSampler`] is
//! the contract it satisfies: consume a posterior (log-density, bounds,
//! initial values), return per-chain draws in model parameter space.
//! [`run_chains`] is the shared plumbing: one kernel per chain, run in
//! parallel, seeded deterministically.

use crate::posterior::Posterior;
use sf_core::traits::LogDensityModel;
use sf_core::{Error, Result};

/// Run-shape configuration handed to a sampler.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Number of independent chains.
    pub n_chains: usize,
    /// Warmup iterations per chain (discarded).
    pub n_warmup: usize,
    /// Post-warmup draws per chain.
    pub n_samples: usize,
    /// Base RNG seed; chain `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { n_chains: 4, n_warmup: 500, n_samples: 1000, seed: 0 }
    }
}

/// Post-warmup draws from one chain, in model parameter space.
#[derive(Debug, Clone)]
pub struct Chain {
    /// One parameter vector per draw.
    pub draws: Vec<Vec<f64>>,
}

/// Result of a multi-chain sampling run.
#[derive(Debug, Clone)]
pub struct SamplerRun {
    /// Individual chains.
    pub chains: Vec<Chain>,
    /// Parameter names, in draw order.
    pub param_names: Vec<String>,
    /// Warmup iterations per chain.
    pub n_warmup: usize,
    /// Post-warmup draws per chain.
    pub n_samples: usize,
}

impl SamplerRun {
    /// Total post-warmup draws across all chains.
    pub fn total_draws(&self) -> usize {
        self.chains.iter().map(|c| c.draws.len()).sum()
    }

    /// Draws of one parameter, per chain.
    pub fn param_draws(&self, param_idx: usize) -> Vec<Vec<f64>> {
        self.chains
            .iter()
            .map(|c| c.draws.iter().map(|d| d[param_idx]).collect())
            .collect()
    }

    /// Mean of one parameter across all draws and chains.
    pub fn param_mean(&self, param_idx: usize) -> f64 {
        let mut n = 0usize;
        let mut sum = 0.0;
        for chain in &self.chains {
            for draw in &chain.draws {
                sum += draw[param_idx];
                n += 1;
            }
        }
        sum / n as f64
    }

    /// Posterior mean vector across all draws and chains.
    pub fn posterior_mean(&self) -> Vec<f64> {
        (0..self.param_names.len()).map(|i| self.param_mean(i)).collect()
    }
}

/// Contract satisfied by an external sampling engine.
pub trait PosteriorSampler {
    /// Draw from `posterior` under the given run shape.
    fn sample<M: LogDensityModel>(
        &self,
        posterior: &Posterior<'_, M>,
        config: &SamplerConfig,
    ) -> Result<SamplerRun>;
}

/// Run one chain kernel per configured chain, in parallel via Rayon.
///
/// The kernel receives the chain's seed (`config.seed + chain_id`) and
/// returns that chain's post-warmup draws.
pub fn run_chains<F>(config: &SamplerConfig, param_names: Vec<String>, kernel: F) -> Result<SamplerRun>
where
    F: Fn(u64) -> Result<Chain> + Sync,
{
    use rayon::prelude::*;

    if config.n_chains == 0 {
        return Err(Error::Validation("at least one chain required".to_string()));
    }
    if config.n_samples == 0 {
        return Err(Error::Validation("at least one post-warmup draw required".to_string()));
    }

    let chains: Vec<Result<Chain>> = (0..config.n_chains)
        .into_par_iter()
        .map(|chain_id| kernel(config.seed.wrapping_add(chain_id as u64)))
        .collect();

    let chains: Vec<Chain> = chains.into_iter().collect::<Result<Vec<_>>>()?;

    Ok(SamplerRun {
        chains,
        param_names,
        n_warmup: config.n_warmup,
        n_samples: config.n_samples,
    })
}
