//! # sf-inference
//!
//! The sampler-facing surface for sizefit models. The sampling engine
//! itself is external; this crate defines what it consumes (a posterior
//! with priors, bounds, and initial values), what it returns (chains of
//! draws), and the convergence diagnostics that must be surfaced to the
//! user rather than hidden behind summary statistics.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostics;
pub mod posterior;
pub mod sampler;

pub use diagnostics::{
    compute_diagnostics, quality_summary, DiagnosticsResult, QualityGates, QualityStatus,
    QualitySummary,
};
pub use posterior::{Posterior, Prior};
pub use sampler::{run_chains, Chain, PosteriorSampler, SamplerConfig, SamplerRun};
