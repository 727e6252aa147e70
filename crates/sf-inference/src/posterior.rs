//! Posterior distribution for Bayesian fitting.
//!
//! Wraps any [`LogDensityModel`] and adds user-specified priors:
//! `logpdf(theta) = -model.nll(theta) + sum(prior_logpdf)`.
//!
//! A parameter point in the model's invalid likelihood region evaluates to
//! `-inf`, so a sampler rejects the proposal instead of crashing or
//! propagating `NaN`.

use sf_core::traits::LogDensityModel;
use sf_core::{Error, Result};

/// Prior distribution for a single parameter.
#[derive(Debug, Clone)]
pub enum Prior {
    /// Flat (improper) prior — contributes 0 to the log-posterior.
    Flat,
    /// Normal prior: `log p(theta) = -0.5 * ((theta - center) / width)^2 + const`.
    Normal {
        /// Center of the Gaussian prior.
        center: f64,
        /// Width (standard deviation) of the Gaussian prior.
        width: f64,
    },
}

impl Prior {
    fn logpdf(&self, theta: f64) -> f64 {
        match self {
            Prior::Flat => 0.0,
            Prior::Normal { center, width } => {
                let pull = (theta - center) / width;
                -0.5 * pull * pull
            }
        }
    }
}

/// Posterior wrapping a model with per-parameter priors.
pub struct Posterior<'a, M: LogDensityModel> {
    model: &'a M,
    priors: Vec<Prior>,
}

impl<'a, M: LogDensityModel> Posterior<'a, M> {
    /// Create a posterior with flat priors on every parameter.
    pub fn new(model: &'a M) -> Self {
        let priors = vec![Prior::Flat; model.dim()];
        Self { model, priors }
    }

    /// Set priors (one per parameter, in the model's parameter order).
    pub fn with_priors(mut self, priors: Vec<Prior>) -> Result<Self> {
        if priors.len() != self.model.dim() {
            return Err(Error::Validation(format!(
                "expected {} priors, got {}",
                self.model.dim(),
                priors.len()
            )));
        }
        self.priors = priors;
        Ok(self)
    }

    /// Number of parameters.
    pub fn dim(&self) -> usize {
        self.model.dim()
    }

    /// Reference to the underlying model.
    pub fn model(&self) -> &M {
        self.model
    }

    /// Parameter names, passed through from the model.
    pub fn parameter_names(&self) -> Vec<String> {
        self.model.parameter_names()
    }

    /// Parameter bounds, passed through from the model.
    pub fn parameter_bounds(&self) -> Vec<(f64, f64)> {
        self.model.parameter_bounds()
    }

    /// Initial values, passed through from the model.
    pub fn parameter_init(&self) -> Vec<f64> {
        self.model.parameter_init()
    }

    /// Log-posterior at `theta`.
    ///
    /// Invalid likelihood regions return `Ok(-inf)` — the defined
    /// rejected-evaluation signal. Genuine failures (wrong parameter count,
    /// non-finite inputs) still surface as errors.
    pub fn logpdf(&self, theta: &[f64]) -> Result<f64> {
        let nll = match self.model.nll(theta) {
            Ok(v) => v,
            Err(e) if e.is_invalid_region() => return Ok(f64::NEG_INFINITY),
            Err(e) => return Err(e),
        };
        let mut lp = -nll;
        for (prior, &t) in self.priors.iter().zip(theta.iter()) {
            lp += prior.logpdf(t);
        }
        Ok(lp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quadratic toy model with an artificial invalid region at x0 > 100.
    struct Quadratic {
        dim: usize,
    }

    impl LogDensityModel for Quadratic {
        fn dim(&self) -> usize {
            self.dim
        }

        fn parameter_names(&self) -> Vec<String> {
            (0..self.dim).map(|i| format!("x{}", i)).collect()
        }

        fn parameter_bounds(&self) -> Vec<(f64, f64)> {
            vec![(-1e3, 1e3); self.dim]
        }

        fn parameter_init(&self) -> Vec<f64> {
            vec![0.0; self.dim]
        }

        fn nll(&self, params: &[f64]) -> Result<f64> {
            if params.len() != self.dim {
                return Err(Error::Validation("parameter length mismatch".to_string()));
            }
            if params[0] > 100.0 {
                return Err(Error::InvalidRegion("x0 out of range".to_string()));
            }
            Ok(0.5 * params.iter().map(|x| x * x).sum::<f64>())
        }
    }

    #[test]
    fn test_flat_priors_equal_neg_nll() {
        let model = Quadratic { dim: 2 };
        let posterior = Posterior::new(&model);
        let lp = posterior.logpdf(&[1.0, 2.0]).unwrap();
        assert!((lp - (-2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_normal_prior_pulls_logpdf() {
        let model = Quadratic { dim: 1 };
        let posterior = Posterior::new(&model)
            .with_priors(vec![Prior::Normal { center: 1.0, width: 2.0 }])
            .unwrap();
        let lp = posterior.logpdf(&[0.0]).unwrap();
        // -nll + prior = 0 + (-0.5 * (1/2)^2)
        assert!((lp - (-0.125)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_region_maps_to_neg_infinity() {
        let model = Quadratic { dim: 1 };
        let posterior = Posterior::new(&model);
        let lp = posterior.logpdf(&[101.0]).unwrap();
        assert_eq!(lp, f64::NEG_INFINITY);
        assert!(!lp.is_nan());
    }

    #[test]
    fn test_genuine_errors_still_propagate() {
        let model = Quadratic { dim: 2 };
        let posterior = Posterior::new(&model);
        assert!(posterior.logpdf(&[1.0]).is_err());
    }

    #[test]
    fn test_prior_length_checked() {
        let model = Quadratic { dim: 2 };
        assert!(Posterior::new(&model).with_priors(vec![Prior::Flat]).is_err());
    }
}
