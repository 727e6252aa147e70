//! Core traits for sizefit
//!
//! The inference surface does not depend on concrete models; external
//! optimizers and samplers consume [`LogDensityModel`] and nothing else.

use crate::Result;

/// A model exposing a negative log-likelihood over a flat parameter vector,
/// plus the metadata (names, bounds, initial values) an external engine
/// needs to explore it.
pub trait LogDensityModel: Send + Sync {
    /// Number of parameters.
    fn dim(&self) -> usize;

    /// Parameter names (stable order).
    fn parameter_names(&self) -> Vec<String>;

    /// Parameter bounds (min, max) (stable order).
    fn parameter_bounds(&self) -> Vec<(f64, f64)>;

    /// Suggested initial values (stable order).
    fn parameter_init(&self) -> Vec<f64>;

    /// Negative log-likelihood at `params`.
    ///
    /// Returns [`crate::Error::InvalidRegion`] when the parameter point
    /// produces a non-positive or non-finite probability, so callers can
    /// reject the point instead of propagating `NaN`.
    fn nll(&self, params: &[f64]) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyModel;

    impl LogDensityModel for DummyModel {
        fn dim(&self) -> usize {
            1
        }

        fn parameter_names(&self) -> Vec<String> {
            vec!["theta".to_string()]
        }

        fn parameter_bounds(&self) -> Vec<(f64, f64)> {
            vec![(-10.0, 10.0)]
        }

        fn parameter_init(&self) -> Vec<f64> {
            vec![0.0]
        }

        fn nll(&self, params: &[f64]) -> Result<f64> {
            Ok(0.5 * params[0] * params[0])
        }
    }

    #[test]
    fn test_dummy_model() {
        let model = DummyModel;
        assert_eq!(model.dim(), 1);
        assert_eq!(model.parameter_names(), vec!["theta"]);
        assert!((model.nll(&[2.0]).unwrap() - 2.0).abs() < 1e-12);
    }
}
