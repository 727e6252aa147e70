//! Small numerically-stable math utilities used across probability code.

/// Standard normal CDF.
///
/// Uses `erfc` for better numerical behavior in the tails:
/// `Φ(x) = 0.5 * erfc(-x / sqrt(2))`.
#[inline]
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * statrs::function::erf::erfc(-x / std::f64::consts::SQRT_2)
}

/// Exponential with a conservative clamp to avoid overflow.
///
/// For `x > 700`, `exp(x)` can overflow to `inf` on some platforms; for
/// resolved log-scale parameters this yields `inf` sigma and breaks the
/// invalid-region check downstream. The clamp keeps the value finite on both
/// sides so the evaluator can report a proper rejection instead.
#[inline]
pub fn exp_clamped(x: f64) -> f64 {
    x.clamp(-700.0, 700.0).exp()
}
