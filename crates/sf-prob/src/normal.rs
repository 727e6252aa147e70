//! Normal distribution utilities.

use crate::math::standard_normal_cdf;
use sf_core::{Error, Result};

/// Natural log of `sqrt(2π)`.
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_7;

fn validate_sigma(sigma: f64) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::Validation(format!("sigma must be finite and > 0, got {}", sigma)));
    }
    Ok(())
}

/// Log-PDF of a Normal distribution `N(mu, sigma)` at `x`.
///
/// `log p(x) = -0.5 * ((x-mu)/sigma)^2 - ln(sigma) - ln(sqrt(2π))`
pub fn logpdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    validate_sigma(sigma)?;
    let z = (x - mu) / sigma;
    Ok(-0.5 * z * z - sigma.ln() - LN_SQRT_2PI)
}

/// CDF of a Normal distribution `N(mu, sigma)` at `x`.
pub fn cdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    validate_sigma(sigma)?;
    if x == f64::NEG_INFINITY {
        return Ok(0.0);
    }
    if x == f64::INFINITY {
        return Ok(1.0);
    }
    Ok(standard_normal_cdf((x - mu) / sigma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_logpdf_standard_at_zero() {
        let lp = logpdf(0.0, 0.0, 1.0).unwrap();
        assert!((lp + LN_SQRT_2PI).abs() < 1e-12);
    }

    #[test]
    fn test_logpdf_symmetry() {
        let lp1 = logpdf(1.3, 0.0, 2.0).unwrap();
        let lp2 = logpdf(-1.3, 0.0, 2.0).unwrap();
        assert!((lp1 - lp2).abs() < 1e-12);
    }

    #[test]
    fn test_cdf_median_and_shift() {
        assert_relative_eq!(cdf(3.0, 3.0, 1.7).unwrap(), 0.5, epsilon = 1e-14);
        // P(X <= mu + sigma) for any (mu, sigma) equals Phi(1).
        let p = cdf(5.0 + 2.0, 5.0, 2.0).unwrap();
        assert_relative_eq!(p, 0.841_344_746_068_543, epsilon = 1e-12);
    }

    #[test]
    fn test_cdf_infinite_limits() {
        assert_eq!(cdf(f64::NEG_INFINITY, 0.0, 1.0).unwrap(), 0.0);
        assert_eq!(cdf(f64::INFINITY, 0.0, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_invalid_sigma() {
        assert!(logpdf(0.0, 0.0, 0.0).is_err());
        assert!(cdf(0.0, 0.0, -1.0).is_err());
        assert!(cdf(0.0, 0.0, f64::NAN).is_err());
    }
}
