//! Lognormal distribution utilities.
//!
//! Defined as: `X ~ LogNormal(mu, sigma)` iff `ln X ~ Normal(mu, sigma)`.

use sf_core::{Error, Result};

/// CDF of LogNormal(mu, sigma) at `x`.
///
/// The support is `(0, inf)`: the CDF is 0 for any `x <= 0`.
pub fn cdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    if x.is_nan() {
        return Err(Error::Validation("lognormal cdf evaluated at NaN".to_string()));
    }
    if x <= 0.0 {
        // validate sigma even on the short-circuit path
        return crate::normal::cdf(0.0, mu, sigma).map(|_| 0.0);
    }
    if x == f64::INFINITY {
        return crate::normal::cdf(0.0, mu, sigma).map(|_| 1.0);
    }
    crate::normal::cdf(x.ln(), mu, sigma)
}

/// Log-PDF of LogNormal(mu, sigma) at `x`.
///
/// `-inf` outside the support.
pub fn logpdf(x: f64, mu: f64, sigma: f64) -> Result<f64> {
    if !x.is_finite() || x <= 0.0 {
        return crate::normal::logpdf(0.0, mu, sigma).map(|_| f64::NEG_INFINITY);
    }
    let lx = x.ln();
    let lp = crate::normal::logpdf(lx, mu, sigma)?;
    Ok(lp - lx)
}
