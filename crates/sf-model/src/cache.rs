//! Content-addressed cache keys for fit artifacts.
//!
//! A cached fit is keyed by a digest of everything that determines it: bin
//! boundaries, observation rows, and model configuration. Any input change
//! changes the key, so a stale artifact can never be read back under a
//! matching filename.

use crate::config::ModelConfig;
use crate::schema::{ObservationRow, SizeBins};
use serde::Serialize;
use sf_core::Result;
use sha2::{Digest, Sha256};

#[derive(Serialize)]
struct KeyInput<'a> {
    bins: &'a SizeBins,
    rows: &'a [ObservationRow],
    config: &'a ModelConfig,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut s = String::with_capacity(64);
    for b in out {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

/// Hex digest identifying a (bins, observations, config) fitting problem.
pub fn fit_cache_key(
    bins: &SizeBins,
    rows: &[ObservationRow],
    config: &ModelConfig,
) -> Result<String> {
    let bytes = serde_json::to_vec(&KeyInput { bins, rows, config })?;
    Ok(sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Family;
    use crate::schema::LowerBound;

    fn inputs() -> (SizeBins, Vec<ObservationRow>, ModelConfig) {
        let bins = SizeBins::new(vec![2.5, 5.0, 7.5], LowerBound::Zero).unwrap();
        let rows = vec![ObservationRow {
            category: "wrasse".to_string(),
            bin_index: 2,
            covariates: vec![],
            count: 20,
        }];
        (bins, rows, ModelConfig::baseline(Family::Lognormal))
    }

    #[test]
    fn test_key_is_stable() {
        let (bins, rows, config) = inputs();
        let a = fit_cache_key(&bins, &rows, &config).unwrap();
        let b = fit_cache_key(&bins, &rows, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_tracks_every_input() {
        let (bins, rows, config) = inputs();
        let base = fit_cache_key(&bins, &rows, &config).unwrap();

        let other_bins = SizeBins::new(vec![2.5, 5.0, 8.0], LowerBound::Zero).unwrap();
        assert_ne!(base, fit_cache_key(&other_bins, &rows, &config).unwrap());

        let mut other_rows = rows.clone();
        other_rows[0].count += 1;
        assert_ne!(base, fit_cache_key(&bins, &other_rows, &config).unwrap());

        let other_config = ModelConfig::baseline(Family::Normal);
        assert_ne!(base, fit_cache_key(&bins, &rows, &other_config).unwrap());
    }
}
