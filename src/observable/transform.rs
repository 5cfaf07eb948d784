//! Observable Transform.
//!
//! `h_i = ln(Z_i / <Z>)`: samples are divided by the ensemble mean, then
//! logged elementwise. Binning and plotting of the result happen downstream.

use crate::error::{PolymerError, Result};

/// Divide every sample by the arithmetic mean of the sequence.
pub fn normalize(samples: &[f64]) -> Result<Vec<f64>> {
    if samples.is_empty() {
        return Err(PolymerError::InvalidInput("cannot normalize an empty sample sequence".into()));
    }
    // scaled by the largest sample so the sum cannot overflow
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max.is_finite() && max > 0.0) {
        return Err(PolymerError::InvalidInput(format!(
            "samples must be finite with a positive maximum, got {max}"
        )));
    }
    let mean = max * (samples.iter().map(|z| z / max).sum::<f64>() / samples.len() as f64);
    if !(mean.is_finite() && mean > 0.0) {
        return Err(PolymerError::InvalidInput(format!(
            "sample mean must be finite and positive, got {mean}"
        )));
    }
    Ok(samples.iter().map(|z| z / mean).collect())
}

/// Natural logarithm of every sample.
pub fn log_transform(samples: &[f64]) -> Result<Vec<f64>> {
    if samples.is_empty() {
        return Err(PolymerError::InvalidInput("cannot log-transform an empty sample sequence".into()));
    }
    samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            if x > 0.0 && x.is_finite() {
                Ok(x.ln())
            } else {
                Err(PolymerError::InvalidInput(format!(
                    "sample {i} is not a positive finite value ({x})"
                )))
            }
        })
        .collect()
}

/// `normalize` followed by `log_transform`.
pub fn height_fluctuations(samples: &[f64]) -> Result<Vec<f64>> {
    log_transform(&normalize(samples)?)
}

/// Same observable for samples already stored as `ln Z`.
///
/// `ln(Z_i / <Z>) = ln Z_i - logsumexp(ln Z) + ln N`, which never forms `Z` itself.
pub fn log_normalize(log_samples: &[f64]) -> Result<Vec<f64>> {
    if log_samples.is_empty() {
        return Err(PolymerError::InvalidInput("cannot normalize an empty sample sequence".into()));
    }
    if let Some((i, x)) = log_samples.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(PolymerError::InvalidInput(format!("log-sample {i} is not finite ({x})")));
    }
    let max = log_samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let log_sum = max + log_samples.iter().map(|x| (x - max).exp()).sum::<f64>().ln();
    let log_mean = log_sum - (log_samples.len() as f64).ln();
    Ok(log_samples.iter().map(|x| x - log_mean).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_sequence() {
        let samples = vec![3.7; 9];
        let normalized = normalize(&samples).unwrap();
        for x in &normalized {
            assert_relative_eq!(*x, 1.0, epsilon = 1e-14);
        }
        for h in log_transform(&normalized).unwrap() {
            assert_relative_eq!(h, 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_normalized_mean_is_one() {
        let samples = [0.5, 1.5, 4.0, 2.0];
        let normalized = normalize(&samples).unwrap();
        let mean = normalized.iter().sum::<f64>() / normalized.len() as f64;
        assert_relative_eq!(mean, 1.0, epsilon = 1e-14);
        assert_relative_eq!(normalized[2], 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_height_fluctuations_order_insensitive() {
        let a = height_fluctuations(&[1.0, 2.0, 3.0, 10.0]).unwrap();
        let b = height_fluctuations(&[10.0, 3.0, 1.0, 2.0]).unwrap();
        assert_relative_eq!(a[0], b[2], epsilon = 1e-14);
        assert_relative_eq!(a[3], b[0], epsilon = 1e-14);
        assert_relative_eq!(a[0], (1.0f64 / 4.0).ln(), epsilon = 1e-14);
    }

    #[test]
    fn test_normalize_near_float_max() {
        let samples = [f64::MAX / 1.5; 2];
        let normalized = normalize(&samples).unwrap();
        for x in &normalized {
            assert_relative_eq!(*x, 1.0, epsilon = 1e-14);
        }
        for h in height_fluctuations(&[f64::MAX / 1.5, f64::MAX / 3.0]).unwrap() {
            assert!(h.is_finite());
        }
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(normalize(&[]), Err(PolymerError::InvalidInput(_))));
        assert!(matches!(log_transform(&[]), Err(PolymerError::InvalidInput(_))));
        assert!(matches!(log_normalize(&[]), Err(PolymerError::InvalidInput(_))));
    }

    #[test]
    fn test_non_positive_rejected() {
        assert!(matches!(log_transform(&[1.0, 0.0]), Err(PolymerError::InvalidInput(_))));
        assert!(matches!(log_transform(&[-1.0]), Err(PolymerError::InvalidInput(_))));
        assert!(matches!(height_fluctuations(&[2.0, -1.0, 5.0]), Err(PolymerError::InvalidInput(_))));
        assert!(matches!(normalize(&[-1.0, -2.0]), Err(PolymerError::InvalidInput(_))));
    }

    #[test]
    fn test_log_normalize_matches_linear() {
        let samples = [0.2, 1.7, 3.3, 0.9, 12.0];
        let logs: Vec<f64> = samples.iter().map(|z: &f64| z.ln()).collect();
        let linear = height_fluctuations(&samples).unwrap();
        let from_logs = log_normalize(&logs).unwrap();
        for (a, b) in linear.iter().zip(&from_logs) {
            assert_relative_eq!(*a, *b, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_log_normalize_huge_values() {
        let h = log_normalize(&[5000.0, 5000.0]).unwrap();
        assert_relative_eq!(h[0], 0.0, epsilon = 1e-12);
        assert!(log_normalize(&[1.0, f64::NAN]).is_err());
    }
}
