//! Order-insensitive summary statistics of a sample sequence.

use serde::Serialize;

use crate::error::{PolymerError, Result};

/// Population moments of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moments {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    /// Zero for a sequence without spread.
    pub skewness: f64,
    /// Kurtosis minus 3; zero for a sequence without spread.
    pub excess_kurtosis: f64,
}

impl Moments {
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        if samples.is_empty() {
            return Err(PolymerError::InvalidInput("moments of an empty sequence".into()));
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let central = |k: i32| samples.iter().map(|x| (x - mean).powi(k)).sum::<f64>() / n;
        let variance = central(2);

        let (skewness, excess_kurtosis) = if variance > 0.0 {
            (central(3) / variance.powf(1.5), central(4) / (variance * variance) - 3.0)
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            count: samples.len(),
            mean,
            variance,
            skewness,
            excess_kurtosis,
        })
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Standard error of the mean, assuming independent samples.
    pub fn std_error(&self) -> f64 {
        (self.variance / self.count as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_symmetric_sequence() {
        let m = Moments::from_samples(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.count, 4);
        assert_relative_eq!(m.mean, 2.5, epsilon = 1e-14);
        assert_relative_eq!(m.variance, 1.25, epsilon = 1e-14);
        assert_relative_eq!(m.skewness, 0.0, epsilon = 1e-14);
        assert_relative_eq!(m.excess_kurtosis, -1.36, epsilon = 1e-12);
        assert_relative_eq!(m.std_error(), (1.25f64 / 4.0).sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_constant_sequence() {
        let m = Moments::from_samples(&[0.0; 5]).unwrap();
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.skewness, 0.0);
        assert_eq!(m.excess_kurtosis, 0.0);
    }

    #[test]
    fn test_right_skewed() {
        let m = Moments::from_samples(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        assert!(m.skewness > 0.0);
    }

    #[test]
    fn test_empty() {
        assert!(Moments::from_samples(&[]).is_err());
    }
}
