//! Potential Field Generator.
//!
//! Draws the quenched disorder: a dense `dimension × dimension` grid of
//! independent site energies. The random source is always supplied by the
//! caller so a fixed seed reproduces the same realization and concurrent
//! samplers never share generator state.

use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::{PolymerError, Result};

/// Site energies of one disorder realization, indexed `(row, col)`.
pub type PotentialGrid = DMatrix<f64>;

/// Generate a grid of i.i.d. standard-normal site energies.
pub fn generate<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Result<PotentialGrid> {
    generate_with(dimension, &StandardNormal, rng)
}

/// Generate a grid whose entries are drawn independently from `distribution`.
pub fn generate_with<D, R>(dimension: usize, distribution: &D, rng: &mut R) -> Result<PotentialGrid>
where
    D: Distribution<f64> + ?Sized,
    R: Rng + ?Sized,
{
    if dimension == 0 {
        return Err(PolymerError::invalid("dimension", "grid dimension must be at least 1"));
    }
    Ok(DMatrix::from_distribution(dimension, dimension, distribution, rng))
}

/// Site-energy distribution used for the quenched disorder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disorder {
    Gaussian { mean: f64, std_dev: f64 },
    Uniform { low: f64, high: f64 },
}

impl Default for Disorder {
    fn default() -> Self {
        Disorder::Gaussian { mean: 0.0, std_dev: 1.0 }
    }
}

impl Disorder {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Disorder::Gaussian { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
                    return Err(PolymerError::invalid(
                        "disorder",
                        format!("gaussian needs finite mean and positive std_dev, got ({mean}, {std_dev})"),
                    ));
                }
            }
            Disorder::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(PolymerError::invalid(
                        "disorder",
                        format!("uniform needs finite low < high, got [{low}, {high})"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Draw one realization of this disorder.
    pub fn generate<R: Rng + ?Sized>(&self, dimension: usize, rng: &mut R) -> Result<PotentialGrid> {
        self.validate()?;
        match *self {
            Disorder::Gaussian { mean, std_dev } => {
                let normal = Normal::new(mean, std_dev)
                    .map_err(|e| PolymerError::invalid("disorder", e.to_string()))?;
                generate_with(dimension, &normal, rng)
            }
            Disorder::Uniform { low, high } => generate_with(dimension, &Uniform::new(low, high), rng),
        }
    }
}
