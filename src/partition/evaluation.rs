//! Cell kernels for the two numeric representations of the partition grid.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{PolymerError, Result};

/// Numeric representation used while filling the partition grid.
///
/// `Direct` stores `Z(i,j)` itself as a product of raw Boltzmann factors.
/// `LogDomain` stores `ln Z(i,j)` and merges predecessors with log-sum-exp,
/// which stays finite long after the direct form has overflowed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    #[default]
    Direct,
    LogDomain,
}

/// `ln(e^a + e^b)` without leaving the representable range.
#[inline]
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    hi + (lo - hi).exp().ln_1p()
}

impl Evaluation {
    /// Combine the already computed predecessors with the site exponent `-V/T`.
    ///
    /// `up` is cell `(i-1, j)`, `left` is cell `(i, j-1)`; either is `None`
    /// on the boundary.
    #[inline]
    pub fn combine(self, up: Option<f64>, left: Option<f64>, exponent: f64) -> f64 {
        match self {
            Evaluation::Direct => {
                let inflow = match (up, left) {
                    (None, None) => 1.0,
                    (Some(z), None) | (None, Some(z)) => z,
                    (Some(a), Some(b)) => a + b,
                };
                inflow * exponent.exp()
            }
            Evaluation::LogDomain => {
                let inflow = match (up, left) {
                    (None, None) => 0.0,
                    (Some(z), None) | (None, Some(z)) => z,
                    (Some(a), Some(b)) => log_add_exp(a, b),
                };
                inflow + exponent
            }
        }
    }

    /// Value of cell `(i, j)` given a grid whose predecessors are filled.
    #[inline]
    pub(crate) fn site(
        self,
        grid: &DMatrix<f64>,
        potential: &DMatrix<f64>,
        temperature: f64,
        i: usize,
        j: usize,
    ) -> f64 {
        let up = (i > 0).then(|| grid[(i - 1, j)]);
        let left = (j > 0).then(|| grid[(i, j - 1)]);
        self.combine(up, left, -potential[(i, j)] / temperature)
    }

    /// Reject values outside the representation's valid range.
    ///
    /// Direct cells must be finite and strictly positive, so both overflow to
    /// infinity and underflow to zero are reported. Log cells only need to be finite.
    #[inline]
    pub(crate) fn accept(self, row: usize, col: usize, value: f64) -> Result<f64> {
        let valid = match self {
            Evaluation::Direct => value.is_finite() && value > 0.0,
            Evaluation::LogDomain => value.is_finite(),
        };
        if valid {
            Ok(value)
        } else {
            Err(PolymerError::NumericOverflow { row, col, value })
        }
    }
}
