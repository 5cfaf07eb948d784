//! Partition Function Solver.
//!
//! Fills `Z(i,j)`, the Boltzmann-weighted sum over all directed paths from
//! `(0,0)` to `(i,j)` that step only down or right:
//!
//! Z(0,0) = exp(-V(0,0)/T)
//! Z(0,j) = Z(0,j-1) · exp(-V(0,j)/T)
//! Z(i,0) = Z(i-1,0) · exp(-V(i,0)/T)
//! Z(i,j) = (Z(i-1,j) + Z(i,j-1)) · exp(-V(i,j)/T)
//!
//! The terminal value `Z(d-1,d-1)` is the partition function of a polymer of
//! `2(d-1)` bonds.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::evaluation::Evaluation;
use super::wavefront;
use crate::disorder::PotentialGrid;
use crate::error::{PolymerError, Result};

/// Partition values (or their logarithms) for every cell, indexed `(row, col)`.
pub type PartitionGrid = DMatrix<f64>;

/// Order in which cells are visited.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Row by row, left to right. Both predecessors of a cell are always done.
    #[default]
    RowMajor,
    /// Anti-diagonal sweep; each diagonal is computed in parallel.
    Wavefront,
}

/// Result of one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Representation of `terminal` and `grid`.
    pub evaluation: Evaluation,
    /// `grid[(d-1, d-1)]`.
    pub terminal: f64,
    pub grid: PartitionGrid,
}

impl Solution {
    pub fn dimension(&self) -> usize {
        self.grid.nrows()
    }

    /// Linear partition function `Z`.
    ///
    /// Fails with `NumericOverflow` when a log-domain terminal does not fit in an `f64`.
    pub fn partition_function(&self) -> Result<f64> {
        let last = self.dimension() - 1;
        match self.evaluation {
            Evaluation::Direct => Ok(self.terminal),
            Evaluation::LogDomain => Evaluation::Direct.accept(last, last, self.terminal.exp()),
        }
    }

    /// `ln Z`, available in both representations.
    pub fn log_partition_function(&self) -> f64 {
        match self.evaluation {
            Evaluation::Direct => self.terminal.ln(),
            Evaluation::LogDomain => self.terminal,
        }
    }

    /// Free energy `F = -T ln Z`.
    pub fn free_energy(&self, temperature: f64) -> f64 {
        -temperature * self.log_partition_function()
    }
}

/// Solve one potential grid with direct evaluation in row-major order,
/// returning a freshly allocated partition grid.
pub fn solve(potential: &PotentialGrid, temperature: f64) -> Result<Solution> {
    let mut solver = PartitionSolver::default();
    let terminal = solver.terminal(potential, temperature)?;
    Ok(Solution {
        evaluation: solver.evaluation,
        terminal,
        grid: solver.grid,
    })
}

/// Solver owning a partition-grid buffer that is reused across calls.
///
/// The buffer is reallocated only when the potential's dimension changes, so
/// an ensemble of equally sized realizations allocates once.
#[derive(Debug, Clone)]
pub struct PartitionSolver {
    evaluation: Evaluation,
    schedule: Schedule,
    grid: PartitionGrid,
}

impl Default for PartitionSolver {
    fn default() -> Self {
        Self::new(Evaluation::default(), Schedule::default())
    }
}

impl PartitionSolver {
    pub fn new(evaluation: Evaluation, schedule: Schedule) -> Self {
        Self {
            evaluation,
            schedule,
            grid: DMatrix::zeros(0, 0),
        }
    }

    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Grid left behind by the most recent successful solve.
    pub fn grid(&self) -> &PartitionGrid {
        &self.grid
    }

    /// Fill the internal buffer and return the terminal value.
    pub fn terminal(&mut self, potential: &PotentialGrid, temperature: f64) -> Result<f64> {
        let dimension = check_inputs(potential, temperature)?;
        if self.grid.shape() != (dimension, dimension) {
            self.grid = DMatrix::zeros(dimension, dimension);
        }

        match self.schedule {
            Schedule::RowMajor => fill_row_major(&mut self.grid, potential, temperature, self.evaluation)?,
            Schedule::Wavefront => wavefront::fill(&mut self.grid, potential, temperature, self.evaluation)?,
        }

        Ok(self.grid[(dimension - 1, dimension - 1)])
    }

    /// Solve and return a copy of the filled grid alongside the terminal value.
    pub fn solve(&mut self, potential: &PotentialGrid, temperature: f64) -> Result<Solution> {
        let terminal = self.terminal(potential, temperature)?;
        Ok(Solution {
            evaluation: self.evaluation,
            terminal,
            grid: self.grid.clone(),
        })
    }
}

fn check_inputs(potential: &PotentialGrid, temperature: f64) -> Result<usize> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(PolymerError::invalid(
            "temperature",
            format!("must be finite and strictly positive, got {temperature}"),
        ));
    }
    let (rows, cols) = potential.shape();
    if rows != cols {
        return Err(PolymerError::invalid(
            "potential",
            format!("grid must be square, got {rows}x{cols}"),
        ));
    }
    if rows == 0 {
        return Err(PolymerError::invalid("potential", "grid side must be at least 1"));
    }
    Ok(rows)
}

fn fill_row_major(
    grid: &mut PartitionGrid,
    potential: &PotentialGrid,
    temperature: f64,
    evaluation: Evaluation,
) -> Result<()> {
    let dimension = potential.nrows();
    for i in 0..dimension {
        for j in 0..dimension {
            let value = evaluation.site(grid, potential, temperature, i, j);
            grid[(i, j)] = evaluation.accept(i, j, value)?;
        }
    }
    Ok(())
}
