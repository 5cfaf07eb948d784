//! Partition module - directed-polymer partition functions on a potential grid.

mod evaluation;
mod solver;
mod wavefront;

pub use evaluation::{log_add_exp, Evaluation};
pub use solver::{solve, PartitionGrid, PartitionSolver, Schedule, Solution};
